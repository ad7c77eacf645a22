// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::budgets::{self, BudgetInput};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

fn parse_input(sub: &clap::ArgMatches) -> Result<BudgetInput> {
    Ok(BudgetInput {
        category_id: *sub.get_one::<i64>("category").unwrap(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        month: parse_month(sub.get_one::<String>("month").unwrap())?,
        year: *sub.get_one::<i32>("year").unwrap(),
    })
}

pub fn handle(conn: &Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let b = budgets::create(conn, user_id, &parse_input(sub)?)?;
            println!(
                "Budget set for category {} {}/{} = {} (id: {})",
                b.category_id,
                b.month,
                b.year,
                fmt_money(&b.amount),
                b.id
            );
        }
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let b = budgets::update(conn, user_id, id, &parse_input(sub)?)?;
            println!("Updated budget {} = {}", b.id, fmt_money(&b.amount));
        }
        Some(("list", sub)) => {
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            let year = *sub.get_one::<i32>("year").unwrap();
            let data = budgets::list_month(conn, user_id, month, year)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|b| {
                        vec![
                            b.id.to_string(),
                            b.category_id.to_string(),
                            format!("{}/{}", b.month, b.year),
                            fmt_money(&b.amount),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Category", "Period", "Amount"], rows)
                );
            }
        }
        Some(("progress", sub)) => {
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            let year = *sub.get_one::<i32>("year").unwrap();
            let data = budgets::progress(conn, user_id, month, year)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|p| {
                        vec![
                            p.category_name.clone(),
                            fmt_money(&p.budget.amount),
                            fmt_money(&p.spent),
                            fmt_money(&p.remaining),
                            format!("{}%", p.percentage_used.round_dp(2)),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Budget", "Spent", "Remaining", "Used"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            budgets::delete(conn, user_id, id)?;
            println!("Removed budget {}", id);
        }
        _ => {}
    }
    Ok(())
}
