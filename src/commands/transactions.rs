// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::transactions::{self, TransactionFilter, TransactionInput};
use crate::models::Transaction;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, parse_flow, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

fn parse_input(sub: &clap::ArgMatches) -> Result<TransactionInput> {
    Ok(TransactionInput {
        account_id: *sub.get_one::<i64>("account").unwrap(),
        category_id: *sub.get_one::<i64>("category").unwrap(),
        flow: parse_flow(sub.get_one::<String>("type").unwrap())?,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        description: sub.get_one::<String>("desc").unwrap().clone(),
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        receipt_url: sub.get_one::<String>("receipt").cloned(),
        is_recurring: sub.get_flag("recurring"),
    })
}

fn print_rows(sub: &clap::ArgMatches, data: &[Transaction]) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.flow.as_str().to_string(),
                    fmt_money(&t.amount),
                    t.account_id.to_string(),
                    t.category_id.to_string(),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Amount", "Account", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn handle(conn: &mut Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let t = transactions::create(conn, user_id, &parse_input(sub)?)?;
            println!(
                "Recorded {} {} on {} (id: {})",
                t.flow.as_str(),
                fmt_money(&t.amount),
                t.date,
                t.id
            );
        }
        Some(("list", sub)) => {
            let filter = TransactionFilter {
                flow: sub
                    .get_one::<String>("type")
                    .map(|s| parse_flow(s))
                    .transpose()?,
                category_id: sub.get_one::<i64>("category").copied(),
                account_id: sub.get_one::<i64>("account").copied(),
                start_date: sub
                    .get_one::<String>("from")
                    .map(|s| parse_date(s))
                    .transpose()?,
                end_date: sub
                    .get_one::<String>("to")
                    .map(|s| parse_date(s))
                    .transpose()?,
                description: sub.get_one::<String>("search").cloned(),
            };
            let mut data = transactions::filter(conn, user_id, &filter)?;
            if let Some(limit) = sub.get_one::<usize>("limit") {
                data.truncate(*limit);
            }
            print_rows(sub, &data)?;
        }
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let t = transactions::update(conn, user_id, id, &parse_input(sub)?)?;
            println!("Updated transaction {} ({} {})", t.id, t.flow.as_str(), fmt_money(&t.amount));
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            transactions::delete(conn, user_id, id)?;
            println!("Removed transaction {}", id);
        }
        Some(("summary", sub)) => {
            let from = parse_date(sub.get_one::<String>("from").unwrap())?;
            let to = parse_date(sub.get_one::<String>("to").unwrap())?;
            let s = transactions::summary(conn, user_id, from, to)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                println!(
                    "{}",
                    pretty_table(
                        &["Income", "Expense", "Balance"],
                        vec![vec![
                            fmt_money(&s.income),
                            fmt_money(&s.expense),
                            fmt_money(&s.balance),
                        ]],
                    )
                );
            }
        }
        Some(("recent", sub)) => {
            let limit = *sub.get_one::<usize>("limit").unwrap();
            let data = transactions::recent(conn, user_id, limit)?;
            print_rows(sub, &data)?;
        }
        _ => {}
    }
    Ok(())
}
