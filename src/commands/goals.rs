// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::goals::{self, GoalInput};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

fn parse_input(sub: &clap::ArgMatches) -> Result<GoalInput> {
    Ok(GoalInput {
        name: sub.get_one::<String>("name").unwrap().clone(),
        target_amount: parse_decimal(sub.get_one::<String>("target").unwrap())?,
        deadline: sub
            .get_one::<String>("deadline")
            .map(|s| parse_date(s))
            .transpose()?,
        icon: sub.get_one::<String>("icon").unwrap().clone(),
    })
}

pub fn handle(conn: &mut Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let g = goals::create(conn, user_id, &parse_input(sub)?)?;
            println!(
                "Added goal '{}' targeting {} (id: {})",
                g.name,
                fmt_money(&g.target_amount),
                g.id
            );
        }
        Some(("list", sub)) => {
            let data = if sub.get_flag("active") {
                goals::list_active(conn, user_id)?
            } else {
                goals::list(conn, user_id)?
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|g| {
                        vec![
                            g.id.to_string(),
                            g.name.clone(),
                            fmt_money(&g.current_amount),
                            fmt_money(&g.target_amount),
                            format!("{}%", goals::progress_percentage(g).round_dp(2)),
                            if g.completed { "yes".into() } else { "".into() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Name", "Saved", "Target", "Progress", "Done"],
                        rows
                    )
                );
            }
        }
        Some(("contribute", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let g = goals::contribute(conn, user_id, id, amount)?;
            println!(
                "Goal '{}' now at {} of {} ({}%){}",
                g.name,
                fmt_money(&g.current_amount),
                fmt_money(&g.target_amount),
                goals::progress_percentage(&g).round_dp(2),
                if g.completed { ", completed!" } else { "" }
            );
        }
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let g = goals::update(conn, user_id, id, &parse_input(sub)?)?;
            println!("Updated goal '{}' (id: {})", g.name, g.id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            goals::delete(conn, user_id, id)?;
            println!("Removed goal {}", id);
        }
        _ => {}
    }
    Ok(())
}
