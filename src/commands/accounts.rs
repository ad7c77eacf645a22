// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::accounts::{self, AccountInput, AccountUpdate};
use crate::models::AccountKind;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

fn parse_input(sub: &clap::ArgMatches) -> Result<AccountInput> {
    let name = sub.get_one::<String>("name").unwrap().clone();
    let kind_s = sub.get_one::<String>("kind").unwrap();
    let kind = AccountKind::parse(kind_s)
        .with_context(|| format!("Invalid account kind '{}'", kind_s))?;
    let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
    let credit_limit = sub
        .get_one::<String>("limit")
        .map(|s| parse_decimal(s))
        .transpose()?;
    Ok(AccountInput {
        name,
        kind,
        balance,
        credit_limit,
    })
}

pub fn handle(conn: &Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let account = accounts::create(conn, user_id, &parse_input(sub)?)?;
            println!(
                "Added account '{}' ({}, id: {})",
                account.name,
                account.kind.as_str(),
                account.id
            );
        }
        Some(("list", sub)) => {
            let data = accounts::list(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            a.kind.as_str().to_string(),
                            fmt_money(&a.balance),
                            a.credit_limit.map(|l| fmt_money(&l)).unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Kind", "Balance", "Credit limit"], rows)
                );
            }
        }
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let kind_s = sub.get_one::<String>("kind").unwrap();
            let req = AccountUpdate {
                name: sub.get_one::<String>("name").unwrap().clone(),
                kind: AccountKind::parse(kind_s)
                    .with_context(|| format!("Invalid account kind '{}'", kind_s))?,
                credit_limit: sub
                    .get_one::<String>("limit")
                    .map(|s| parse_decimal(s))
                    .transpose()?,
            };
            let account = accounts::update(conn, user_id, id, &req)?;
            println!("Updated account '{}' (id: {})", account.name, account.id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            accounts::delete(conn, user_id, id)?;
            println!("Removed account {}", id);
        }
        _ => {}
    }
    Ok(())
}
