// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::categories::{self, CategoryInput};
use crate::utils::{maybe_print_json, parse_flow, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

fn parse_input(sub: &clap::ArgMatches) -> Result<CategoryInput> {
    Ok(CategoryInput {
        name: sub.get_one::<String>("name").unwrap().clone(),
        flow: parse_flow(sub.get_one::<String>("type").unwrap())?,
        icon: sub.get_one::<String>("icon").unwrap().clone(),
        color: sub.get_one::<String>("color").unwrap().clone(),
    })
}

pub fn handle(conn: &Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let category = categories::create(conn, user_id, &parse_input(sub)?)?;
            println!("Added category '{}' (id: {})", category.name, category.id);
        }
        Some(("list", sub)) => {
            let data = match sub.get_one::<String>("type") {
                Some(t) => categories::list_by_flow(conn, user_id, parse_flow(t)?)?,
                None => categories::list(conn, user_id)?,
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            c.flow.as_str().to_string(),
                            c.icon.clone(),
                            if c.is_default() { "yes".into() } else { "".into() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Type", "Icon", "Default"], rows)
                );
            }
        }
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let category = categories::update(conn, user_id, id, &parse_input(sub)?)?;
            println!("Updated category '{}' (id: {})", category.name, category.id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            categories::delete(conn, user_id, id)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
