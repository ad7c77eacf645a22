// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::users;
use crate::utils::{maybe_print_json, pretty_table, set_current_user};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let email = sub.get_one::<String>("email").unwrap();
            let currency = sub.get_one::<String>("currency").unwrap();
            let user = users::create(conn, name, email, currency)?;
            println!("Added user '{}' <{}> (id: {})", user.name, user.email, user.id);
        }
        Some(("list", sub)) => {
            let data = users::list(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|u| {
                        vec![
                            u.id.to_string(),
                            u.name.clone(),
                            u.email.clone(),
                            u.currency.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Email", "Currency"], rows)
                );
            }
        }
        Some(("use", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let user = users::find_by_email(conn, email)?;
            set_current_user(conn, user.id)?;
            println!("Active user is now '{}' <{}>", user.name, user.email);
        }
        _ => {}
    }
    Ok(())
}
