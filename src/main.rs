// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use tallybook::{cli, commands, db, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("user", sub)) => commands::users::handle(&conn, sub)?,
        Some(("account", sub)) => {
            let user_id = utils::current_user(&conn)?;
            commands::accounts::handle(&conn, user_id, sub)?;
        }
        Some(("category", sub)) => {
            let user_id = utils::current_user(&conn)?;
            commands::categories::handle(&conn, user_id, sub)?;
        }
        Some(("tx", sub)) => {
            let user_id = utils::current_user(&conn)?;
            commands::transactions::handle(&mut conn, user_id, sub)?;
        }
        Some(("budget", sub)) => {
            let user_id = utils::current_user(&conn)?;
            commands::budgets::handle(&conn, user_id, sub)?;
        }
        Some(("goal", sub)) => {
            let user_id = utils::current_user(&conn)?;
            commands::goals::handle(&mut conn, user_id, sub)?;
        }
        Some(("export", sub)) => {
            let user_id = utils::current_user(&conn)?;
            commands::exporter::handle(&conn, user_id, sub)?;
        }
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
