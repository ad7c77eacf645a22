// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("io.tallybook", "Tallybook", "tallybook"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tallybook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    seed_default_categories(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        currency TEXT NOT NULL DEFAULT 'USD',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        kind TEXT NOT NULL,
        balance TEXT NOT NULL DEFAULT '0',
        opening_balance TEXT NOT NULL DEFAULT '0',
        credit_limit TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, name),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    -- user_id NULL means a shared default category, visible to everyone
    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        name TEXT NOT NULL,
        flow TEXT NOT NULL CHECK(flow IN ('income','expense')),
        icon TEXT NOT NULL DEFAULT '',
        color TEXT NOT NULL DEFAULT '',
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        account_id INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        flow TEXT NOT NULL CHECK(flow IN ('income','expense')),
        amount TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL,
        receipt_url TEXT,
        is_recurring INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(account_id) REFERENCES accounts(id),
        FOREIGN KEY(category_id) REFERENCES categories(id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        year INTEGER NOT NULL,
        UNIQUE(user_id, category_id, month, year),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES categories(id)
    );

    CREATE TABLE IF NOT EXISTS goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        target_amount TEXT NOT NULL,
        current_amount TEXT NOT NULL DEFAULT '0',
        deadline TEXT,
        icon TEXT NOT NULL DEFAULT '',
        completed INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}

/// The fixed catalog of shared categories every user sees. Inserted once;
/// the presence of any shared row is the "already seeded" guard, so this is
/// safe to call on every startup.
pub fn seed_default_categories(conn: &Connection) -> Result<()> {
    let seeded: i64 = conn.query_row(
        "SELECT COUNT(*) FROM categories WHERE user_id IS NULL",
        [],
        |r| r.get(0),
    )?;
    if seeded > 0 {
        return Ok(());
    }

    const DEFAULTS: &[(&str, &str, &str, &str)] = &[
        ("Salary", "income", "💼", "#10B981"),
        ("Freelance", "income", "💰", "#059669"),
        ("Gift", "income", "🎁", "#34D399"),
        ("Investment", "income", "💵", "#6EE7B7"),
        ("Bonus", "income", "🏆", "#A7F3D0"),
        ("Other Income", "income", "📈", "#D1FAE5"),
        ("Food & Dining", "expense", "🍕", "#EF4444"),
        ("Housing", "expense", "🏠", "#DC2626"),
        ("Transportation", "expense", "🚗", "#B91C1C"),
        ("Groceries", "expense", "🛒", "#991B1B"),
        ("Entertainment", "expense", "🎬", "#F87171"),
        ("Shopping", "expense", "👕", "#FCA5A5"),
        ("Healthcare", "expense", "💊", "#FEE2E2"),
        ("Education", "expense", "📚", "#F59E0B"),
        ("Bills & Utilities", "expense", "💳", "#D97706"),
        ("Travel", "expense", "✈️", "#B45309"),
        ("Personal Care", "expense", "🎉", "#92400E"),
        ("Subscriptions", "expense", "📱", "#78350F"),
        ("Other Expense", "expense", "💰", "#6B7280"),
    ];

    for (name, flow, icon, color) in DEFAULTS {
        conn.execute(
            "INSERT INTO categories(user_id, name, flow, icon, color) VALUES (NULL, ?1, ?2, ?3, ?4)",
            params![name, flow, icon, color],
        )?;
    }
    Ok(())
}
