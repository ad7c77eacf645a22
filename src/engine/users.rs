// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{Error, Result};
use crate::models::User;

fn map_row(r: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: r.get(0)?,
        name: r.get(1)?,
        email: r.get(2)?,
        currency: r.get(3)?,
    })
}

pub fn create(conn: &Connection, name: &str, email: &str, currency: &str) -> Result<User> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM users WHERE email=?1",
            params![email],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(Error::duplicate("email already registered"));
    }
    conn.execute(
        "INSERT INTO users(name, email, currency) VALUES (?1,?2,?3)",
        params![name, email, currency],
    )?;
    get(conn, conn.last_insert_rowid())
}

pub fn get(conn: &Connection, id: i64) -> Result<User> {
    conn.query_row(
        "SELECT id, name, email, currency FROM users WHERE id=?1",
        params![id],
        map_row,
    )
    .optional()?
    .ok_or(Error::NotFound("user"))
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<User> {
    conn.query_row(
        "SELECT id, name, email, currency FROM users WHERE email=?1",
        params![email],
        map_row,
    )
    .optional()?
    .ok_or(Error::NotFound("user"))
}

pub fn list(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, email, currency FROM users ORDER BY id")?;
    let rows = stmt.query_map([], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
