// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{Account, AccountKind};

#[derive(Debug, Clone)]
pub struct AccountInput {
    pub name: String,
    pub kind: AccountKind,
    /// Opening balance. Only honored at creation; after that the balance
    /// belongs to the ledger and moves only through transaction effects.
    pub balance: Decimal,
    pub credit_limit: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub name: String,
    pub kind: AccountKind,
    pub credit_limit: Option<Decimal>,
}

fn map_row(r: &Row) -> rusqlite::Result<(i64, i64, String, String, String, Option<String>)> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

fn from_parts(parts: (i64, i64, String, String, String, Option<String>)) -> Result<Account> {
    let (id, user_id, name, kind_s, balance_s, limit_s) = parts;
    let kind = AccountKind::parse(&kind_s)
        .ok_or_else(|| Error::Validation(format!("unknown account kind '{}'", kind_s)))?;
    let balance = super::read_decimal(&balance_s)?;
    let credit_limit = match limit_s {
        Some(s) => Some(super::read_decimal(&s)?),
        None => None,
    };
    Ok(Account {
        id,
        user_id,
        name,
        kind,
        balance,
        credit_limit,
    })
}

pub fn create(conn: &Connection, user_id: i64, req: &AccountInput) -> Result<Account> {
    conn.execute(
        "INSERT INTO accounts(user_id, name, kind, balance, opening_balance, credit_limit)
         VALUES (?1,?2,?3,?4,?4,?5)",
        params![
            user_id,
            req.name,
            req.kind.as_str(),
            req.balance.to_string(),
            req.credit_limit.map(|d| d.to_string()),
        ],
    )?;
    get(conn, user_id, conn.last_insert_rowid())
}

pub fn update(conn: &Connection, user_id: i64, id: i64, req: &AccountUpdate) -> Result<Account> {
    let existing = get(conn, user_id, id)?;
    conn.execute(
        "UPDATE accounts SET name=?1, kind=?2, credit_limit=?3 WHERE id=?4",
        params![
            req.name,
            req.kind.as_str(),
            req.credit_limit.map(|d| d.to_string()),
            existing.id,
        ],
    )?;
    get(conn, user_id, id)
}

/// Deleting an account with live transactions would orphan their effects and
/// silently break the balance invariant for the rest of the ledger views, so
/// it is refused.
pub fn delete(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let account = get(conn, user_id, id)?;
    let in_use: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM transactions WHERE account_id=?1 LIMIT 1",
            params![account.id],
            |r| r.get(0),
        )
        .optional()?;
    if in_use.is_some() {
        return Err(Error::conflict(
            "cannot delete account with existing transactions",
        ));
    }
    conn.execute("DELETE FROM accounts WHERE id=?1", params![account.id])?;
    Ok(())
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Account> {
    let parts = conn
        .query_row(
            "SELECT id, user_id, name, kind, balance, credit_limit
             FROM accounts WHERE id=?1 AND user_id=?2",
            params![id, user_id],
            map_row,
        )
        .optional()?
        .ok_or(Error::NotFound("account"))?;
    from_parts(parts)
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, kind, balance, credit_limit
         FROM accounts WHERE user_id=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(from_parts(row?)?);
    }
    Ok(out)
}
