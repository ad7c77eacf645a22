// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction lifecycle and the ledger reconciliation that goes with it.
//! Every mutation runs inside one SQLite transaction covering both the row
//! write and the balance write; an error on any path after the ledger has
//! been touched rolls both back together (rusqlite rolls back on drop).

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::engine::{accounts, categories, ledger};
use crate::error::{Error, Result};
use crate::models::{Flow, Summary, Transaction};

#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub account_id: i64,
    pub category_id: i64,
    pub flow: Flow,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub receipt_url: Option<String>,
    pub is_recurring: bool,
}

/// Optional filter dimensions; an unset dimension is unconstrained.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub flow: Option<Flow>,
    pub category_id: Option<i64>,
    pub account_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

fn validate(req: &TransactionInput) -> Result<()> {
    if req.amount <= Decimal::ZERO {
        return Err(Error::validation("amount must be positive"));
    }
    Ok(())
}

fn map_row(r: &Row) -> rusqlite::Result<Transaction> {
    let flow_s: String = r.get(4)?;
    let amount_s: String = r.get(5)?;
    let flow = Flow::parse(&flow_s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown flow '{}'", flow_s).into(),
        )
    })?;
    let amount: Decimal = amount_s.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Transaction {
        id: r.get(0)?,
        user_id: r.get(1)?,
        account_id: r.get(2)?,
        category_id: r.get(3)?,
        flow,
        amount,
        description: r.get(6)?,
        date: r.get(7)?,
        receipt_url: r.get(8)?,
        is_recurring: r.get(9)?,
    })
}

const COLS: &str = "id, user_id, account_id, category_id, flow, amount, description, date, receipt_url, is_recurring";

pub fn create(conn: &mut Connection, user_id: i64, req: &TransactionInput) -> Result<Transaction> {
    validate(req)?;
    let tx = conn.transaction()?;
    let category = categories::get(&tx, user_id, req.category_id)?;
    let account = accounts::get(&tx, user_id, req.account_id)?;
    if category.flow != req.flow {
        return Err(Error::validation(
            "category type does not match transaction type",
        ));
    }
    tx.execute(
        "INSERT INTO transactions(user_id, account_id, category_id, flow, amount, description, date, receipt_url, is_recurring)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        params![
            user_id,
            account.id,
            category.id,
            req.flow.as_str(),
            req.amount.to_string(),
            req.description,
            req.date.to_string(),
            req.receipt_url,
            req.is_recurring,
        ],
    )?;
    let id = tx.last_insert_rowid();
    ledger::apply_effect(&tx, account.id, req.flow, req.amount)?;
    tx.commit()?;
    get(conn, user_id, id)
}

/// Rewrites the transaction and reconciles both ledgers: the stored (flow,
/// amount) pair is reverted against the *original* account before the row is
/// mutated, then the new effect applied against the (possibly different)
/// target account.
pub fn update(
    conn: &mut Connection,
    user_id: i64,
    id: i64,
    req: &TransactionInput,
) -> Result<Transaction> {
    validate(req)?;
    let tx = conn.transaction()?;
    let old = fetch(&tx, user_id, id)?;
    let category = categories::get(&tx, user_id, req.category_id)?;
    let account = accounts::get(&tx, user_id, req.account_id)?;
    if category.flow != req.flow {
        return Err(Error::validation(
            "category type does not match transaction type",
        ));
    }
    ledger::revert_effect(&tx, old.account_id, old.flow, old.amount)?;
    tx.execute(
        "UPDATE transactions SET account_id=?1, category_id=?2, flow=?3, amount=?4,
         description=?5, date=?6, receipt_url=?7, is_recurring=?8 WHERE id=?9",
        params![
            account.id,
            category.id,
            req.flow.as_str(),
            req.amount.to_string(),
            req.description,
            req.date.to_string(),
            req.receipt_url,
            req.is_recurring,
            old.id,
        ],
    )?;
    ledger::apply_effect(&tx, account.id, req.flow, req.amount)?;
    tx.commit()?;
    get(conn, user_id, id)
}

pub fn delete(conn: &mut Connection, user_id: i64, id: i64) -> Result<()> {
    let tx = conn.transaction()?;
    let old = fetch(&tx, user_id, id)?;
    ledger::revert_effect(&tx, old.account_id, old.flow, old.amount)?;
    tx.execute("DELETE FROM transactions WHERE id=?1", params![old.id])?;
    tx.commit()?;
    Ok(())
}

fn fetch(conn: &Connection, user_id: i64, id: i64) -> Result<Transaction> {
    conn.query_row(
        &format!("SELECT {COLS} FROM transactions WHERE id=?1 AND user_id=?2"),
        params![id, user_id],
        map_row,
    )
    .optional()?
    .ok_or(Error::NotFound("transaction"))
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Transaction> {
    fetch(conn, user_id, id)
}

pub fn list(conn: &Connection, user_id: i64, limit: Option<usize>) -> Result<Vec<Transaction>> {
    let mut sql =
        format!("SELECT {COLS} FROM transactions WHERE user_id=?1 ORDER BY date DESC, id DESC");
    if let Some(n) = limit {
        sql.push_str(&format!(" LIMIT {}", n));
    }
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn filter(
    conn: &Connection,
    user_id: i64,
    f: &TransactionFilter,
) -> Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {COLS} FROM transactions WHERE user_id=?");
    let mut params_vec: Vec<String> = vec![user_id.to_string()];

    if let Some(flow) = f.flow {
        sql.push_str(" AND flow=?");
        params_vec.push(flow.as_str().into());
    }
    if let Some(cid) = f.category_id {
        sql.push_str(" AND category_id=?");
        params_vec.push(cid.to_string());
    }
    if let Some(aid) = f.account_id {
        sql.push_str(" AND account_id=?");
        params_vec.push(aid.to_string());
    }
    if let Some(start) = f.start_date {
        sql.push_str(" AND date>=?");
        params_vec.push(start.to_string());
    }
    if let Some(end) = f.end_date {
        sql.push_str(" AND date<=?");
        params_vec.push(end.to_string());
    }
    if let Some(ref needle) = f.description {
        sql.push_str(" AND LOWER(description) LIKE '%'||LOWER(?)||'%'");
        params_vec.push(needle.clone());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let rows = stmt.query_map(rusqlite::params_from_iter(params), map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Income and expense totals over [start, end], summed as decimals on the
/// way through so TEXT-stored amounts never hit float arithmetic. Empty
/// ranges read as zero.
pub fn summary(
    conn: &Connection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Summary> {
    let mut stmt = conn.prepare(
        "SELECT flow, amount FROM transactions WHERE user_id=?1 AND date>=?2 AND date<=?3",
    )?;
    let mut rows = stmt.query(params![user_id, start.to_string(), end.to_string()])?;
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let flow_s: String = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let amount = super::read_decimal(&amount_s)?;
        match Flow::parse(&flow_s) {
            Some(Flow::Income) => income += amount,
            Some(Flow::Expense) => expense += amount,
            None => return Err(Error::Validation(format!("unknown flow '{}'", flow_s))),
        }
    }
    Ok(Summary {
        income,
        expense,
        balance: income - expense,
    })
}

pub fn recent(conn: &Connection, user_id: i64, limit: usize) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLS} FROM transactions WHERE user_id=?1
         ORDER BY date DESC, created_at DESC, id DESC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![user_id, limit as i64], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
