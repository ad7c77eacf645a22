// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly budgets per category. The spent side is never stored; progress
//! recomputes it from live expense transactions on every read, so a budget
//! can never drift from the ledger.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::engine::categories;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetProgress};

#[derive(Debug, Clone)]
pub struct BudgetInput {
    pub category_id: i64,
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
}

fn validate(req: &BudgetInput) -> Result<()> {
    if req.amount <= Decimal::ZERO {
        return Err(Error::validation("budget amount must be positive"));
    }
    if !(1..=12).contains(&req.month) {
        return Err(Error::validation("month must be between 1 and 12"));
    }
    Ok(())
}

fn map_row(r: &Row) -> rusqlite::Result<(i64, i64, i64, String, u32, i32)> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

fn from_parts(parts: (i64, i64, i64, String, u32, i32)) -> Result<Budget> {
    let (id, user_id, category_id, amount_s, month, year) = parts;
    Ok(Budget {
        id,
        user_id,
        category_id,
        amount: super::read_decimal(&amount_s)?,
        month,
        year,
    })
}

fn slot_taken(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
    month: u32,
    year: i32,
    exclude: Option<i64>,
) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM budgets
             WHERE user_id=?1 AND category_id=?2 AND month=?3 AND year=?4",
            params![user_id, category_id, month, year],
            |r| r.get(0),
        )
        .optional()?;
    Ok(match (found, exclude) {
        (Some(id), Some(skip)) => id != skip,
        (Some(_), None) => true,
        (None, _) => false,
    })
}

pub fn create(conn: &Connection, user_id: i64, req: &BudgetInput) -> Result<Budget> {
    validate(req)?;
    let category = categories::get(conn, user_id, req.category_id)?;
    if slot_taken(conn, user_id, category.id, req.month, req.year, None)? {
        return Err(Error::duplicate(
            "budget already exists for this category and month",
        ));
    }
    conn.execute(
        "INSERT INTO budgets(user_id, category_id, amount, month, year) VALUES (?1,?2,?3,?4,?5)",
        params![
            user_id,
            category.id,
            req.amount.to_string(),
            req.month,
            req.year
        ],
    )?;
    get(conn, user_id, conn.last_insert_rowid())
}

/// Update re-checks the (category, month, year) slot against every budget
/// except the one being updated, so moving a budget cannot silently land on
/// an occupied slot.
pub fn update(conn: &Connection, user_id: i64, id: i64, req: &BudgetInput) -> Result<Budget> {
    validate(req)?;
    let existing = get(conn, user_id, id)?;
    let category = categories::get(conn, user_id, req.category_id)?;
    if slot_taken(
        conn,
        user_id,
        category.id,
        req.month,
        req.year,
        Some(existing.id),
    )? {
        return Err(Error::duplicate(
            "budget already exists for this category and month",
        ));
    }
    conn.execute(
        "UPDATE budgets SET category_id=?1, amount=?2, month=?3, year=?4 WHERE id=?5",
        params![
            category.id,
            req.amount.to_string(),
            req.month,
            req.year,
            existing.id
        ],
    )?;
    get(conn, user_id, id)
}

pub fn delete(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let existing = get(conn, user_id, id)?;
    conn.execute("DELETE FROM budgets WHERE id=?1", params![existing.id])?;
    Ok(())
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Budget> {
    let parts = conn
        .query_row(
            "SELECT id, user_id, category_id, amount, month, year
             FROM budgets WHERE id=?1 AND user_id=?2",
            params![id, user_id],
            map_row,
        )
        .optional()?
        .ok_or(Error::NotFound("budget"))?;
    from_parts(parts)
}

pub fn list_month(conn: &Connection, user_id: i64, month: u32, year: i32) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, category_id, amount, month, year
         FROM budgets WHERE user_id=?1 AND month=?2 AND year=?3 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![user_id, month, year], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(from_parts(row?)?);
    }
    Ok(out)
}

/// Spent for one budget: expense transactions of its category landing in the
/// exact calendar month, summed as decimals. Zero when no rows match.
fn spent_for(conn: &Connection, budget: &Budget) -> Result<Decimal> {
    let mut stmt = conn.prepare(
        "SELECT amount FROM transactions
         WHERE user_id=?1 AND category_id=?2 AND flow='expense'
           AND CAST(strftime('%m', date) AS INTEGER)=?3
           AND CAST(strftime('%Y', date) AS INTEGER)=?4",
    )?;
    let mut rows = stmt.query(params![
        budget.user_id,
        budget.category_id,
        budget.month,
        budget.year
    ])?;
    let mut spent = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let amount_s: String = r.get(0)?;
        spent += super::read_decimal(&amount_s)?;
    }
    Ok(spent)
}

pub fn progress(
    conn: &Connection,
    user_id: i64,
    month: u32,
    year: i32,
) -> Result<Vec<BudgetProgress>> {
    let budgets = list_month(conn, user_id, month, year)?;
    let mut out = Vec::with_capacity(budgets.len());
    for budget in budgets {
        let category_name: String = conn.query_row(
            "SELECT name FROM categories WHERE id=?1",
            params![budget.category_id],
            |r| r.get(0),
        )?;
        let spent = spent_for(conn, &budget)?;
        let remaining = budget.amount - spent;
        let percentage_used = super::percentage(spent, budget.amount);
        out.push(BudgetProgress {
            budget,
            category_name,
            spent,
            remaining,
            percentage_used,
        });
    }
    Ok(out)
}
