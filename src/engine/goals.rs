// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Savings goals. completed always equals (current >= target); it is
//! re-evaluated on every contribution and update, so lowering a target below
//! the accumulated amount auto-completes the goal.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::Goal;

#[derive(Debug, Clone)]
pub struct GoalInput {
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    pub icon: String,
}

fn validate(req: &GoalInput) -> Result<()> {
    if req.target_amount <= Decimal::ZERO {
        return Err(Error::validation("target amount must be positive"));
    }
    Ok(())
}

fn map_row(
    r: &Row,
) -> rusqlite::Result<(i64, i64, String, String, String, Option<NaiveDate>, String, bool)> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
    ))
}

fn from_parts(
    parts: (i64, i64, String, String, String, Option<NaiveDate>, String, bool),
) -> Result<Goal> {
    let (id, user_id, name, target_s, current_s, deadline, icon, completed) = parts;
    Ok(Goal {
        id,
        user_id,
        name,
        target_amount: super::read_decimal(&target_s)?,
        current_amount: super::read_decimal(&current_s)?,
        deadline,
        icon,
        completed,
    })
}

const COLS: &str = "id, user_id, name, target_amount, current_amount, deadline, icon, completed";

pub fn create(conn: &Connection, user_id: i64, req: &GoalInput) -> Result<Goal> {
    validate(req)?;
    conn.execute(
        "INSERT INTO goals(user_id, name, target_amount, current_amount, deadline, icon, completed)
         VALUES (?1,?2,?3,'0',?4,?5,0)",
        params![
            user_id,
            req.name,
            req.target_amount.to_string(),
            req.deadline.map(|d| d.to_string()),
            req.icon,
        ],
    )?;
    get(conn, user_id, conn.last_insert_rowid())
}

pub fn update(conn: &Connection, user_id: i64, id: i64, req: &GoalInput) -> Result<Goal> {
    validate(req)?;
    let goal = get(conn, user_id, id)?;
    let completed = goal.current_amount >= req.target_amount;
    conn.execute(
        "UPDATE goals SET name=?1, target_amount=?2, deadline=?3, icon=?4, completed=?5 WHERE id=?6",
        params![
            req.name,
            req.target_amount.to_string(),
            req.deadline.map(|d| d.to_string()),
            req.icon,
            completed,
            goal.id,
        ],
    )?;
    get(conn, user_id, id)
}

/// Add to the accumulated amount. The contribution is taken as supplied;
/// it is not capped to the remaining need and may overshoot the target.
pub fn contribute(conn: &mut Connection, user_id: i64, id: i64, amount: Decimal) -> Result<Goal> {
    let tx = conn.transaction()?;
    let goal = get(&tx, user_id, id)?;
    let current = goal.current_amount + amount;
    let completed = current >= goal.target_amount;
    tx.execute(
        "UPDATE goals SET current_amount=?1, completed=?2 WHERE id=?3",
        params![current.to_string(), completed, goal.id],
    )?;
    tx.commit()?;
    get(conn, user_id, id)
}

pub fn delete(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let goal = get(conn, user_id, id)?;
    conn.execute("DELETE FROM goals WHERE id=?1", params![goal.id])?;
    Ok(())
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Goal> {
    let parts = conn
        .query_row(
            &format!("SELECT {COLS} FROM goals WHERE id=?1 AND user_id=?2"),
            params![id, user_id],
            map_row,
        )
        .optional()?
        .ok_or(Error::NotFound("goal"))?;
    from_parts(parts)
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Goal>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {COLS} FROM goals WHERE user_id=?1 ORDER BY id"))?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(from_parts(row?)?);
    }
    Ok(out)
}

pub fn list_active(conn: &Connection, user_id: i64) -> Result<Vec<Goal>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLS} FROM goals WHERE user_id=?1 AND completed=0 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(from_parts(row?)?);
    }
    Ok(out)
}

pub fn progress_percentage(goal: &Goal) -> Decimal {
    super::percentage(goal.current_amount, goal.target_amount)
}
