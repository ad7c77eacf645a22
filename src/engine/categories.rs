// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{Error, Result};
use crate::models::{Category, CategoryOwner, Flow};

#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub flow: Flow,
    pub icon: String,
    pub color: String,
}

fn map_row(r: &Row) -> rusqlite::Result<(i64, Option<i64>, String, String, String, String)> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

fn from_parts(parts: (i64, Option<i64>, String, String, String, String)) -> Result<Category> {
    let (id, owner_col, name, flow_s, icon, color) = parts;
    let flow = Flow::parse(&flow_s)
        .ok_or_else(|| Error::Validation(format!("unknown flow '{}'", flow_s)))?;
    Ok(Category {
        id,
        owner: CategoryOwner::from_column(owner_col),
        name,
        flow,
        icon,
        color,
    })
}

/// Categories a user may reference: their own plus the shared defaults.
/// Anything else reads as not found, same as a missing row.
pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Category> {
    let parts = conn
        .query_row(
            "SELECT id, user_id, name, flow, icon, color FROM categories
             WHERE id=?1 AND (user_id IS NULL OR user_id=?2)",
            params![id, user_id],
            map_row,
        )
        .optional()?
        .ok_or(Error::NotFound("category"))?;
    from_parts(parts)
}

pub fn create(conn: &Connection, user_id: i64, req: &CategoryInput) -> Result<Category> {
    conn.execute(
        "INSERT INTO categories(user_id, name, flow, icon, color) VALUES (?1,?2,?3,?4,?5)",
        params![user_id, req.name, req.flow.as_str(), req.icon, req.color],
    )?;
    get(conn, user_id, conn.last_insert_rowid())
}

pub fn update(conn: &Connection, user_id: i64, id: i64, req: &CategoryInput) -> Result<Category> {
    let category = get(conn, user_id, id)?;
    if category.is_default() {
        return Err(Error::conflict("cannot update default categories"));
    }
    conn.execute(
        "UPDATE categories SET name=?1, flow=?2, icon=?3, color=?4 WHERE id=?5",
        params![req.name, req.flow.as_str(), req.icon, req.color, category.id],
    )?;
    get(conn, user_id, id)
}

pub fn delete(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let category = get(conn, user_id, id)?;
    if category.is_default() {
        return Err(Error::conflict("cannot delete default categories"));
    }
    let in_use: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM transactions WHERE category_id=?1 LIMIT 1",
            params![category.id],
            |r| r.get(0),
        )
        .optional()?;
    if in_use.is_some() {
        return Err(Error::conflict(
            "cannot delete category with existing transactions",
        ));
    }
    conn.execute("DELETE FROM categories WHERE id=?1", params![category.id])?;
    Ok(())
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, flow, icon, color FROM categories
         WHERE user_id IS NULL OR user_id=?1 ORDER BY flow, name",
    )?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(from_parts(row?)?);
    }
    Ok(out)
}

pub fn list_by_flow(conn: &Connection, user_id: i64, flow: Flow) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, flow, icon, color FROM categories
         WHERE (user_id IS NULL OR user_id=?1) AND flow=?2 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![user_id, flow.as_str()], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(from_parts(row?)?);
    }
    Ok(out)
}
