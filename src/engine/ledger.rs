// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account balance mutation. The balance is a stored running total whose
//! invariant is `balance == Σ effect(t)` over the account's live
//! transactions; these two functions are the only writers. Callers must pair
//! one apply per logical mutation (and one revert per undo) inside the same
//! database transaction as the row write they reconcile.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::Flow;

/// Fold one transaction effect into the account balance. Income adds,
/// expense subtracts; no floor check, a negative balance represents
/// overdraft or credit use.
pub fn apply_effect(conn: &Connection, account_id: i64, flow: Flow, amount: Decimal) -> Result<()> {
    let balance_s: String = conn
        .query_row(
            "SELECT balance FROM accounts WHERE id=?1",
            params![account_id],
            |r| r.get(0),
        )
        .optional()?
        .ok_or(Error::NotFound("account"))?;
    let balance = super::read_decimal(&balance_s)?;
    let next = match flow {
        Flow::Income => balance + amount,
        Flow::Expense => balance - amount,
    };
    conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![next.to_string(), account_id],
    )?;
    Ok(())
}

/// Undo a previously applied effect: apply with the opposite flow.
pub fn revert_effect(
    conn: &Connection,
    account_id: i64,
    flow: Flow,
    amount: Decimal,
) -> Result<()> {
    apply_effect(conn, account_id, flow.opposite(), amount)
}
