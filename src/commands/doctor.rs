// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Consistency audit. The stored balance of every account must equal its
/// opening balance plus the folded effects of its live transactions;
/// anything else is drift. Also reports rows pointing at missing accounts
/// or categories, and goals whose completed flag disagrees with the amounts.
pub fn handle(conn: &Connection) -> Result<()> {
    let rows = audit(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn audit(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Balance drift per account: stored must equal opening plus the
    //    folded effects of live transactions
    let mut stmt = conn.prepare("SELECT id, name, balance, opening_balance FROM accounts")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let stored_s: String = r.get(2)?;
        let opening_s: String = r.get(3)?;
        let stored = stored_s
            .parse::<Decimal>()
            .unwrap_or(Decimal::ZERO);

        let mut tstmt =
            conn.prepare("SELECT flow, amount FROM transactions WHERE account_id=?1")?;
        let mut trs = tstmt.query([id])?;
        let mut derived = opening_s.parse::<Decimal>().unwrap_or(Decimal::ZERO);
        while let Some(t) = trs.next()? {
            let flow: String = t.get(0)?;
            let amount_s: String = t.get(1)?;
            let amount = amount_s.parse::<Decimal>().unwrap_or(Decimal::ZERO);
            if flow == "income" {
                derived += amount;
            } else {
                derived -= amount;
            }
        }
        if derived != stored {
            rows.push(vec![
                "balance_drift".into(),
                format!("account '{}': stored {} derived {}", name, stored, derived),
            ]);
        }
    }

    // 2) Orphaned references
    let mut stmt2 = conn.prepare(
        "SELECT t.id FROM transactions t LEFT JOIN accounts a ON t.account_id=a.id WHERE a.id IS NULL",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["txn_missing_account".into(), format!("transaction {}", id)]);
    }
    let mut stmt3 = conn.prepare(
        "SELECT t.id FROM transactions t LEFT JOIN categories c ON t.category_id=c.id WHERE c.id IS NULL",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["txn_missing_category".into(), format!("transaction {}", id)]);
    }

    // 3) Goals whose completed flag disagrees with the amounts
    let mut stmt4 =
        conn.prepare("SELECT id, name, target_amount, current_amount, completed FROM goals")?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let _id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let target = r.get::<_, String>(2)?.parse::<Decimal>().unwrap_or(Decimal::ZERO);
        let current = r.get::<_, String>(3)?.parse::<Decimal>().unwrap_or(Decimal::ZERO);
        let completed: bool = r.get(4)?;
        if completed != (current >= target) {
            rows.push(vec![
                "goal_flag_drift".into(),
                format!("goal '{}': completed={} current={} target={}", name, completed, current, target),
            ]);
        }
    }

    Ok(rows)
}
