// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::db;
use tallybook::engine::{accounts, budgets, categories, transactions, users};
use tallybook::engine::accounts::AccountInput;
use tallybook::engine::budgets::BudgetInput;
use tallybook::engine::categories::CategoryInput;
use tallybook::engine::transactions::TransactionInput;
use tallybook::error::Error;
use tallybook::models::{AccountKind, Flow};

fn setup() -> (Connection, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    db::seed_default_categories(&conn).unwrap();
    let user = users::create(&conn, "Test User", "test@example.com", "USD").unwrap();
    (conn, user.id)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn expense_category(conn: &Connection, user_id: i64, name: &str) -> i64 {
    categories::create(
        conn,
        user_id,
        &CategoryInput {
            name: name.into(),
            flow: Flow::Expense,
            icon: String::new(),
            color: String::new(),
        },
    )
    .unwrap()
    .id
}

fn spend(conn: &mut Connection, user_id: i64, account_id: i64, category_id: i64, amount: &str, on: &str) {
    transactions::create(
        conn,
        user_id,
        &TransactionInput {
            account_id,
            category_id,
            flow: Flow::Expense,
            amount: dec(amount),
            description: String::new(),
            date: NaiveDate::parse_from_str(on, "%Y-%m-%d").unwrap(),
            receipt_url: None,
            is_recurring: false,
        },
    )
    .unwrap();
}

fn budget_input(category_id: i64, amount: &str, month: u32, year: i32) -> BudgetInput {
    BudgetInput {
        category_id,
        amount: dec(amount),
        month,
        year,
    }
}

#[test]
fn progress_recomputes_spent_from_live_transactions() {
    let (mut conn, uid) = setup();
    let acct = accounts::create(
        &conn,
        uid,
        &AccountInput {
            name: "Checking".into(),
            kind: AccountKind::Checking,
            balance: dec("0"),
            credit_limit: None,
        },
    )
    .unwrap()
    .id;
    let dining = expense_category(&conn, uid, "Dining");
    let other = expense_category(&conn, uid, "Other");
    budgets::create(&conn, uid, &budget_input(dining, "200", 8, 2025)).unwrap();

    spend(&mut conn, uid, acct, dining, "50", "2025-08-03");
    spend(&mut conn, uid, acct, dining, "25", "2025-08-20");
    // out of period and out of category: must not count
    spend(&mut conn, uid, acct, dining, "500", "2025-07-31");
    spend(&mut conn, uid, acct, other, "500", "2025-08-10");

    let progress = budgets::progress(&conn, uid, 8, 2025).unwrap();
    assert_eq!(progress.len(), 1);
    let p = &progress[0];
    assert_eq!(p.spent, dec("75"));
    assert_eq!(p.remaining, dec("125"));
    assert_eq!(p.percentage_used, dec("37.50"));
}

#[test]
fn progress_with_no_transactions_is_zero_spent() {
    let (conn, uid) = setup();
    let dining = expense_category(&conn, uid, "Dining");
    budgets::create(&conn, uid, &budget_input(dining, "200", 8, 2025)).unwrap();

    let progress = budgets::progress(&conn, uid, 8, 2025).unwrap();
    assert_eq!(progress[0].spent, Decimal::ZERO);
    assert_eq!(progress[0].remaining, dec("200"));
    assert_eq!(progress[0].percentage_used, Decimal::ZERO);
}

#[test]
fn overspend_goes_negative_without_error() {
    let (mut conn, uid) = setup();
    let acct = accounts::create(
        &conn,
        uid,
        &AccountInput {
            name: "Checking".into(),
            kind: AccountKind::Checking,
            balance: dec("0"),
            credit_limit: None,
        },
    )
    .unwrap()
    .id;
    let dining = expense_category(&conn, uid, "Dining");
    budgets::create(&conn, uid, &budget_input(dining, "100", 8, 2025)).unwrap();
    spend(&mut conn, uid, acct, dining, "150", "2025-08-05");

    let p = &budgets::progress(&conn, uid, 8, 2025).unwrap()[0];
    assert_eq!(p.remaining, dec("-50"));
    assert_eq!(p.percentage_used, dec("150"));
}

#[test]
fn duplicate_budget_rejected_and_no_row_added() {
    let (conn, uid) = setup();
    let dining = expense_category(&conn, uid, "Dining");
    budgets::create(&conn, uid, &budget_input(dining, "200", 8, 2025)).unwrap();

    let err = budgets::create(&conn, uid, &budget_input(dining, "300", 8, 2025)).unwrap_err();
    assert!(matches!(err, Error::Duplicate(_)));
    assert_eq!(budgets::list_month(&conn, uid, 8, 2025).unwrap().len(), 1);
}

#[test]
fn update_rechecks_slot_uniqueness_excluding_self() {
    let (conn, uid) = setup();
    let dining = expense_category(&conn, uid, "Dining");
    let b1 = budgets::create(&conn, uid, &budget_input(dining, "200", 8, 2025)).unwrap();
    let b2 = budgets::create(&conn, uid, &budget_input(dining, "200", 9, 2025)).unwrap();

    // moving b2 onto b1's slot is refused
    let err = budgets::update(&conn, uid, b2.id, &budget_input(dining, "250", 8, 2025)).unwrap_err();
    assert!(matches!(err, Error::Duplicate(_)));

    // amending b1 in place is fine
    let b1 = budgets::update(&conn, uid, b1.id, &budget_input(dining, "250", 8, 2025)).unwrap();
    assert_eq!(b1.amount, dec("250"));
}

#[test]
fn non_positive_amount_rejected() {
    let (conn, uid) = setup();
    let dining = expense_category(&conn, uid, "Dining");
    let err = budgets::create(&conn, uid, &budget_input(dining, "0", 8, 2025)).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn budgets_are_owner_scoped() {
    let (conn, uid) = setup();
    let other = users::create(&conn, "Other", "other@example.com", "USD").unwrap().id;
    let dining = expense_category(&conn, uid, "Dining");
    let b = budgets::create(&conn, uid, &budget_input(dining, "200", 8, 2025)).unwrap();

    assert!(matches!(
        budgets::get(&conn, other, b.id).unwrap_err(),
        Error::NotFound("budget")
    ));
    assert!(budgets::progress(&conn, other, 8, 2025).unwrap().is_empty());
}
