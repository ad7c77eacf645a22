// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::db;
use tallybook::engine::{accounts, categories, transactions, users};
use tallybook::engine::accounts::{AccountInput, AccountUpdate};
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

fn acct_input(name: &str, balance: &str) -> AccountInput {
    AccountInput {
        name: name.into(),
        kind: AccountKind::Checking,
        balance: balance.parse().unwrap(),
        credit_limit: None,
    }
}

#[test]
fn update_replaces_fields_but_never_the_balance() {
    let (conn, uid) = setup();
    let a = accounts::create(&conn, uid, &acct_input("Checking", "100")).unwrap();
    assert_eq!(a.balance, Decimal::from(100));

    let a = accounts::update(
        &conn,
        uid,
        a.id,
        &AccountUpdate {
            name: "Card".into(),
            kind: AccountKind::CreditCard,
            credit_limit: Some("5000".parse().unwrap()),
        },
    )
    .unwrap();
    assert_eq!(a.kind, AccountKind::CreditCard);
    assert_eq!(a.credit_limit, Some("5000".parse().unwrap()));
    // the running total is ledger-owned, update cannot touch it
    assert_eq!(a.balance, Decimal::from(100));
}

#[test]
fn delete_refused_while_transactions_reference_it() {
    let (mut conn, uid) = setup();
    let a = accounts::create(&conn, uid, &acct_input("Checking", "0")).unwrap();
    let salary = categories::create(
        &conn,
        uid,
        &CategoryInput {
            name: "Salary".into(),
            flow: Flow::Income,
            icon: String::new(),
            color: String::new(),
        },
    )
    .unwrap();
    let t = transactions::create(
        &mut conn,
        uid,
        &TransactionInput {
            account_id: a.id,
            category_id: salary.id,
            flow: Flow::Income,
            amount: "10".parse().unwrap(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            receipt_url: None,
            is_recurring: false,
        },
    )
    .unwrap();

    let err = accounts::delete(&conn, uid, a.id).unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    transactions::delete(&mut conn, uid, t.id).unwrap();
    accounts::delete(&conn, uid, a.id).unwrap();
    assert!(matches!(
        accounts::get(&conn, uid, a.id).unwrap_err(),
        Error::NotFound("account")
    ));
}

#[test]
fn accounts_are_owner_scoped() {
    let (conn, uid) = setup();
    let other = users::create(&conn, "Other", "other@example.com", "USD").unwrap().id;
    let a = accounts::create(&conn, uid, &acct_input("Checking", "0")).unwrap();

    assert!(matches!(
        accounts::get(&conn, other, a.id).unwrap_err(),
        Error::NotFound("account")
    ));
    assert!(accounts::list(&conn, other).unwrap().is_empty());
}

#[test]
fn duplicate_email_rejected() {
    let (conn, _uid) = setup();
    let err = users::create(&conn, "Again", "test@example.com", "EUR").unwrap_err();
    assert!(matches!(err, Error::Duplicate(_)));
}
