// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction money moves: into the ledger (income) or out of it (expense).
/// Shared by transactions and categories; a transaction's flow must match
/// its category's flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Income,
    Expense,
}

impl Flow {
    pub fn opposite(self) -> Flow {
        match self {
            Flow::Income => Flow::Expense,
            Flow::Expense => Flow::Income,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flow::Income => "income",
            Flow::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Flow> {
        match s {
            "income" => Some(Flow::Income),
            "expense" => Some(Flow::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Checking,
    Savings,
    CreditCard,
    Cash,
    Investment,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::CreditCard => "credit_card",
            AccountKind::Cash => "cash",
            AccountKind::Investment => "investment",
        }
    }

    pub fn parse(s: &str) -> Option<AccountKind> {
        match s {
            "checking" => Some(AccountKind::Checking),
            "savings" => Some(AccountKind::Savings),
            "credit_card" => Some(AccountKind::CreditCard),
            "cash" => Some(AccountKind::Cash),
            "investment" => Some(AccountKind::Investment),
            _ => None,
        }
    }
}

/// Who a category belongs to. Shared categories are the seeded defaults
/// visible to every user and immutable; owned categories belong to exactly
/// one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryOwner {
    Shared,
    User(i64),
}

impl CategoryOwner {
    pub fn from_column(user_id: Option<i64>) -> CategoryOwner {
        match user_id {
            None => CategoryOwner::Shared,
            Some(id) => CategoryOwner::User(id),
        }
    }

    pub fn to_column(self) -> Option<i64> {
        match self {
            CategoryOwner::Shared => None,
            CategoryOwner::User(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub credit_limit: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub owner: CategoryOwner,
    pub name: String,
    pub flow: Flow,
    pub icon: String,
    pub color: String,
}

impl Category {
    pub fn is_default(&self) -> bool {
        self.owner == CategoryOwner::Shared
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub account_id: i64,
    pub category_id: i64,
    pub flow: Flow,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub receipt_url: Option<String>,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub month: u32, // 1..=12
    pub year: i32,
}

/// Budget plus its derived metrics for one calendar month. Never stored;
/// spent is recomputed from live transactions on every read.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetProgress {
    pub budget: Budget,
    pub category_name: String,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage_used: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    pub icon: String,
    pub completed: bool,
}

/// Income/expense totals over a date range; balance = income - expense.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}
