// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger consistency engine. Every operation takes an explicit user id
//! supplied by the caller and scopes its queries by it; nothing in here reads
//! ambient identity. Account balances are only ever touched through
//! [`ledger`], and only [`transactions`] calls into it.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod goals;
pub mod ledger;
pub mod transactions;
pub mod users;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};

pub(crate) fn read_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>().map_err(|_| Error::Decimal(s.into()))
}

/// part/whole as a 0-100(+) percentage, 4-decimal half-up intermediate.
/// A zero denominator yields 0 rather than a panic; creation paths reject
/// zero amounts, so this only matters for rows predating that rule.
pub(crate) fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::ONE_HUNDRED
}
