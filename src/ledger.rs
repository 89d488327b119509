// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Append-only transaction ledger with a running balance.
//!
//! Every transaction carries the balance *after* it was applied, so the
//! sequence can be rendered as a passbook without recomputation. The only
//! mutation is [`Ledger::append`], which validates the request before
//! touching the sequence.

use crate::error::{OkaneError, OkaneResult};
use crate::models::{Category, Transaction, TransactionRequest};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// One point of the balance chart: the balance after a transaction plus its
/// income/expense split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub balance: i64,
    pub income: i64,
    pub expense: i64,
}

impl From<&Transaction> for ChartPoint {
    fn from(t: &Transaction) -> Self {
        let (income, expense) = match t.category {
            Category::Income => (t.amount, 0),
            Category::Expense => (0, t.amount),
        };
        Self {
            timestamp: t.timestamp,
            balance: t.balance,
            income,
            expense,
        }
    }
}

/// A stored row whose balance disagreed with the recomputed running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceMismatch {
    pub id: i64,
    pub stored: i64,
    pub expected: i64,
}

/// Running total after one more row, or `BalanceOverflow`.
fn apply(total: i64, category: Category, amount: i64) -> OkaneResult<i64> {
    let next = match category {
        Category::Income => total.checked_add(amount),
        Category::Expense => total.checked_sub(amount),
    };
    next.ok_or(OkaneError::BalanceOverflow { total, amount })
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored rows. Rows are ordered by id and their
    /// balances recomputed; disagreeing rows are returned alongside.
    pub fn restore(mut rows: Vec<Transaction>) -> OkaneResult<(Self, Vec<BalanceMismatch>)> {
        rows.sort_by_key(|t| t.id);
        let mut mismatches = Vec::new();
        let mut running = 0i64;
        for t in rows.iter_mut() {
            running = apply(running, t.category, t.amount)?;
            if t.balance != running {
                mismatches.push(BalanceMismatch {
                    id: t.id,
                    stored: t.balance,
                    expected: running,
                });
                t.balance = running;
            }
        }
        for m in &mismatches {
            tracing::warn!(
                id = m.id,
                stored = m.stored,
                expected = m.expected,
                "stored balance disagrees with running total"
            );
        }
        Ok((Self { transactions: rows }, mismatches))
    }

    pub fn validate(req: &TransactionRequest) -> OkaneResult<()> {
        if req.amount < 1 {
            return Err(OkaneError::InvalidAmount(req.amount));
        }
        if req.title.trim().is_empty() {
            return Err(OkaneError::MissingTitle);
        }
        Ok(())
    }

    /// Build the row `req` would append, without appending it.
    pub fn prepare(&self, req: TransactionRequest, at: DateTime<Utc>) -> OkaneResult<Transaction> {
        Self::validate(&req)?;
        let balance = apply(self.balance(), req.category, req.amount)?;
        Ok(Transaction {
            id: self.next_id(),
            timestamp: at,
            amount: req.amount,
            title: req.title.trim().to_string(),
            note: req.note,
            category: req.category,
            balance,
            is_valid: true,
        })
    }

    /// Push a row produced by [`Ledger::prepare`] on this same ledger.
    pub(crate) fn commit(&mut self, tx: Transaction) -> &Transaction {
        debug_assert_eq!(tx.id, self.next_id());
        tracing::debug!(id = tx.id, amount = tx.amount, category = %tx.category, balance = tx.balance, "append");
        self.transactions.push(tx);
        &self.transactions[self.transactions.len() - 1]
    }

    /// Validate and append a transaction, returning the stored row.
    pub fn append(&mut self, req: TransactionRequest, at: DateTime<Utc>) -> OkaneResult<&Transaction> {
        let tx = self.prepare(req, at)?;
        Ok(self.commit(tx))
    }

    pub fn balance(&self) -> i64 {
        self.transactions.last().map(|t| t.balance).unwrap_or(0)
    }

    /// One past the highest stored id, so gaps left in storage are never reused.
    pub fn next_id(&self) -> i64 {
        self.transactions.last().map(|t| t.id + 1).unwrap_or(1)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn last(&self) -> Option<&Transaction> {
        self.transactions.last()
    }

    /// Chronological history.
    pub fn history(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Transactions at or after `since`, lazily mapped to chart points.
    pub fn query_window(&self, since: DateTime<Utc>) -> impl Iterator<Item = ChartPoint> + '_ {
        self.transactions
            .iter()
            .filter(move |t| t.timestamp >= since)
            .map(ChartPoint::from)
    }

    /// Trailing window of `days` days ending at `now`.
    pub fn chart_series(&self, now: DateTime<Utc>, days: i64) -> Vec<ChartPoint> {
        self.query_window(now - Duration::days(days)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn first_income_sets_balance() {
        let mut ledger = Ledger::new();
        let t = ledger
            .append(TransactionRequest::income(500, "allowance"), at(1))
            .unwrap();
        assert_eq!(t.id, 1);
        assert_eq!(t.balance, 500);
        assert!(t.is_valid);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn expense_can_overdraw() {
        let mut ledger = Ledger::new();
        ledger
            .append(TransactionRequest::income(100, "allowance"), at(1))
            .unwrap();
        let t = ledger
            .append(TransactionRequest::expense(250, "toy"), at(2))
            .unwrap();
        assert_eq!(t.balance, -150);
        assert_eq!(t.id, 2);
    }

    #[test]
    fn invalid_requests_leave_ledger_untouched() {
        let mut ledger = Ledger::new();
        ledger
            .append(TransactionRequest::income(100, "allowance"), at(1))
            .unwrap();
        assert_eq!(
            ledger
                .append(TransactionRequest::income(0, "nothing"), at(2))
                .unwrap_err(),
            OkaneError::InvalidAmount(0)
        );
        assert_eq!(
            ledger
                .append(TransactionRequest::expense(10, "   "), at(2))
                .unwrap_err(),
            OkaneError::MissingTitle
        );
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.balance(), 100);
    }

    #[test]
    fn overflowing_append_is_rejected() {
        let mut ledger = Ledger::new();
        ledger
            .append(TransactionRequest::income(i64::MAX, "jackpot"), at(1))
            .unwrap();
        assert_eq!(
            ledger
                .append(TransactionRequest::income(1, "one more"), at(2))
                .unwrap_err(),
            OkaneError::BalanceOverflow {
                total: i64::MAX,
                amount: 1
            }
        );
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.balance(), i64::MAX);

        let t = ledger
            .append(TransactionRequest::expense(i64::MAX, "spent it"), at(2))
            .unwrap();
        assert_eq!(t.balance, 0);
    }

    #[test]
    fn restore_rejects_overflowing_rows() {
        let mut ledger = Ledger::new();
        ledger
            .append(TransactionRequest::income(i64::MAX, "a"), at(1))
            .unwrap();
        let mut rows = ledger.history().to_vec();
        let mut extra = rows[0].clone();
        extra.id = 2;
        rows.push(extra);
        assert!(matches!(
            Ledger::restore(rows),
            Err(OkaneError::BalanceOverflow { .. })
        ));
    }

    #[test]
    fn ids_continue_after_gaps() {
        let mut ledger = Ledger::new();
        for day in 1..=3 {
            ledger
                .append(TransactionRequest::income(10, "allowance"), at(day))
                .unwrap();
        }
        let mut rows = ledger.history().to_vec();
        rows[2].id = 4;
        rows.remove(1);
        rows[1].balance = 20;
        let (mut restored, mismatches) = Ledger::restore(rows).unwrap();
        assert!(mismatches.is_empty());
        assert_eq!(restored.next_id(), 5);
        let t = restored
            .append(TransactionRequest::expense(5, "sticker"), at(4))
            .unwrap();
        assert_eq!((t.id, t.balance), (5, 15));
    }

    #[test]
    fn chart_window_includes_its_first_instant() {
        let mut ledger = Ledger::new();
        let start = at(1);
        ledger
            .append(
                TransactionRequest::income(100, "too old"),
                start - Duration::seconds(1),
            )
            .unwrap();
        ledger
            .append(TransactionRequest::income(200, "edge"), start)
            .unwrap();
        ledger
            .append(TransactionRequest::expense(50, "recent"), at(20))
            .unwrap();
        let points = ledger.chart_series(start + Duration::days(30), 30);
        let balances: Vec<i64> = points.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![300, 250]);
        assert_eq!(ledger.chart_series(start + Duration::days(30), 29).len(), 1);
    }

    #[test]
    fn window_filters_and_splits() {
        let mut ledger = Ledger::new();
        ledger
            .append(TransactionRequest::income(1000, "gift"), at(1))
            .unwrap();
        ledger
            .append(TransactionRequest::expense(200, "snack"), at(10))
            .unwrap();
        ledger
            .append(TransactionRequest::income(50, "quest"), at(20))
            .unwrap();
        let points: Vec<_> = ledger.query_window(at(10)).collect();
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].income, points[0].expense, points[0].balance), (0, 200, 800));
        assert_eq!((points[1].income, points[1].expense, points[1].balance), (50, 0, 850));
    }

    #[test]
    fn restore_recomputes_bad_balances() {
        let mut ledger = Ledger::new();
        ledger
            .append(TransactionRequest::income(100, "a"), at(1))
            .unwrap();
        ledger
            .append(TransactionRequest::expense(30, "b"), at(2))
            .unwrap();
        let mut rows = ledger.history().to_vec();
        rows[1].balance = 999;
        rows.reverse();
        let (restored, mismatches) = Ledger::restore(rows).unwrap();
        assert_eq!(restored.balance(), 70);
        assert_eq!(
            mismatches,
            vec![BalanceMismatch {
                id: 2,
                stored: 999,
                expected: 70
            }]
        );
    }

    proptest! {
        #[test]
        fn balance_is_sum_of_signed_amounts(ops in prop::collection::vec((1i64..10_000, any::<bool>()), 1..40)) {
            let mut ledger = Ledger::new();
            let mut expected = 0i64;
            for (k, (amount, income)) in ops.iter().enumerate() {
                let req = if *income {
                    TransactionRequest::income(*amount, "in")
                } else {
                    TransactionRequest::expense(*amount, "out")
                };
                expected += if *income { *amount } else { -*amount };
                let t = ledger.append(req, at(1)).unwrap();
                prop_assert_eq!(t.balance, expected);
                prop_assert_eq!(t.id, k as i64 + 1);
            }
        }
    }
}
