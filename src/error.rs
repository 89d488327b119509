// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the ledger, the reward bridge, the rollover and the
/// settings lock. Storage and CLI layers wrap these in `anyhow`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OkaneError {
    #[error("amount must be a whole number of at least 1 (got {0})")]
    InvalidAmount(i64),
    #[error("transaction title is required")]
    MissingTitle,
    #[error("work {0} not found")]
    UnknownWork(i64),
    #[error("quest {0} not found")]
    UnknownQuest(i64),
    #[error("work {id} is not scheduled on {date}")]
    WorkNotScheduled { id: i64, date: NaiveDate },
    #[error("quest {0} was already claimed today")]
    QuestAlreadyClaimed(i64),
    #[error("quest {0} has not been claimed today")]
    QuestNotClaimed(i64),
    #[error("work for {0} has already been submitted")]
    DayAlreadySubmitted(NaiveDate),
    #[error("wrong passcode")]
    WrongPasscode,
    #[error("settings are locked; unlock edit mode first")]
    SettingsLocked,
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
    #[error("amount {amount} would overflow the running total {total}")]
    BalanceOverflow { total: i64, amount: i64 },
}

pub type OkaneResult<T> = Result<T, OkaneError>;
