// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Income,
    Expense,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income => "income",
            Category::Expense => "expense",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "deposit" => Ok(Category::Income),
            "expense" | "withdrawal" => Ok(Category::Expense),
            other => Err(anyhow::anyhow!(
                "Invalid category '{}', expected income|expense",
                other
            )),
        }
    }
}

/// Recurrence unit shared by works, quests and payment schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Span {
    Weekly,
    Monthly,
}

impl Span {
    pub fn as_str(&self) -> &'static str {
        match self {
            Span::Weekly => "weekly",
            Span::Monthly => "monthly",
        }
    }

    /// Inclusive range of day values this span accepts.
    pub fn day_range(&self) -> (u8, u8) {
        match self {
            Span::Weekly => (0, 6),
            Span::Monthly => (1, 31),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Span {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Span::Weekly),
            "monthly" => Ok(Span::Monthly),
            other => Err(anyhow::anyhow!(
                "Invalid span '{}', expected weekly|monthly",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub amount: i64,
    pub title: String,
    pub note: String,
    pub category: Category,
    pub balance: i64,
    pub is_valid: bool,
}

impl Transaction {
    /// Signed effect of this transaction on the balance.
    pub fn delta(&self) -> i64 {
        match self.category {
            Category::Income => self.amount,
            Category::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub amount: i64,
    pub title: String,
    pub note: String,
    pub category: Category,
}

impl TransactionRequest {
    pub fn income(amount: i64, title: impl Into<String>) -> Self {
        Self {
            amount,
            title: title.into(),
            note: String::new(),
            category: Category::Income,
        }
    }

    pub fn expense(amount: i64, title: impl Into<String>) -> Self {
        Self {
            amount,
            title: title.into(),
            note: String::new(),
            category: Category::Expense,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// A recurring chore from the work catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub id: i64,
    pub title: String,
    pub note: String,
    pub reward: i64,
    pub is_valid: bool,
    pub execution_span: Span,
    pub execution_days: BTreeSet<u8>,
}

/// An ad hoc bonus action on the quest board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub reward: i64,
    pub is_valid: bool,
    pub frequency: Span,
    pub execution_days: BTreeSet<u8>,
}

/// A work on today's list together with its completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledWork {
    pub work: Work,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: i64,
    pub title: String,
    pub reward: i64,
}

impl From<&Work> for TaskSummary {
    fn from(w: &Work) -> Self {
        Self {
            id: w.id,
            title: w.title.clone(),
            reward: w.reward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Written when the day's work was explicitly finished.
    Submitted,
    /// Written by the rollover catch-up for a day that was not finished.
    Backfill,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Submitted => "submitted",
            RecordKind::Backfill => "backfill",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWorkRecord {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub kind: RecordKind,
    pub scheduled_tasks_count: usize,
    pub completed_tasks_count: usize,
    pub max_possible_reward: i64,
    pub earned_reward: i64,
    pub scheduled_tasks: Vec<TaskSummary>,
    pub completed_tasks: Vec<TaskSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkDay {
    Open,
    Completed,
}

/// Per-day completion state owned by the scheduler and the reward bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayState {
    pub date: NaiveDate,
    pub status: WorkDay,
    #[serde(default)]
    pub completed_works: BTreeSet<i64>,
    #[serde(default)]
    pub completed_quests: BTreeSet<i64>,
    #[serde(default = "first_record_id")]
    pub next_record_id: i64,
    #[serde(default)]
    pub paid_through_record: i64,
}

fn first_record_id() -> i64 {
    1
}

impl DayState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            status: WorkDay::Open,
            completed_works: BTreeSet::new(),
            completed_quests: BTreeSet::new(),
            next_record_id: first_record_id(),
            paid_through_record: 0,
        }
    }

    pub fn take_record_id(&mut self) -> i64 {
        let id = self.next_record_id;
        self.next_record_id += 1;
        id
    }
}
