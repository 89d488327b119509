// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Daily rollover: snapshots of the work day and the reset at date change.

use crate::error::{OkaneError, OkaneResult};
use crate::models::{DailyWorkRecord, DayState, RecordKind, TaskSummary, Work, WorkDay};
use crate::scheduler;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

pub const DEFAULT_BACKFILL_DAYS: i64 = 7;

/// Sum of task rewards, or `BalanceOverflow` if it leaves `i64`.
fn reward_total<'a>(tasks: impl IntoIterator<Item = &'a TaskSummary>) -> OkaneResult<i64> {
    tasks.into_iter().try_fold(0i64, |total, t| {
        total
            .checked_add(t.reward)
            .ok_or(OkaneError::BalanceOverflow {
                total,
                amount: t.reward,
            })
    })
}

fn snapshot(
    day: &mut DayState,
    catalog: &[Work],
    date: NaiveDate,
    kind: RecordKind,
    completed: &BTreeSet<i64>,
    user_id: i64,
) -> OkaneResult<DailyWorkRecord> {
    let scheduled: Vec<TaskSummary> = scheduler::todays_work(catalog, date)
        .iter()
        .map(|s| TaskSummary::from(&s.work))
        .collect();
    let done: Vec<TaskSummary> = scheduled
        .iter()
        .filter(|t| completed.contains(&t.id))
        .cloned()
        .collect();
    let max_possible_reward = reward_total(&scheduled)?;
    let earned_reward = reward_total(&done)?;
    Ok(DailyWorkRecord {
        id: day.take_record_id(),
        user_id,
        date,
        kind,
        scheduled_tasks_count: scheduled.len(),
        completed_tasks_count: done.len(),
        max_possible_reward,
        earned_reward,
        scheduled_tasks: scheduled,
        completed_tasks: done,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct Rollover {
    pub backfill_limit: i64,
    pub user_id: i64,
}

impl Default for Rollover {
    fn default() -> Self {
        Self {
            backfill_limit: DEFAULT_BACKFILL_DAYS,
            user_id: 1,
        }
    }
}

impl Rollover {
    pub fn new(backfill_limit: i64, user_id: i64) -> Self {
        Self {
            backfill_limit: backfill_limit.max(0),
            user_id,
        }
    }

    /// `Open -> Completed`: snapshot today's list with its completion flags.
    pub fn finish_day(&self, day: &mut DayState, catalog: &[Work]) -> OkaneResult<DailyWorkRecord> {
        if day.status == WorkDay::Completed {
            return Err(OkaneError::DayAlreadySubmitted(day.date));
        }
        let completed = day.completed_works.clone();
        let date = day.date;
        let record = snapshot(
            day,
            catalog,
            date,
            RecordKind::Submitted,
            &completed,
            self.user_id,
        )?;
        day.status = WorkDay::Completed;
        tracing::info!(
            date = %record.date,
            scheduled = record.scheduled_tasks_count,
            completed = record.completed_tasks_count,
            earned = record.earned_reward,
            "daily work submitted"
        );
        Ok(record)
    }

    /// Dates to backfill when moving from `last` to `today`.
    pub fn backfill_dates(&self, last: NaiveDate, today: NaiveDate) -> Vec<NaiveDate> {
        let days = (today - last).num_days();
        if days <= 0 {
            return Vec::new();
        }
        let count = days.min(self.backfill_limit);
        (0..count)
            .rev()
            .map(|back| today - Duration::days(back))
            .collect()
    }

    /// Compare the stored day with `today`. On a date change, emit backfill
    /// records, clear completion state and reopen the day. `None` when the
    /// date has not changed. On error `day` may be partly advanced; callers
    /// work on a copy.
    pub fn check(
        &self,
        day: &mut DayState,
        catalog: &[Work],
        today: NaiveDate,
    ) -> OkaneResult<Option<Vec<DailyWorkRecord>>> {
        if day.date == today {
            return Ok(None);
        }
        let last = day.date;
        let empty = BTreeSet::new();
        let records = self
            .backfill_dates(last, today)
            .into_iter()
            .map(|date| snapshot(day, catalog, date, RecordKind::Backfill, &empty, self.user_id))
            .collect::<OkaneResult<Vec<DailyWorkRecord>>>()?;
        if today < last {
            tracing::warn!(%last, %today, "calendar moved backwards; resetting day");
        }
        day.date = today;
        day.status = WorkDay::Open;
        day.completed_works.clear();
        day.completed_quests.clear();
        tracing::info!(%last, %today, backfilled = records.len(), "day rolled over");
        Ok(Some(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Span;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn catalog() -> Vec<Work> {
        let every_day: BTreeSet<u8> = (0..=6).collect();
        vec![
            Work {
                id: 1,
                title: "put laundry away".into(),
                note: String::new(),
                reward: 60,
                is_valid: true,
                execution_span: Span::Weekly,
                execution_days: [1, 2, 3, 4, 5].into_iter().collect(),
            },
            Work {
                id: 2,
                title: "line up shoes".into(),
                note: String::new(),
                reward: 80,
                is_valid: true,
                execution_span: Span::Weekly,
                execution_days: every_day,
            },
        ]
    }

    #[test]
    fn finishing_counts_and_sums() {
        // Wednesday: both works scheduled.
        let mut day = DayState::new(d(2024, 10, 16));
        day.completed_works.insert(2);
        let record = Rollover::default().finish_day(&mut day, &catalog()).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.kind, RecordKind::Submitted);
        assert_eq!(record.scheduled_tasks_count, 2);
        assert_eq!(record.completed_tasks_count, 1);
        assert_eq!(record.max_possible_reward, 140);
        assert_eq!(record.earned_reward, 80);
        assert_eq!(day.status, WorkDay::Completed);
        assert_eq!(
            Rollover::default().finish_day(&mut day, &catalog()),
            Err(OkaneError::DayAlreadySubmitted(d(2024, 10, 16)))
        );
    }

    #[test]
    fn same_day_is_a_no_op() {
        let mut day = DayState::new(d(2024, 10, 16));
        day.completed_works.insert(2);
        assert!(
            Rollover::default()
                .check(&mut day, &catalog(), d(2024, 10, 16))
                .unwrap()
                .is_none()
        );
        assert!(day.completed_works.contains(&2));
    }

    #[test]
    fn short_gap_backfills_every_day() {
        let mut day = DayState::new(d(2024, 10, 16));
        day.status = WorkDay::Completed;
        day.completed_works.insert(2);
        day.completed_quests.insert(1);
        let records = Rollover::default()
            .check(&mut day, &catalog(), d(2024, 10, 19))
            .unwrap()
            .unwrap();
        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2024, 10, 17), d(2024, 10, 18), d(2024, 10, 19)]);
        // Saturday only has the every-day work.
        assert_eq!(records[2].scheduled_tasks_count, 1);
        assert!(records.iter().all(|r| r.completed_tasks_count == 0));
        assert_eq!(day.date, d(2024, 10, 19));
        assert_eq!(day.status, WorkDay::Open);
        assert!(day.completed_works.is_empty());
        assert!(day.completed_quests.is_empty());
    }

    #[test]
    fn long_gap_is_capped_at_seven() {
        let mut day = DayState::new(d(2024, 10, 6));
        let records = Rollover::default()
            .check(&mut day, &catalog(), d(2024, 10, 16))
            .unwrap()
            .unwrap();
        assert_eq!(records.len(), 7);
        assert_eq!(records[0].date, d(2024, 10, 10));
        assert_eq!(records[6].date, d(2024, 10, 16));
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn backwards_clock_resets_without_records() {
        let mut day = DayState::new(d(2024, 10, 16));
        day.completed_works.insert(2);
        let records = Rollover::default()
            .check(&mut day, &catalog(), d(2024, 10, 15))
            .unwrap()
            .unwrap();
        assert!(records.is_empty());
        assert_eq!(day.date, d(2024, 10, 15));
        assert!(day.completed_works.is_empty());
    }

    #[test]
    fn overflowing_rewards_fail_the_submission() {
        let mut works = catalog();
        works[0].reward = i64::MAX;
        let mut day = DayState::new(d(2024, 10, 16));
        day.completed_works.insert(1);
        day.completed_works.insert(2);
        assert!(matches!(
            Rollover::default().finish_day(&mut day, &works),
            Err(OkaneError::BalanceOverflow { .. })
        ));
        assert_eq!(day.status, WorkDay::Open);
    }
}
