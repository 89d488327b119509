// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Application service: the one entry point front ends talk to.
//!
//! `Okane` owns the ledger and today's state and persists every change
//! through the injected [`Repository`]. Mutations work on a copy of the day
//! state and only swap it in after the repository accepted the write.

use crate::config::AppConfig;
use crate::error::OkaneError;
use crate::interest;
use crate::ledger::{BalanceMismatch, ChartPoint, Ledger};
use crate::models::{
    DailyWorkRecord, DayState, Quest, RecordKind, ScheduledWork, Span, Transaction,
    TransactionRequest, Work,
};
use crate::repo::Repository;
use crate::rewards;
use crate::rollover::Rollover;
use crate::scheduler;
use crate::settings::{Section, Settings, SettingsEditor};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardQuest {
    pub quest: Quest,
    pub claimed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterestProjection {
    pub balance: i64,
    /// Percent per period.
    pub rate: Decimal,
    pub next_interest: i64,
    pub next_payment: Option<NaiveDate>,
}

/// Log a failed load and carry on with the fallback value.
fn or_fallback<T>(loaded: Result<T>, what: &str, fallback: impl FnOnce() -> T) -> T {
    match loaded {
        Ok(v) => v,
        Err(err) => {
            tracing::error!("failed to load {what}: {err:#}");
            fallback()
        }
    }
}

pub struct Okane<R: Repository> {
    repo: R,
    ledger: Ledger,
    mismatches: Vec<BalanceMismatch>,
    works: Vec<Work>,
    quests: Vec<Quest>,
    settings: Settings,
    day: DayState,
    rollover: Rollover,
    config: AppConfig,
}

impl<R: Repository> Okane<R> {
    /// Load everything from `repo` and run the on-load rollover check.
    pub fn load(repo: R, config: &AppConfig, today: NaiveDate) -> Result<Self> {
        let (ledger, mismatches) =
            Ledger::restore(or_fallback(repo.transactions(), "transactions", Vec::new))?;
        let works = or_fallback(repo.works(), "works", Vec::new);
        let quests = or_fallback(repo.quests(), "quests", Vec::new);
        let settings = or_fallback(repo.settings(), "settings", Settings::default);
        let stored_day = or_fallback(repo.day_state(), "day state", || None);
        let fresh = stored_day.is_none();
        let day = stored_day.unwrap_or_else(|| DayState::new(today));

        let mut app = Self {
            repo,
            ledger,
            mismatches,
            works,
            quests,
            settings,
            day,
            rollover: Rollover::new(config.backfill_days, config.user_id),
            config: config.clone(),
        };
        if fresh {
            app.repo.save_day_state(&app.day)?;
        }
        app.tick(today)?;
        Ok(app)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn into_repo(self) -> R {
        self.repo
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn balance(&self) -> i64 {
        self.ledger.balance()
    }

    /// Rows whose stored balance disagreed with the running total on load.
    pub fn mismatches(&self) -> &[BalanceMismatch] {
        &self.mismatches
    }

    pub fn works(&self) -> &[Work] {
        &self.works
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn day(&self) -> &DayState {
        &self.day
    }

    pub fn daily_records(&self) -> Result<Vec<DailyWorkRecord>> {
        self.repo.daily_records()
    }

    /// Validate, persist and append a transaction.
    pub fn append(&mut self, req: TransactionRequest, now: DateTime<Utc>) -> Result<Transaction> {
        let tx = self.ledger.prepare(req, now)?;
        self.repo.insert_transaction(&tx)?;
        Ok(self.ledger.commit(tx).clone())
    }

    pub fn chart(&self, now: DateTime<Utc>, days: i64) -> Vec<ChartPoint> {
        self.ledger.chart_series(now, days)
    }

    /// Today's list with completion flags.
    pub fn todays_work(&self) -> Vec<ScheduledWork> {
        scheduler::todays_work(&self.works, self.day.date)
            .into_iter()
            .map(|mut s| {
                s.completed = self.day.completed_works.contains(&s.work.id);
                s
            })
            .collect()
    }

    pub fn quest_board(&self) -> Vec<BoardQuest> {
        scheduler::quest_board(&self.quests)
            .into_iter()
            .map(|q| BoardQuest {
                claimed: self.day.completed_quests.contains(&q.id),
                quest: q.clone(),
            })
            .collect()
    }

    pub fn toggle_work(&mut self, work_id: i64) -> Result<bool> {
        let mut day = self.day.clone();
        let done = rewards::toggle_work(&mut day, &self.works, work_id)?;
        self.repo.save_day_state(&day)?;
        self.day = day;
        Ok(done)
    }

    /// Store `day`, then post `req`. When posting fails the previous day
    /// state is written back, so a retry sees the claim as not yet made.
    fn settle(
        &mut self,
        day: DayState,
        req: Option<TransactionRequest>,
        now: DateTime<Utc>,
    ) -> Result<Option<Transaction>> {
        self.repo.save_day_state(&day)?;
        let tx = match req {
            Some(req) => match self.append(req, now) {
                Ok(tx) => Some(tx),
                Err(err) => {
                    if let Err(restore) = self.repo.save_day_state(&self.day) {
                        tracing::error!("failed to restore day state: {restore:#}");
                    }
                    return Err(err);
                }
            },
            None => None,
        };
        self.day = day;
        Ok(tx)
    }

    /// Claim a quest after the front end's confirmation step.
    pub fn complete_quest(&mut self, quest_id: i64, now: DateTime<Utc>) -> Result<Option<Transaction>> {
        let mut day = self.day.clone();
        let req = rewards::complete_quest(&mut day, &self.quests, quest_id)?;
        self.settle(day, req, now)
    }

    pub fn undo_quest(&mut self, quest_id: i64, now: DateTime<Utc>) -> Result<Option<Transaction>> {
        let mut day = self.day.clone();
        let req = rewards::undo_quest(&mut day, &self.quests, quest_id)?;
        self.settle(day, req, now)
    }

    pub fn toggle_quest(&mut self, quest_id: i64, now: DateTime<Utc>) -> Result<Option<Transaction>> {
        let mut day = self.day.clone();
        let req = rewards::toggle_quest(&mut day, &self.quests, quest_id)?;
        self.settle(day, req, now)
    }

    /// Submit today's work and store the snapshot.
    pub fn finish_day(&mut self) -> Result<DailyWorkRecord> {
        let mut day = self.day.clone();
        let record = self.rollover.finish_day(&mut day, &self.works)?;
        self.repo.record_daily(&record)?;
        self.repo.save_day_state(&day)?;
        self.day = day;
        Ok(record)
    }

    /// Rollover check. Returns the backfill records written, empty when the
    /// date has not changed.
    pub fn tick(&mut self, today: NaiveDate) -> Result<Vec<DailyWorkRecord>> {
        let mut day = self.day.clone();
        let Some(records) = self.rollover.check(&mut day, &self.works, today)? else {
            return Ok(Vec::new());
        };
        for record in &records {
            self.repo.record_daily(record)?;
            tracing::info!(
                id = record.id,
                date = %record.date,
                scheduled = record.scheduled_tasks_count,
                max_reward = record.max_possible_reward,
                "daily work record backfilled"
            );
        }
        self.repo.save_day_state(&day)?;
        self.day = day;
        Ok(records)
    }

    /// Pay out rewards earned on submitted days since the last payout.
    pub fn pay_work_rewards(&mut self, now: DateTime<Utc>) -> Result<Option<Transaction>> {
        let unpaid: Vec<DailyWorkRecord> = self
            .repo
            .daily_records()?
            .into_iter()
            .filter(|r| r.kind == RecordKind::Submitted && r.id > self.day.paid_through_record)
            .collect();
        let Some(last_id) = unpaid.iter().map(|r| r.id).max() else {
            return Ok(None);
        };
        let total = unpaid.iter().try_fold(0i64, |total, r| {
            total
                .checked_add(r.earned_reward)
                .ok_or(OkaneError::BalanceOverflow {
                    total,
                    amount: r.earned_reward,
                })
        })?;
        let req = (total > 0)
            .then(|| TransactionRequest::income(total, format!("work reward ({} days)", unpaid.len())));
        let mut day = self.day.clone();
        day.paid_through_record = last_id;
        self.settle(day, req, now)
    }

    pub fn interest_projection(&self, today: NaiveDate) -> InterestProjection {
        let ci = &self.settings.compound_interest;
        let rate = interest::rate_from_percent(ci.interest_rate);
        InterestProjection {
            balance: self.balance(),
            rate: ci.interest_rate,
            next_interest: interest::next_interest(self.balance(), rate),
            next_payment: interest::next_payment_date(&ci.payment, today),
        }
    }

    pub fn next_work_payout(&self, today: NaiveDate) -> Option<NaiveDate> {
        interest::next_payment_date(self.settings.schedule(Section::WorkList), today)
    }

    pub fn editor(&self) -> SettingsEditor {
        SettingsEditor::new(self.settings.clone(), self.config.passcode.clone())
    }

    /// Unlock, apply `edits` in order and save. Nothing is saved when any
    /// edit fails.
    pub fn update_settings(&mut self, passcode: &str, edits: &[(Section, String, String)]) -> Result<&Settings> {
        let mut editor = self.editor();
        editor.unlock(passcode)?;
        for (section, key, value) in edits {
            editor.set(*section, key, value)?;
        }
        let saved = editor.commit()?;
        self.repo.save_settings(&saved)?;
        self.settings = saved;
        Ok(&self.settings)
    }

    fn check_passcode(&self, passcode: &str) -> Result<()> {
        if passcode != self.config.passcode {
            return Err(OkaneError::WrongPasscode.into());
        }
        Ok(())
    }

    pub fn next_work_id(&self) -> i64 {
        self.works.iter().map(|w| w.id).max().unwrap_or(0) + 1
    }

    pub fn next_quest_id(&self) -> i64 {
        self.quests.iter().map(|q| q.id).max().unwrap_or(0) + 1
    }

    pub fn upsert_work(&mut self, passcode: &str, work: Work) -> Result<()> {
        self.check_passcode(passcode)?;
        validate_catalog_entry(&work.title, work.reward, work.execution_span, &work.execution_days)?;
        self.repo.upsert_work(&work)?;
        match self.works.iter_mut().find(|w| w.id == work.id) {
            Some(slot) => *slot = work,
            None => self.works.push(work),
        }
        Ok(())
    }

    pub fn upsert_quest(&mut self, passcode: &str, quest: Quest) -> Result<()> {
        self.check_passcode(passcode)?;
        validate_catalog_entry(&quest.title, quest.reward, quest.frequency, &quest.execution_days)?;
        self.repo.upsert_quest(&quest)?;
        match self.quests.iter_mut().find(|q| q.id == quest.id) {
            Some(slot) => *slot = quest,
            None => self.quests.push(quest),
        }
        Ok(())
    }
}

fn validate_catalog_entry(
    title: &str,
    reward: i64,
    span: Span,
    days: &std::collections::BTreeSet<u8>,
) -> Result<(), OkaneError> {
    let invalid = |key: &str, reason: String| OkaneError::InvalidSetting {
        key: key.to_string(),
        reason,
    };
    if title.trim().is_empty() {
        return Err(invalid("title", "must not be empty".into()));
    }
    if reward < 0 {
        return Err(invalid("reward", format!("must not be negative (got {})", reward)));
    }
    let (lo, hi) = span.day_range();
    if let Some(bad) = days.iter().find(|d| **d < lo || **d > hi) {
        return Err(invalid(
            "execution_days",
            format!("{} is outside {}..={} for {} schedules", bad, lo, hi, span),
        ));
    }
    Ok(())
}
