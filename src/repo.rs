// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::fixtures;
use crate::models::{DailyWorkRecord, DayState, Quest, Transaction, Work};
use crate::settings::Settings;
use anyhow::Result;

/// Data-access layer the application service is built on.
pub trait Repository {
    fn transactions(&self) -> Result<Vec<Transaction>>;
    fn insert_transaction(&mut self, tx: &Transaction) -> Result<()>;

    fn works(&self) -> Result<Vec<Work>>;
    fn upsert_work(&mut self, work: &Work) -> Result<()>;

    fn quests(&self) -> Result<Vec<Quest>>;
    fn upsert_quest(&mut self, quest: &Quest) -> Result<()>;

    fn settings(&self) -> Result<Settings>;
    fn save_settings(&mut self, settings: &Settings) -> Result<()>;

    fn day_state(&self) -> Result<Option<DayState>>;
    fn save_day_state(&mut self, state: &DayState) -> Result<()>;

    fn record_daily(&mut self, record: &DailyWorkRecord) -> Result<()>;
    fn daily_records(&self) -> Result<Vec<DailyWorkRecord>>;
}

/// Vec-backed repository used by tests and by `--memory` runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    pub transactions: Vec<Transaction>,
    pub works: Vec<Work>,
    pub quests: Vec<Quest>,
    pub settings: Settings,
    pub day_state: Option<DayState>,
    pub records: Vec<DailyWorkRecord>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository preloaded with the sample household.
    pub fn seeded() -> Self {
        Self {
            transactions: fixtures::transactions(),
            works: fixtures::works(),
            quests: fixtures::quests(),
            settings: Settings::default(),
            day_state: None,
            records: Vec::new(),
        }
    }
}

fn upsert_by_id<T: Clone>(items: &mut Vec<T>, item: &T, id_of: impl Fn(&T) -> i64) {
    let id = id_of(item);
    match items.iter_mut().find(|existing| id_of(existing) == id) {
        Some(slot) => *slot = item.clone(),
        None => items.push(item.clone()),
    }
}

impl Repository for MemoryRepository {
    fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.transactions.clone())
    }

    fn insert_transaction(&mut self, tx: &Transaction) -> Result<()> {
        self.transactions.push(tx.clone());
        Ok(())
    }

    fn works(&self) -> Result<Vec<Work>> {
        Ok(self.works.clone())
    }

    fn upsert_work(&mut self, work: &Work) -> Result<()> {
        upsert_by_id(&mut self.works, work, |w| w.id);
        Ok(())
    }

    fn quests(&self) -> Result<Vec<Quest>> {
        Ok(self.quests.clone())
    }

    fn upsert_quest(&mut self, quest: &Quest) -> Result<()> {
        upsert_by_id(&mut self.quests, quest, |q| q.id);
        Ok(())
    }

    fn settings(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.settings = settings.clone();
        Ok(())
    }

    fn day_state(&self) -> Result<Option<DayState>> {
        Ok(self.day_state.clone())
    }

    fn save_day_state(&mut self, state: &DayState) -> Result<()> {
        self.day_state = Some(state.clone());
        Ok(())
    }

    fn record_daily(&mut self, record: &DailyWorkRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn daily_records(&self) -> Result<Vec<DailyWorkRecord>> {
        Ok(self.records.clone())
    }
}
