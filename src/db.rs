// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, DailyWorkRecord, DayState, Quest, Span, Transaction, Work};
use crate::repo::Repository;
use crate::settings::Settings;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

pub static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.okane", "Okane", "okane"));

const DB_ENV: &str = "OKANE_DB";
const SETTINGS_KEY: &str = "settings";
const DAY_STATE_KEY: &str = "day_state";

pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p.trim()));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("okane.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY,
        timestamp TEXT NOT NULL,
        amount INTEGER NOT NULL CHECK(amount >= 1),
        balance INTEGER NOT NULL,
        title TEXT NOT NULL,
        note TEXT NOT NULL DEFAULT '',
        category TEXT NOT NULL CHECK(category IN ('income','expense')),
        is_valid INTEGER NOT NULL DEFAULT 1
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_timestamp ON transactions(timestamp);

    CREATE TABLE IF NOT EXISTS works(
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        note TEXT NOT NULL DEFAULT '',
        reward INTEGER NOT NULL CHECK(reward >= 0),
        is_valid INTEGER NOT NULL DEFAULT 1,
        execution_span TEXT NOT NULL CHECK(execution_span IN ('weekly','monthly')),
        execution_days TEXT NOT NULL -- JSON array
    );

    CREATE TABLE IF NOT EXISTS quests(
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        reward INTEGER NOT NULL CHECK(reward >= 0),
        is_valid INTEGER NOT NULL DEFAULT 1,
        frequency TEXT NOT NULL CHECK(frequency IN ('weekly','monthly')),
        execution_days TEXT NOT NULL -- JSON array
    );

    CREATE TABLE IF NOT EXISTS daily_records(
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        kind TEXT NOT NULL,
        payload TEXT NOT NULL, -- full record as JSON
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_daily_records_date ON daily_records(date);
    "#,
    )?;
    Ok(())
}

/// SQLite-backed repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open() -> Result<Self> {
        Ok(Self::new(open_or_init()?))
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self::new(conn))
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let v: Option<String> = self
            .conn
            .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        match v {
            Some(s) => Ok(Some(
                serde_json::from_str(&s).with_context(|| format!("Invalid JSON for '{}'", key))?,
            )),
            None => Ok(None),
        }
    }

    fn put_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, serde_json::to_string(value)?],
        )?;
        Ok(())
    }
}

fn parse_days(s: &str) -> Result<BTreeSet<u8>> {
    serde_json::from_str(s).with_context(|| format!("Invalid execution days '{}'", s))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid timestamp '{}'", s))?
        .with_timezone(&Utc))
}

impl Repository for SqliteRepository {
    fn transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, amount, balance, title, note, category, is_valid
             FROM transactions ORDER BY id",
        )?;
        let mut rows = stmt.query([])?;
        let mut data = Vec::new();
        while let Some(r) = rows.next()? {
            let ts: String = r.get(1)?;
            let category: String = r.get(6)?;
            data.push(Transaction {
                id: r.get(0)?,
                timestamp: parse_timestamp(&ts)?,
                amount: r.get(2)?,
                balance: r.get(3)?,
                title: r.get(4)?,
                note: r.get(5)?,
                category: category.parse::<Category>()?,
                is_valid: r.get(7)?,
            });
        }
        Ok(data)
    }

    fn insert_transaction(&mut self, tx: &Transaction) -> Result<()> {
        self.conn.execute(
            "INSERT INTO transactions(id, timestamp, amount, balance, title, note, category, is_valid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                tx.id,
                tx.timestamp.to_rfc3339(),
                tx.amount,
                tx.balance,
                tx.title,
                tx.note,
                tx.category.as_str(),
                tx.is_valid
            ],
        )?;
        Ok(())
    }

    fn works(&self) -> Result<Vec<Work>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, note, reward, is_valid, execution_span, execution_days
             FROM works ORDER BY id",
        )?;
        let mut rows = stmt.query([])?;
        let mut data = Vec::new();
        while let Some(r) = rows.next()? {
            let span: String = r.get(5)?;
            let days: String = r.get(6)?;
            data.push(Work {
                id: r.get(0)?,
                title: r.get(1)?,
                note: r.get(2)?,
                reward: r.get(3)?,
                is_valid: r.get(4)?,
                execution_span: span.parse::<Span>()?,
                execution_days: parse_days(&days)?,
            });
        }
        Ok(data)
    }

    fn upsert_work(&mut self, work: &Work) -> Result<()> {
        self.conn.execute(
            "INSERT INTO works(id, title, note, reward, is_valid, execution_span, execution_days)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET title=excluded.title, note=excluded.note,
               reward=excluded.reward, is_valid=excluded.is_valid,
               execution_span=excluded.execution_span, execution_days=excluded.execution_days",
            params![
                work.id,
                work.title,
                work.note,
                work.reward,
                work.is_valid,
                work.execution_span.as_str(),
                serde_json::to_string(&work.execution_days)?
            ],
        )?;
        Ok(())
    }

    fn quests(&self) -> Result<Vec<Quest>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, reward, is_valid, frequency, execution_days
             FROM quests ORDER BY id",
        )?;
        let mut rows = stmt.query([])?;
        let mut data = Vec::new();
        while let Some(r) = rows.next()? {
            let span: String = r.get(5)?;
            let days: String = r.get(6)?;
            data.push(Quest {
                id: r.get(0)?,
                title: r.get(1)?,
                description: r.get(2)?,
                reward: r.get(3)?,
                is_valid: r.get(4)?,
                frequency: span.parse::<Span>()?,
                execution_days: parse_days(&days)?,
            });
        }
        Ok(data)
    }

    fn upsert_quest(&mut self, quest: &Quest) -> Result<()> {
        self.conn.execute(
            "INSERT INTO quests(id, title, description, reward, is_valid, frequency, execution_days)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET title=excluded.title, description=excluded.description,
               reward=excluded.reward, is_valid=excluded.is_valid,
               frequency=excluded.frequency, execution_days=excluded.execution_days",
            params![
                quest.id,
                quest.title,
                quest.description,
                quest.reward,
                quest.is_valid,
                quest.frequency.as_str(),
                serde_json::to_string(&quest.execution_days)?
            ],
        )?;
        Ok(())
    }

    fn settings(&self) -> Result<Settings> {
        Ok(self.get_json(SETTINGS_KEY)?.unwrap_or_default())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.put_json(SETTINGS_KEY, settings)
    }

    fn day_state(&self) -> Result<Option<DayState>> {
        self.get_json(DAY_STATE_KEY)
    }

    fn save_day_state(&mut self, state: &DayState) -> Result<()> {
        self.put_json(DAY_STATE_KEY, state)
    }

    fn record_daily(&mut self, record: &DailyWorkRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO daily_records(id, user_id, date, kind, payload) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.user_id,
                record.date.to_string(),
                record.kind.as_str(),
                serde_json::to_string(record)?
            ],
        )?;
        Ok(())
    }

    fn daily_records(&self) -> Result<Vec<DailyWorkRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM daily_records ORDER BY id")?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut data = Vec::new();
        for row in rows {
            let payload = row?;
            data.push(
                serde_json::from_str(&payload)
                    .with_context(|| format!("Invalid daily record '{}'", payload))?,
            );
        }
        Ok(data)
    }
}

/// Load the sample household into an empty store. Returns false when the
/// store already has data.
pub fn seed(repo: &mut impl Repository) -> Result<bool> {
    if !repo.transactions()?.is_empty() || !repo.works()?.is_empty() {
        return Ok(false);
    }
    for t in crate::fixtures::transactions() {
        repo.insert_transaction(&t)?;
    }
    for w in crate::fixtures::works() {
        repo.upsert_work(&w)?;
    }
    for q in crate::fixtures::quests() {
        repo.upsert_quest(&q)?;
    }
    repo.save_settings(&Settings::default())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_repository_round_trips_state() {
        let mut repo = SqliteRepository::in_memory().unwrap();
        assert!(seed(&mut repo).unwrap());
        assert!(!seed(&mut repo).unwrap());

        let txs = repo.transactions().unwrap();
        assert_eq!(txs.len(), 5);
        assert_eq!(txs[4].balance, 9700);
        assert_eq!(repo.works().unwrap(), crate::fixtures::works());
        assert_eq!(repo.quests().unwrap().len(), 2);
        assert!(repo.day_state().unwrap().is_none());

        let mut day = DayState::new(chrono::NaiveDate::from_ymd_opt(2024, 10, 16).unwrap());
        day.completed_quests.insert(2);
        repo.save_day_state(&day).unwrap();
        assert_eq!(repo.day_state().unwrap(), Some(day));
    }
}
