// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Household settings and the edit-mode lock.
//!
//! The lock is a UI convenience to keep children from changing rates and
//! rewards; the passcode is compared in plain text and is not a security
//! boundary.

use crate::error::{OkaneError, OkaneResult};
use crate::models::Span;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Highest accepted rate, in percent per period.
pub const MAX_INTEREST_RATE: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub payment_span: Span,
    /// Weekday (0 = Sunday) for weekly schedules, day of month for monthly.
    pub payment_day: u8,
}

impl Default for PaymentSchedule {
    fn default() -> Self {
        Self {
            payment_span: Span::Weekly,
            payment_day: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestSettings {
    /// Percent per payment period.
    pub interest_rate: Decimal,
    pub payment: PaymentSchedule,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Default for InterestSettings {
    fn default() -> Self {
        Self {
            interest_rate: Decimal::new(5, 1),
            payment: PaymentSchedule::default(),
            fields: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSettings {
    pub payment: PaymentSchedule,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub compound_interest: InterestSettings,
    #[serde(default)]
    pub work_list: SectionSettings,
    #[serde(default)]
    pub quest_board: SectionSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    CompoundInterest,
    WorkList,
    QuestBoard,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::CompoundInterest => "compound_interest",
            Section::WorkList => "work_list",
            Section::QuestBoard => "quest_board",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "compound_interest" | "interest" => Ok(Section::CompoundInterest),
            "work_list" | "work" => Ok(Section::WorkList),
            "quest_board" | "quest" => Ok(Section::QuestBoard),
            other => Err(anyhow::anyhow!(
                "Unknown settings section '{}', expected compound_interest|work_list|quest_board",
                other
            )),
        }
    }
}

impl Settings {
    pub fn schedule(&self, section: Section) -> &PaymentSchedule {
        match section {
            Section::CompoundInterest => &self.compound_interest.payment,
            Section::WorkList => &self.work_list.payment,
            Section::QuestBoard => &self.quest_board.payment,
        }
    }

    fn parts_mut(&mut self, section: Section) -> (&mut PaymentSchedule, &mut BTreeMap<String, String>) {
        match section {
            Section::CompoundInterest => (
                &mut self.compound_interest.payment,
                &mut self.compound_interest.fields,
            ),
            Section::WorkList => (&mut self.work_list.payment, &mut self.work_list.fields),
            Section::QuestBoard => (&mut self.quest_board.payment, &mut self.quest_board.fields),
        }
    }

    /// Apply one `key = value` edit to a section. Known keys are parsed and
    /// range-checked; anything else is stored as a free-form field.
    pub fn apply(&mut self, section: Section, key: &str, value: &str) -> OkaneResult<()> {
        let invalid = |reason: String| OkaneError::InvalidSetting {
            key: key.to_string(),
            reason,
        };
        let value = value.trim();
        match key {
            "interest_rate" => {
                if section != Section::CompoundInterest {
                    return Err(invalid(format!("not a {} setting", section)));
                }
                let rate = Decimal::from_str(value)
                    .map_err(|_| invalid(format!("'{}' is not a decimal", value)))?;
                if rate.is_sign_negative() {
                    return Err(invalid("rate must not be negative".into()));
                }
                if rate > MAX_INTEREST_RATE {
                    return Err(invalid(format!(
                        "rate must be at most {}%",
                        MAX_INTEREST_RATE
                    )));
                }
                self.compound_interest.interest_rate = rate;
            }
            "payment_span" => {
                let span = Span::from_str(value).map_err(|e| invalid(e.to_string()))?;
                let (payment, _) = self.parts_mut(section);
                let (lo, hi) = span.day_range();
                payment.payment_span = span;
                payment.payment_day = payment.payment_day.clamp(lo, hi);
            }
            "payment_day" => {
                let day: u8 = value
                    .parse()
                    .map_err(|_| invalid(format!("'{}' is not a day number", value)))?;
                let (payment, _) = self.parts_mut(section);
                let (lo, hi) = payment.payment_span.day_range();
                if day < lo || day > hi {
                    return Err(invalid(format!(
                        "{} payment day must be {}..={}",
                        payment.payment_span, lo, hi
                    )));
                }
                payment.payment_day = day;
            }
            _ => {
                let (_, fields) = self.parts_mut(section);
                fields.insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }
}

/// Settings draft guarded by an edit-mode flag.
#[derive(Debug)]
pub struct SettingsEditor {
    draft: Settings,
    passcode: String,
    unlocked: bool,
}

impl SettingsEditor {
    pub fn new(current: Settings, passcode: impl Into<String>) -> Self {
        Self {
            draft: current,
            passcode: passcode.into(),
            unlocked: false,
        }
    }

    pub fn unlock(&mut self, attempt: &str) -> OkaneResult<()> {
        if attempt != self.passcode {
            return Err(OkaneError::WrongPasscode);
        }
        self.unlocked = true;
        Ok(())
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn set(&mut self, section: Section, key: &str, value: &str) -> OkaneResult<()> {
        if !self.unlocked {
            return Err(OkaneError::SettingsLocked);
        }
        self.draft.apply(section, key, value)
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    /// Hand back the edited settings and relock.
    pub fn commit(mut self) -> OkaneResult<Settings> {
        if !self.unlocked {
            return Err(OkaneError::SettingsLocked);
        }
        self.unlocked = false;
        Ok(self.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_editor_rejects_edits() {
        let mut editor = SettingsEditor::new(Settings::default(), "1234");
        assert_eq!(
            editor.set(Section::CompoundInterest, "interest_rate", "1.0"),
            Err(OkaneError::SettingsLocked)
        );
        assert_eq!(editor.unlock("0000"), Err(OkaneError::WrongPasscode));
        assert!(!editor.is_unlocked());
    }

    #[test]
    fn unlocked_editor_commits_changes() {
        let mut editor = SettingsEditor::new(Settings::default(), "1234");
        editor.unlock("1234").unwrap();
        editor
            .set(Section::CompoundInterest, "interest_rate", "1.25")
            .unwrap();
        editor.set(Section::WorkList, "payment_span", "monthly").unwrap();
        editor.set(Section::WorkList, "payment_day", "25").unwrap();
        editor.set(Section::QuestBoard, "theme", "pirates").unwrap();
        let saved = editor.commit().unwrap();
        assert_eq!(saved.compound_interest.interest_rate, Decimal::new(125, 2));
        assert_eq!(
            saved.work_list.payment,
            PaymentSchedule {
                payment_span: Span::Monthly,
                payment_day: 25
            }
        );
        assert_eq!(saved.quest_board.fields.get("theme").map(String::as_str), Some("pirates"));
    }

    #[test]
    fn payment_day_checked_against_span() {
        let mut s = Settings::default();
        assert!(matches!(
            s.apply(Section::WorkList, "payment_day", "7"),
            Err(OkaneError::InvalidSetting { .. })
        ));
        assert!(matches!(
            s.apply(Section::WorkList, "interest_rate", "1"),
            Err(OkaneError::InvalidSetting { .. })
        ));
        // Switching weekly day 0 to monthly moves the day into 1..=31.
        s.apply(Section::WorkList, "payment_span", "monthly").unwrap();
        assert_eq!(s.work_list.payment.payment_day, 1);
    }
}
