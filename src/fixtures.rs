// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sample household used by `okane init --seed` and the in-memory repository.

use crate::models::{Category, Quest, Span, Transaction, Work};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeSet;

fn every_day() -> BTreeSet<u8> {
    (0..=6).collect()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

pub fn works() -> Vec<Work> {
    vec![
        Work {
            id: 1,
            title: "Put the laundry away".into(),
            note: "Even if it isn't yours".into(),
            reward: 60,
            is_valid: true,
            execution_span: Span::Weekly,
            execution_days: [1, 2, 3, 4, 5].into_iter().collect(),
        },
        Work {
            id: 2,
            title: "Line up the shoes".into(),
            note: "Everyone's shoes at the door".into(),
            reward: 80,
            is_valid: true,
            execution_span: Span::Weekly,
            execution_days: every_day(),
        },
        Work {
            id: 3,
            title: "Clean the bath".into(),
            note: "Just drain the tub".into(),
            reward: 30,
            is_valid: true,
            execution_span: Span::Weekly,
            execution_days: [6, 0].into_iter().collect(),
        },
    ]
}

pub fn quests() -> Vec<Quest> {
    vec![
        Quest {
            id: 1,
            title: "Wipe down the kitchen".into(),
            description: "Wipe every counter in the kitchen".into(),
            reward: 20,
            is_valid: true,
            frequency: Span::Weekly,
            execution_days: every_day(),
        },
        Quest {
            id: 2,
            title: "Shoulder rub".into(),
            description: "Give a family member a shoulder rub".into(),
            reward: 10,
            is_valid: true,
            frequency: Span::Weekly,
            execution_days: every_day(),
        },
    ]
}

pub fn transactions() -> Vec<Transaction> {
    let rows = [
        (at(2024, 1, 1, 12, 0), 10000, "Allowance", "Opening deposit", Category::Income),
        (at(2024, 10, 1, 9, 0), 120, "Work reward", "", Category::Income),
        (at(2024, 10, 5, 14, 30), 220, "Snacks", "", Category::Expense),
        (at(2024, 10, 10, 10, 15), 130, "Work reward", "Extra task", Category::Income),
        (at(2024, 10, 15, 16, 45), 330, "Toy", "", Category::Expense),
    ];
    let mut balance = 0;
    rows.into_iter()
        .enumerate()
        .map(|(i, (timestamp, amount, title, note, category))| {
            balance += match category {
                Category::Income => amount,
                Category::Expense => -amount,
            };
            Transaction {
                id: i as i64 + 1,
                timestamp,
                amount,
                title: title.into(),
                note: note.into(),
                category,
                balance,
                is_valid: true,
            }
        })
        .collect()
}
