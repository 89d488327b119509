// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Quest, ScheduledWork, Span, Work};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Day value a span keys on: weekday (0 = Sunday) or day of month.
fn day_key(span: Span, date: NaiveDate) -> u8 {
    match span {
        Span::Weekly => date.weekday().num_days_from_sunday() as u8,
        Span::Monthly => date.day() as u8,
    }
}

pub fn is_due_on(span: Span, days: &BTreeSet<u8>, date: NaiveDate) -> bool {
    days.contains(&day_key(span, date))
}

/// Monthly days past the end of a month are simply never due that month.
pub fn is_due(work: &Work, date: NaiveDate) -> bool {
    is_due_on(work.execution_span, &work.execution_days, date)
}

/// Valid works due on `date`, in catalog order, all uncompleted.
pub fn todays_work(catalog: &[Work], date: NaiveDate) -> Vec<ScheduledWork> {
    catalog
        .iter()
        .filter(|w| w.is_valid && is_due(w, date))
        .map(|w| ScheduledWork {
            work: w.clone(),
            completed: false,
        })
        .collect()
}

/// Quests are not date-filtered: every valid quest is on the board.
pub fn quest_board(quests: &[Quest]) -> Vec<&Quest> {
    quests.iter().filter(|q| q.is_valid).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(id: i64, span: Span, days: &[u8]) -> Work {
        Work {
            id,
            title: format!("work {id}"),
            note: String::new(),
            reward: 10,
            is_valid: true,
            execution_span: span,
            execution_days: days.iter().copied().collect(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekdays_only() {
        let w = work(1, Span::Weekly, &[1, 2, 3, 4, 5]);
        // 2024-10-16 is a Wednesday, 2024-10-19 a Saturday.
        assert!(is_due(&w, d(2024, 10, 16)));
        assert!(!is_due(&w, d(2024, 10, 19)));
    }

    #[test]
    fn day_31_never_due_in_thirty_day_month() {
        let w = work(1, Span::Monthly, &[31]);
        let mut day = d(2024, 11, 1);
        while day.month() == 11 {
            assert!(!is_due(&w, day));
            day = day.succ_opt().unwrap();
        }
        assert!(is_due(&w, d(2024, 12, 31)));
    }

    #[test]
    fn todays_work_skips_invalid_and_not_due() {
        let mut retired = work(2, Span::Weekly, &[0, 1, 2, 3, 4, 5, 6]);
        retired.is_valid = false;
        let catalog = vec![
            work(1, Span::Weekly, &[6, 0]),
            retired,
            work(3, Span::Weekly, &[0, 1, 2, 3, 4, 5, 6]),
        ];
        let today = todays_work(&catalog, d(2024, 10, 19));
        let ids: Vec<i64> = today.iter().map(|s| s.work.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(today.iter().all(|s| !s.completed));
    }

    #[test]
    fn quest_board_lists_valid_quests() {
        let hidden = Quest {
            id: 2,
            title: "hidden".into(),
            description: String::new(),
            reward: 5,
            is_valid: false,
            frequency: Span::Weekly,
            execution_days: BTreeSet::new(),
        };
        let shown = Quest {
            id: 1,
            is_valid: true,
            title: "shown".into(),
            ..hidden.clone()
        };
        let quests = vec![shown, hidden];
        let board = quest_board(&quests);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].id, 1);
    }
}
