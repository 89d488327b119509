// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns work and quest completion into ledger requests.
//!
//! Works only flip a flag; their rewards are paid in batches from the daily
//! records. Quests pay immediately, and undoing a quest posts a compensating
//! expense instead of removing the original income.

use crate::error::{OkaneError, OkaneResult};
use crate::models::{DayState, Quest, TransactionRequest, Work, WorkDay};
use crate::scheduler;

/// Flip the completion flag of a work on today's list. Returns the new flag.
pub fn toggle_work(day: &mut DayState, catalog: &[Work], work_id: i64) -> OkaneResult<bool> {
    if day.status == WorkDay::Completed {
        return Err(OkaneError::DayAlreadySubmitted(day.date));
    }
    let work = catalog
        .iter()
        .find(|w| w.id == work_id && w.is_valid)
        .ok_or(OkaneError::UnknownWork(work_id))?;
    if !scheduler::is_due(work, day.date) {
        return Err(OkaneError::WorkNotScheduled {
            id: work_id,
            date: day.date,
        });
    }
    if day.completed_works.remove(&work_id) {
        Ok(false)
    } else {
        day.completed_works.insert(work_id);
        Ok(true)
    }
}

fn find_quest(quests: &[Quest], quest_id: i64) -> OkaneResult<&Quest> {
    quests
        .iter()
        .find(|q| q.id == quest_id && q.is_valid)
        .ok_or(OkaneError::UnknownQuest(quest_id))
}

/// Claim a quest for today. `None` means the quest carries no reward and
/// nothing needs to be posted.
pub fn complete_quest(
    day: &mut DayState,
    quests: &[Quest],
    quest_id: i64,
) -> OkaneResult<Option<TransactionRequest>> {
    let quest = find_quest(quests, quest_id)?;
    if day.completed_quests.contains(&quest_id) {
        return Err(OkaneError::QuestAlreadyClaimed(quest_id));
    }
    day.completed_quests.insert(quest_id);
    Ok((quest.reward > 0)
        .then(|| TransactionRequest::income(quest.reward, format!("quest reward: {}", quest.title))))
}

/// Reverse today's claim with an offsetting expense.
pub fn undo_quest(
    day: &mut DayState,
    quests: &[Quest],
    quest_id: i64,
) -> OkaneResult<Option<TransactionRequest>> {
    let quest = find_quest(quests, quest_id)?;
    if !day.completed_quests.remove(&quest_id) {
        return Err(OkaneError::QuestNotClaimed(quest_id));
    }
    Ok((quest.reward > 0).then(|| {
        TransactionRequest::expense(
            quest.reward,
            format!("quest reward reversed: {}", quest.title),
        )
    }))
}

/// Claim or reverse depending on today's state.
pub fn toggle_quest(
    day: &mut DayState,
    quests: &[Quest],
    quest_id: i64,
) -> OkaneResult<Option<TransactionRequest>> {
    if day.completed_quests.contains(&quest_id) {
        undo_quest(day, quests, quest_id)
    } else {
        complete_quest(day, quests, quest_id)
    }
}
