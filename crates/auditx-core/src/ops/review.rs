//! Review workflow over fieldwork records.
//!
//! A reviewer's decision appends to the record's review history, moves
//! the record to its terminal status, and forces it onto the report tab.

use chrono::Utc;

use super::fieldwork_store::FieldworkStore;
use crate::model::{RecordStatus, ReviewDecision, ReviewEntry, TAB_REPORT};

/// Record a reviewer decision on a submitted fieldwork record
///
/// The history entry's content is `"{decision}: {comment}"` when the
/// trimmed comment is non-empty, otherwise the decision label alone.
/// The entry is appended (existing entries are never edited or removed),
/// the status becomes approved or rejected, and `active_tab` and
/// `progress` are clamped forward to the report tab. The clamp is
/// forward-only: no operation lowers `progress`.
///
/// A missing id is a silent no-op; callers must have called `ensure`
/// first.
pub fn add_review(
    store: &mut FieldworkStore,
    id: &str,
    author: &str,
    comment: &str,
    decision: ReviewDecision,
) {
    let trimmed = comment.trim();
    let content = if trimmed.is_empty() {
        decision.to_string()
    } else {
        format!("{decision}: {trimmed}")
    };

    store.modify(id, "add_review", |record| {
        record.review_history.push(ReviewEntry {
            author: author.to_string(),
            content,
            timestamp: Utc::now(),
        });
        record.status = match decision {
            ReviewDecision::Approved => RecordStatus::Approved,
            ReviewDecision::Rejected => RecordStatus::Rejected,
        };
        record.active_tab = record.active_tab.max(TAB_REPORT);
        record.progress = record.progress.max(TAB_REPORT);
    });
}
