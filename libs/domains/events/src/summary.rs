//! Outcome reporting for delete and bulk update operations.
//!
//! Every status carries the message shown by both the HTTP API and the CLI.

use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

use crate::models::EventState;

/// Result of deleting a single event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteOutcome {
    pub id: String,
    /// `false` when the deletion policy protected the event
    pub deleted: bool,
    /// State of the event when the request was evaluated
    pub state: EventState,
    pub message: String,
}

impl DeleteOutcome {
    pub fn new(id: impl Into<String>, deleted: bool, state: EventState) -> Self {
        let id = id.into();
        let message = if deleted {
            format!("Event with ID {id}, has been deleted successfully")
        } else {
            format!("Event with ID {id}, cannot be deleted because it is {state}")
        };
        Self {
            id,
            deleted,
            state,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeleteAllStatus {
    AllDeleted,
    StoppedDeleted,
    NothingToDelete,
    OnlyRunning,
}

/// Result of a bulk delete: events present before the call and events removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteAllSummary {
    pub total: u64,
    pub deleted: u64,
    pub status: DeleteAllStatus,
    pub message: String,
}

impl DeleteAllSummary {
    pub fn new(total: u64, deleted: u64) -> Self {
        let status = match (total, deleted) {
            (0, _) => DeleteAllStatus::NothingToDelete,
            (_, 0) => DeleteAllStatus::OnlyRunning,
            (t, d) if t == d => DeleteAllStatus::AllDeleted,
            _ => DeleteAllStatus::StoppedDeleted,
        };
        let message = match status {
            DeleteAllStatus::AllDeleted => {
                format!("All of {deleted} events have been deleted successfully")
            }
            DeleteAllStatus::StoppedDeleted => {
                format!("All of {deleted} stopped events have been deleted successfully")
            }
            DeleteAllStatus::NothingToDelete => {
                "There are no events to delete, all events have already been deleted".to_string()
            }
            DeleteAllStatus::OnlyRunning => {
                "Cannot delete events: only running or upcoming events remain and force_delete is false"
                    .to_string()
            }
        };
        Self {
            total,
            deleted,
            status,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BulkUpdateStatus {
    Updated,
    AlreadyUpToDate,
    NothingMatched,
}

/// Result of a tag-filtered datetime update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulkUpdateSummary {
    /// Events whose stored values changed
    pub updated: u64,
    /// Events matching the tag filter
    pub matched: u64,
    pub status: BulkUpdateStatus,
    pub message: String,
}

impl BulkUpdateSummary {
    pub fn new(updated: u64, matched: u64) -> Self {
        let status = if updated > 0 {
            BulkUpdateStatus::Updated
        } else if matched > 0 {
            BulkUpdateStatus::AlreadyUpToDate
        } else {
            BulkUpdateStatus::NothingMatched
        };
        let message = match status {
            BulkUpdateStatus::Updated => {
                format!("{updated} of {matched} matching events have been updated")
            }
            BulkUpdateStatus::AlreadyUpToDate => {
                format!("All {matched} matching events already have these dates")
            }
            BulkUpdateStatus::NothingMatched => "No events match the given tags".to_string(),
        };
        Self {
            updated,
            matched,
            status,
            message,
        }
    }
}
