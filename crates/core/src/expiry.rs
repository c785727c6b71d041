//! Document expiry classification for alerts and badges.

use serde::Serialize;

use crate::models::{Document, Property};
use crate::types::Timestamp;

/// Documents expiring within this many days are flagged as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Where a document stands relative to its expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpiryStatus {
    NoExpiry,
    Valid { days_left: i64 },
    ExpiringSoon { days_left: i64 },
    Expired { days_ago: i64 },
}

impl ExpiryStatus {
    /// Whether the status warrants an alert.
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::ExpiringSoon { .. } | Self::Expired { .. })
    }
}

/// Classify one document at `now`. Day counts are whole days, rounded down.
pub fn expiry_status(document: &Document, now: Timestamp) -> ExpiryStatus {
    let Some(expires_at) = document.expiration_date else {
        return ExpiryStatus::NoExpiry;
    };
    if expires_at <= now {
        return ExpiryStatus::Expired {
            days_ago: (now - expires_at).num_days(),
        };
    }
    let days_left = (expires_at - now).num_days();
    if days_left <= EXPIRING_SOON_DAYS {
        ExpiryStatus::ExpiringSoon { days_left }
    } else {
        ExpiryStatus::Valid { days_left }
    }
}

/// Documents on `property` that are expired or expiring soon, soonest first.
pub fn expiring_documents(property: &Property, now: Timestamp) -> Vec<(&Document, ExpiryStatus)> {
    let mut flagged: Vec<(&Document, ExpiryStatus)> = property
        .documents
        .iter()
        .map(|doc| (doc, expiry_status(doc, now)))
        .filter(|(_, status)| status.needs_attention())
        .collect();
    flagged.sort_by_key(|(doc, _)| doc.expiration_date);
    flagged
}
