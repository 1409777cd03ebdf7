use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A reviewer seat on a pull request.
///
/// The slot number is the seat identity; only the occupant changes over time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentSlot {
    pub pull_request_id: String,
    pub slot: u32,
    pub reviewer_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
}

impl AssignmentSlot {
    pub fn new<P: Into<String>, R: Into<String>>(
        pull_request_id: P,
        slot: u32,
        reviewer_id: R,
        assigned_at: OffsetDateTime,
    ) -> Self {
        Self {
            pull_request_id: pull_request_id.into(),
            slot,
            reviewer_id: reviewer_id.into(),
            assigned_at,
        }
    }
}
