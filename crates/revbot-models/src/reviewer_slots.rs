use thiserror::Error;
use time::OffsetDateTime;

use crate::{AssignmentSlot, MAX_REVIEWER_SLOTS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewerSlotsError {
    #[error("Slot #{slot} is out of range on pull request '{pull_request_id}'")]
    SlotOutOfRange { pull_request_id: String, slot: u32 },

    #[error("Slot #{slot} is declared twice on pull request '{pull_request_id}'")]
    DuplicateSlot { pull_request_id: String, slot: u32 },

    #[error("Slot #{slot} is empty on pull request '{pull_request_id}'")]
    SparseSlots { pull_request_id: String, slot: u32 },

    #[error("Reviewer '{reviewer_id}' already occupies a slot on pull request '{pull_request_id}'")]
    DuplicateReviewer {
        pull_request_id: String,
        reviewer_id: String,
    },

    #[error("Slot #{slot} belongs to pull request '{found}', not '{pull_request_id}'")]
    ForeignSlot {
        pull_request_id: String,
        found: String,
        slot: u32,
    },
}

/// Fixed-capacity reviewer seats of one pull request.
///
/// Seats are numbered from 1 and always dense. A reviewer sits in at most one
/// seat, and seats are never added or removed once built: only their occupant
/// can be replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerSlots {
    pull_request_id: String,
    seats: [Option<AssignmentSlot>; MAX_REVIEWER_SLOTS],
}

impl ReviewerSlots {
    pub fn empty<T: Into<String>>(pull_request_id: T) -> Self {
        Self {
            pull_request_id: pull_request_id.into(),
            seats: std::array::from_fn(|_| None),
        }
    }

    /// Seat `reviewers` in order, starting at slot #1.
    pub fn seat(
        pull_request_id: &str,
        reviewers: &[String],
        assigned_at: OffsetDateTime,
    ) -> Result<Self, ReviewerSlotsError> {
        let slots = reviewers
            .iter()
            .enumerate()
            .map(|(idx, reviewer)| {
                AssignmentSlot::new(pull_request_id, idx as u32 + 1, reviewer, assigned_at)
            })
            .collect();

        Self::from_slots(pull_request_id, slots)
    }

    /// Rebuild seats from stored slots, validating every invariant.
    pub fn from_slots(
        pull_request_id: &str,
        slots: Vec<AssignmentSlot>,
    ) -> Result<Self, ReviewerSlotsError> {
        let mut output = Self::empty(pull_request_id);

        for slot in slots {
            if slot.pull_request_id != pull_request_id {
                return Err(ReviewerSlotsError::ForeignSlot {
                    pull_request_id: pull_request_id.into(),
                    found: slot.pull_request_id,
                    slot: slot.slot,
                });
            }

            let index = output.index_of(slot.slot)?;
            if output.seats[index].is_some() {
                return Err(ReviewerSlotsError::DuplicateSlot {
                    pull_request_id: pull_request_id.into(),
                    slot: slot.slot,
                });
            }

            if output.contains(&slot.reviewer_id) {
                return Err(ReviewerSlotsError::DuplicateReviewer {
                    pull_request_id: pull_request_id.into(),
                    reviewer_id: slot.reviewer_id,
                });
            }

            output.seats[index] = Some(slot);
        }

        let len = output.len();
        if let Some(hole) = output.seats[..len].iter().position(Option::is_none) {
            return Err(ReviewerSlotsError::SparseSlots {
                pull_request_id: pull_request_id.into(),
                slot: hole as u32 + 1,
            });
        }

        Ok(output)
    }

    pub fn len(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssignmentSlot> {
        self.seats.iter().flatten()
    }

    /// Occupants, in slot order.
    pub fn reviewers(&self) -> Vec<String> {
        self.iter().map(|s| s.reviewer_id.clone()).collect()
    }

    pub fn contains(&self, reviewer_id: &str) -> bool {
        self.find(reviewer_id).is_some()
    }

    pub fn find(&self, reviewer_id: &str) -> Option<&AssignmentSlot> {
        self.iter().find(|s| s.reviewer_id == reviewer_id)
    }

    /// Slot number held by `reviewer_id`, if seated.
    pub fn position_of(&self, reviewer_id: &str) -> Option<u32> {
        self.find(reviewer_id).map(|s| s.slot)
    }

    /// Give seat `slot` to `reviewer_id`.
    pub fn replace(
        &mut self,
        slot: u32,
        reviewer_id: &str,
        assigned_at: OffsetDateTime,
    ) -> Result<&AssignmentSlot, ReviewerSlotsError> {
        if self.contains(reviewer_id) {
            return Err(ReviewerSlotsError::DuplicateReviewer {
                pull_request_id: self.pull_request_id.clone(),
                reviewer_id: reviewer_id.into(),
            });
        }

        let index = self.index_of(slot)?;
        match self.seats[index].as_mut() {
            Some(seat) => {
                reviewer_id.clone_into(&mut seat.reviewer_id);
                seat.assigned_at = assigned_at;
                Ok(seat)
            }
            None => Err(ReviewerSlotsError::SparseSlots {
                pull_request_id: self.pull_request_id.clone(),
                slot,
            }),
        }
    }

    pub fn into_slots(self) -> Vec<AssignmentSlot> {
        self.seats.into_iter().flatten().collect()
    }

    fn index_of(&self, slot: u32) -> Result<usize, ReviewerSlotsError> {
        let index = (slot as usize).wrapping_sub(1);
        if index < MAX_REVIEWER_SLOTS {
            Ok(index)
        } else {
            Err(ReviewerSlotsError::SlotOutOfRange {
                pull_request_id: self.pull_request_id.clone(),
                slot,
            })
        }
    }
}
