//! Domain models.

mod assignment_slot;
mod pull_request;
mod pull_request_status;
mod reviewer_slots;
mod team;
mod timestamp;
mod user;

pub use assignment_slot::AssignmentSlot;
pub use pull_request::PullRequest;
pub use pull_request_status::{PullRequestStatus, PullRequestStatusError};
pub use reviewer_slots::{ReviewerSlots, ReviewerSlotsError};
pub use revbot_config::MAX_REVIEWER_SLOTS;
pub use team::Team;
pub use timestamp::current_timestamp;
pub use user::User;
