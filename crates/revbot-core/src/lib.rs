//! Reviewer assignment logic.

#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

mod context;
pub mod errors;
pub mod random;
mod transaction;
pub mod use_cases;

pub use context::CoreContext;
pub use errors::{DomainError, Result};
use shaku::module;
use use_cases::{
    pulls::{
        create_pull_request::CreatePullRequest, get_pull_request::GetPullRequest,
        merge_pull_request::MergePullRequest,
    },
    reviews::{list_review_queue::ListReviewQueue, reassign_reviewer::ReassignReviewer},
    teams::{add_team::AddTeam, get_team::GetTeam},
    users::set_user_active::SetUserActive,
};

module! {
    pub CoreModule {
        components = [
            CreatePullRequest, GetPullRequest, MergePullRequest,
            ListReviewQueue, ReassignReviewer,
            AddTeam, GetTeam,
            SetUserActive
        ],
        providers = []
    }
}
