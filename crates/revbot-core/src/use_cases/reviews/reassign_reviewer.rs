use async_trait::async_trait;
use revbot_database_interface::DbTransaction;
use revbot_models::{current_timestamp, PullRequest, ReviewerSlots};
use shaku::{Component, Interface};
use tracing::info;

use crate::{transaction::finish, CoreContext, DomainError, Result};

/// Outcome of a reviewer reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignedReviewer {
    pub new_reviewer_id: String,
    /// Pull request state right after the swap.
    pub pull_request: PullRequest,
}

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ReassignReviewerInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        pull_request_id: &str,
        old_reviewer_id: &str,
    ) -> Result<ReassignedReviewer>;
}

/// Hand the slot of `old_reviewer_id` to another active member of their team.
///
/// Runs under the pull request row lock, so concurrent reassignments on the
/// same pull request are applied one after the other and each one sees the
/// slots left by the previous one.
#[derive(Component)]
#[shaku(interface = ReassignReviewerInterface)]
pub(crate) struct ReassignReviewer;

#[async_trait]
impl ReassignReviewerInterface for ReassignReviewer {
    #[tracing::instrument(skip(self, ctx), ret)]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        pull_request_id: &str,
        old_reviewer_id: &str,
    ) -> Result<ReassignedReviewer> {
        let mut tx = ctx.db_service.begin().await?;
        let result = self
            .reassign(ctx, &mut *tx, pull_request_id, old_reviewer_id)
            .await;
        finish(tx, result).await
    }
}

impl ReassignReviewer {
    async fn reassign(
        &self,
        ctx: &CoreContext<'_>,
        tx: &mut dyn DbTransaction,
        pull_request_id: &str,
        old_reviewer_id: &str,
    ) -> Result<ReassignedReviewer> {
        let pr = tx.pull_requests_lock(pull_request_id).await?.ok_or_else(|| {
            DomainError::PullRequestNotFound {
                pull_request_id: pull_request_id.into(),
            }
        })?;

        if pr.is_merged() {
            return Err(DomainError::PullRequestMerged {
                pull_request_id: pull_request_id.into(),
            });
        }

        let mut slots = ReviewerSlots::from_slots(
            pull_request_id,
            tx.assignment_slots_list(pull_request_id).await?,
        )?;
        let slot = slots.position_of(old_reviewer_id).ok_or_else(|| {
            DomainError::ReviewerNotAssigned {
                pull_request_id: pull_request_id.into(),
                reviewer_id: old_reviewer_id.into(),
            }
        })?;

        let old_reviewer = tx.users_get_expect(old_reviewer_id).await?;
        let candidates = tx
            .users_list_active_teammates(&old_reviewer.team_name, &slots.reviewers())
            .await?;
        let new_reviewer_id = ctx
            .reviewer_picker
            .pick(&candidates, 1)
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::NoCandidate {
                pull_request_id: pull_request_id.into(),
            })?;

        let now = current_timestamp();
        slots.replace(slot, &new_reviewer_id, now)?;
        tx.assignment_slots_set_reviewer(pull_request_id, slot, &new_reviewer_id, now)
            .await?;

        info!(
            pull_request_id = pull_request_id,
            slot = slot,
            old_reviewer_id = old_reviewer_id,
            new_reviewer_id = %new_reviewer_id,
            "Reviewer reassigned"
        );

        Ok(ReassignedReviewer {
            new_reviewer_id,
            pull_request: pr.with_slots(&slots.into_slots()),
        })
    }
}
