use async_trait::async_trait;
use revbot_database_interface::DbTransaction;
use revbot_models::{current_timestamp, PullRequest, ReviewerSlots, MAX_REVIEWER_SLOTS};
use shaku::{Component, Interface};
use tracing::info;

use crate::{transaction::finish, CoreContext, DomainError, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait CreatePullRequestInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        pull_request_id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest>;
}

/// Open a pull request and seat its initial reviewers.
///
/// Reviewers are drawn from the active teammates of the author. The pull
/// request row and its slots are written in the same transaction.
#[derive(Component)]
#[shaku(interface = CreatePullRequestInterface)]
pub(crate) struct CreatePullRequest;

#[async_trait]
impl CreatePullRequestInterface for CreatePullRequest {
    #[tracing::instrument(skip(self, ctx), ret)]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        pull_request_id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest> {
        let mut tx = ctx.db_service.begin().await?;
        let result = self
            .create(ctx, &mut *tx, pull_request_id, name, author_id)
            .await;
        finish(tx, result).await
    }
}

impl CreatePullRequest {
    async fn create(
        &self,
        ctx: &CoreContext<'_>,
        tx: &mut dyn DbTransaction,
        pull_request_id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest> {
        let author = tx
            .users_get(author_id)
            .await?
            .ok_or_else(|| DomainError::AuthorNotFound {
                author_id: author_id.into(),
            })?;

        if tx.pull_requests_get(pull_request_id).await?.is_some() {
            return Err(DomainError::PullRequestAlreadyExists {
                pull_request_id: pull_request_id.into(),
            });
        }

        let candidates = tx
            .users_list_active_teammates(&author.team_name, &[author.id.clone()])
            .await?;
        let wanted = ctx.config.reviewers.max_count.min(MAX_REVIEWER_SLOTS);
        let chosen = ctx.reviewer_picker.pick(&candidates, wanted);
        if chosen.len() < ctx.config.reviewers.min_count {
            return Err(DomainError::NoCandidate {
                pull_request_id: pull_request_id.into(),
            });
        }

        let now = current_timestamp();
        let slots = ReviewerSlots::seat(pull_request_id, &chosen, now)?;

        let pull_request = tx
            .pull_requests_create(PullRequest {
                created_at: now,
                ..PullRequest::new(pull_request_id, name, author_id)
            })
            .await?;
        for slot in slots.iter() {
            tx.assignment_slots_create(slot.clone()).await?;
        }

        info!(
            pull_request_id = pull_request_id,
            reviewers = ?slots.reviewers(),
            "Pull request created"
        );

        Ok(pull_request.with_slots(&slots.into_slots()))
    }
}
