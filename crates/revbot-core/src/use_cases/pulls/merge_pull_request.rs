use async_trait::async_trait;
use revbot_database_interface::DbTransaction;
use revbot_models::{current_timestamp, PullRequest};
use shaku::{Component, Interface};
use tracing::info;

use crate::{
    transaction::{discard, finish},
    CoreContext, DomainError, Result,
};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait MergePullRequestInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, pull_request_id: &str) -> Result<PullRequest>;
}

/// Mark a pull request as merged, freezing its reviewer slots.
///
/// Merging an already merged pull request returns it unchanged.
#[derive(Component)]
#[shaku(interface = MergePullRequestInterface)]
pub(crate) struct MergePullRequest;

enum MergeOutcome {
    Merged(PullRequest),
    AlreadyMerged(PullRequest),
}

#[async_trait]
impl MergePullRequestInterface for MergePullRequest {
    #[tracing::instrument(skip(self, ctx), ret)]
    async fn run<'a>(&self, ctx: &CoreContext<'a>, pull_request_id: &str) -> Result<PullRequest> {
        let mut tx = ctx.db_service.begin().await?;
        let result = self.merge(&mut *tx, pull_request_id).await;

        match result {
            Ok(MergeOutcome::AlreadyMerged(pr)) => {
                discard(tx).await;
                Ok(pr)
            }
            Ok(MergeOutcome::Merged(pr)) => finish(tx, Ok(pr)).await,
            Err(e) => finish(tx, Err(e)).await,
        }
    }
}

impl MergePullRequest {
    async fn merge(
        &self,
        tx: &mut dyn DbTransaction,
        pull_request_id: &str,
    ) -> Result<MergeOutcome> {
        let pr = tx.pull_requests_lock(pull_request_id).await?.ok_or_else(|| {
            DomainError::PullRequestNotFound {
                pull_request_id: pull_request_id.into(),
            }
        })?;

        if pr.is_merged() {
            return Ok(MergeOutcome::AlreadyMerged(pr));
        }

        let pr = tx
            .pull_requests_set_merged(pull_request_id, current_timestamp())
            .await?;
        info!(pull_request_id = pull_request_id, "Pull request merged");

        Ok(MergeOutcome::Merged(pr))
    }
}
