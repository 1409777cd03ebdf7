use async_trait::async_trait;
use revbot_models::PullRequest;
use shaku::{Component, Interface};

use crate::{CoreContext, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ListReviewQueueInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, user_id: &str) -> Result<Vec<PullRequest>>;
}

/// Open pull requests where a user holds a reviewer slot.
///
/// Unknown users simply have an empty queue.
#[derive(Component)]
#[shaku(interface = ListReviewQueueInterface)]
pub(crate) struct ListReviewQueue;

#[async_trait]
impl ListReviewQueueInterface for ListReviewQueue {
    #[tracing::instrument(skip(self, ctx))]
    async fn run<'a>(&self, ctx: &CoreContext<'a>, user_id: &str) -> Result<Vec<PullRequest>> {
        Ok(ctx
            .db_service
            .pull_requests_list_for_reviewer(user_id)
            .await?)
    }
}
