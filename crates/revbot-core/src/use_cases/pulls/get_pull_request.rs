use async_trait::async_trait;
use revbot_models::PullRequest;
use shaku::{Component, Interface};

use crate::{CoreContext, DomainError, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait GetPullRequestInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, pull_request_id: &str) -> Result<PullRequest>;
}

#[derive(Component)]
#[shaku(interface = GetPullRequestInterface)]
pub(crate) struct GetPullRequest;

#[async_trait]
impl GetPullRequestInterface for GetPullRequest {
    #[tracing::instrument(skip(self, ctx))]
    async fn run<'a>(&self, ctx: &CoreContext<'a>, pull_request_id: &str) -> Result<PullRequest> {
        ctx.db_service
            .pull_requests_get(pull_request_id)
            .await?
            .ok_or_else(|| DomainError::PullRequestNotFound {
                pull_request_id: pull_request_id.into(),
            })
    }
}
