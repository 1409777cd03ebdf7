use async_trait::async_trait;
use shaku::{Component, Interface};

use super::TeamWithMembers;
use crate::{CoreContext, DomainError, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait GetTeamInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, team_name: &str) -> Result<TeamWithMembers>;
}

#[derive(Component)]
#[shaku(interface = GetTeamInterface)]
pub(crate) struct GetTeam;

#[async_trait]
impl GetTeamInterface for GetTeam {
    #[tracing::instrument(skip(self, ctx))]
    async fn run<'a>(&self, ctx: &CoreContext<'a>, team_name: &str) -> Result<TeamWithMembers> {
        let team = ctx
            .db_service
            .teams_get(team_name)
            .await?
            .ok_or_else(|| DomainError::TeamNotFound {
                team_name: team_name.into(),
            })?;
        let members = ctx.db_service.team_members_list(team_name).await?;

        Ok(TeamWithMembers { team, members })
    }
}
