use std::collections::BTreeMap;

use async_trait::async_trait;
use revbot_database_interface::DbTransaction;
use revbot_models::{current_timestamp, Team, User};
use shaku::{Component, Interface};

use super::TeamWithMembers;
use crate::{transaction::finish, CoreContext, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait AddTeamInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        team_name: &str,
        members: &[User],
    ) -> Result<TeamWithMembers>;
}

/// Create a team and upsert its members into it.
///
/// Members are moved into the new team even if they belonged to another one.
#[derive(Component)]
#[shaku(interface = AddTeamInterface)]
pub(crate) struct AddTeam;

#[async_trait]
impl AddTeamInterface for AddTeam {
    #[tracing::instrument(skip(self, ctx, members), fields(members = members.len()), ret)]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        team_name: &str,
        members: &[User],
    ) -> Result<TeamWithMembers> {
        let mut tx = ctx.db_service.begin().await?;
        let result = self.add(&mut *tx, team_name, members).await;
        finish(tx, result).await
    }
}

impl AddTeam {
    async fn add(
        &self,
        tx: &mut dyn DbTransaction,
        team_name: &str,
        members: &[User],
    ) -> Result<TeamWithMembers> {
        let team = tx
            .teams_create(Team {
                created_at: current_timestamp(),
                ..Team::new(team_name)
            })
            .await?;

        // Last entry wins on duplicate ids.
        let mut upserted = BTreeMap::new();
        for member in members {
            let user = tx
                .users_upsert(User {
                    team_name: team_name.into(),
                    ..member.clone()
                })
                .await?;
            upserted.insert(user.id.clone(), user);
        }

        Ok(TeamWithMembers {
            team,
            members: upserted.into_values().collect(),
        })
    }
}
