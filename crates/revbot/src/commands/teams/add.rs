use std::str::FromStr;

use async_trait::async_trait;
use clap::Parser;
use revbot_core::use_cases::teams::AddTeamInterface;
use revbot_models::User;
use shaku::HasComponent;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Team member, written `id`, `id:username` or `id:username:inactive`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemberSpec(User);

impl FromStr for MemberSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let id = parts.next().unwrap_or_default().trim();
        if id.is_empty() {
            return Err(format!("missing user id in '{s}'"));
        }

        let mut user = User::new(id, "");
        if let Some(username) = parts.next().filter(|u| !u.is_empty()) {
            user = user.with_username(username);
        }

        match parts.next() {
            None | Some("active") => {}
            Some("inactive") => user = user.with_active(false),
            Some(other) => return Err(format!("unknown member flag '{other}'")),
        }

        if parts.next().is_some() {
            return Err(format!("too many fields in '{s}'"));
        }

        Ok(Self(user))
    }
}

/// Add a team with its members
#[derive(Parser)]
pub(crate) struct TeamAddCommand {
    /// Team name
    team_name: String,

    /// Member, as `id[:username[:inactive]]`
    #[arg(long = "member")]
    members: Vec<MemberSpec>,
}

#[async_trait]
impl Command for TeamAddCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let members: Vec<User> = self.members.into_iter().map(|m| m.0).collect();

        let add_team: &dyn AddTeamInterface = ctx.core_module.resolve_ref();
        let team = add_team
            .run(&ctx.as_core_context(), &self.team_name, &members)
            .await?;

        writeln!(
            ctx.writer.write().await,
            "Team '{}' created with {} member(s).",
            team.team.name,
            team.members.len()
        )?;
        Ok(())
    }
}
