//! Commands.

use std::{io::Write, sync::Arc};

use async_trait::async_trait;
use clap::Subcommand;
use revbot_config::Config;
use revbot_core::{random::ReviewerPicker, CoreContext, CoreModule};
use revbot_database_interface::DbService;
use revbot_models::PullRequest;
use tokio::sync::RwLock;

use self::{
    pull_request::PullRequestCommand, server::ServerCommand, teams::TeamCommand,
    users::UserCommand,
};
use crate::Result;

mod pull_request;
mod server;
mod teams;
mod users;

pub(crate) struct CommandContext {
    pub config: Config,
    pub core_module: CoreModule,
    pub db_service: Box<dyn DbService>,
    pub reviewer_picker: Box<dyn ReviewerPicker>,
    pub writer: Arc<RwLock<dyn Write + Send + Sync>>,
}

impl CommandContext {
    pub fn as_core_context(&self) -> CoreContext {
        CoreContext {
            config: &self.config,
            core_module: &self.core_module,
            db_service: self.db_service.as_ref(),
            reviewer_picker: self.reviewer_picker.as_ref(),
        }
    }
}

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, ctx: CommandContext) -> Result<()>;
}

/// Command
#[derive(Subcommand)]
pub(crate) enum SubCommand {
    Server(ServerCommand),
    Teams(TeamCommand),
    Users(UserCommand),
    PullRequests(PullRequestCommand),
}

#[async_trait]
impl Command for SubCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        match self {
            Self::Server(sub) => sub.execute(ctx).await,
            Self::Teams(sub) => sub.execute(ctx).await,
            Self::Users(sub) => sub.execute(ctx).await,
            Self::PullRequests(sub) => sub.execute(ctx).await,
        }
    }
}

/// Comma-separated reviewer slate, in slot order.
pub(crate) fn format_reviewers(pr: &PullRequest) -> String {
    if pr.reviewers.is_empty() {
        "(none)".into()
    } else {
        pr.reviewers.join(", ")
    }
}
