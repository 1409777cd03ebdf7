use async_trait::async_trait;
use clap::{Parser, Subcommand};

use super::{Command, CommandContext};
use crate::Result;

mod review_queue;
mod set_active;

use self::{review_queue::UserReviewQueueCommand, set_active::UserSetActiveCommand};

/// Manage users
#[derive(Parser)]
pub(crate) struct UserCommand {
    #[clap(subcommand)]
    inner: UserSubCommand,
}

#[async_trait]
impl Command for UserCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        self.inner.execute(ctx).await
    }
}

#[derive(Subcommand)]
enum UserSubCommand {
    SetActive(UserSetActiveCommand),
    ReviewQueue(UserReviewQueueCommand),
}

#[async_trait]
impl Command for UserSubCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        match self {
            Self::SetActive(sub) => sub.execute(ctx).await,
            Self::ReviewQueue(sub) => sub.execute(ctx).await,
        }
    }
}
