use async_trait::async_trait;
use clap::Parser;
use revbot_core::use_cases::reviews::ListReviewQueueInterface;
use shaku::HasComponent;

use crate::{
    commands::{format_reviewers, Command, CommandContext},
    Result,
};

/// List open pull requests assigned to a user
#[derive(Parser)]
pub(crate) struct UserReviewQueueCommand {
    /// User id
    user_id: String,
}

#[async_trait]
impl Command for UserReviewQueueCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let list_review_queue: &dyn ListReviewQueueInterface = ctx.core_module.resolve_ref();
        let pull_requests = list_review_queue
            .run(&ctx.as_core_context(), &self.user_id)
            .await?;

        let mut writer = ctx.writer.write().await;
        if pull_requests.is_empty() {
            writeln!(writer, "No pull request to review for '{}'.", self.user_id)?;
        } else {
            writeln!(writer, "Pull requests to review for '{}':", self.user_id)?;
            for pr in pull_requests {
                writeln!(
                    writer,
                    "- {} '{}' by {} (reviewers: {})",
                    pr.id,
                    pr.name,
                    pr.author_id,
                    format_reviewers(&pr)
                )?;
            }
        }

        Ok(())
    }
}
