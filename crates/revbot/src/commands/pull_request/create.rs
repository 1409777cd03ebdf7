use async_trait::async_trait;
use clap::Parser;
use revbot_core::use_cases::pulls::CreatePullRequestInterface;
use shaku::HasComponent;

use crate::{
    commands::{format_reviewers, Command, CommandContext},
    Result,
};

/// Create a pull request and assign its reviewers
#[derive(Parser)]
pub(crate) struct PullRequestCreateCommand {
    /// Pull request id
    pull_request_id: String,

    /// Pull request title
    title: String,

    /// Author id
    author_id: String,
}

#[async_trait]
impl Command for PullRequestCreateCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let create_pull_request: &dyn CreatePullRequestInterface = ctx.core_module.resolve_ref();
        let pr = create_pull_request
            .run(
                &ctx.as_core_context(),
                &self.pull_request_id,
                &self.title,
                &self.author_id,
            )
            .await?;

        writeln!(
            ctx.writer.write().await,
            "Pull request '{}' created, reviewers: {}.",
            pr.id,
            format_reviewers(&pr)
        )?;
        Ok(())
    }
}
