use async_trait::async_trait;
use clap::Parser;
use revbot_core::use_cases::reviews::ReassignReviewerInterface;
use shaku::HasComponent;

use crate::{
    commands::{format_reviewers, Command, CommandContext},
    Result,
};

/// Hand a reviewer slot to another member of the reviewer's team
#[derive(Parser)]
pub(crate) struct PullRequestReassignCommand {
    /// Pull request id
    pull_request_id: String,

    /// Reviewer to replace
    old_reviewer_id: String,
}

#[async_trait]
impl Command for PullRequestReassignCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let reassign_reviewer: &dyn ReassignReviewerInterface = ctx.core_module.resolve_ref();
        let reassigned = reassign_reviewer
            .run(
                &ctx.as_core_context(),
                &self.pull_request_id,
                &self.old_reviewer_id,
            )
            .await?;

        writeln!(
            ctx.writer.write().await,
            "Reviewer '{}' replaced by '{}' on pull request '{}', reviewers: {}.",
            self.old_reviewer_id,
            reassigned.new_reviewer_id,
            reassigned.pull_request.id,
            format_reviewers(&reassigned.pull_request)
        )?;
        Ok(())
    }
}
