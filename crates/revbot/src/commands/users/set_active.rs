use async_trait::async_trait;
use clap::{ArgAction, Parser};
use revbot_core::use_cases::users::SetUserActiveInterface;
use shaku::HasComponent;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Set whether a user can be assigned as reviewer
#[derive(Parser)]
pub(crate) struct UserSetActiveCommand {
    /// User id
    user_id: String,

    /// Active flag
    #[arg(action = ArgAction::Set)]
    value: bool,
}

#[async_trait]
impl Command for UserSetActiveCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let set_user_active: &dyn SetUserActiveInterface = ctx.core_module.resolve_ref();
        let user = set_user_active
            .run(&ctx.as_core_context(), &self.user_id, self.value)
            .await?;

        writeln!(
            ctx.writer.write().await,
            "User '{}' is now {}.",
            user.id,
            if user.is_active { "active" } else { "inactive" }
        )?;
        Ok(())
    }
}
