use async_trait::async_trait;
use revbot_models::User;
use shaku::{Component, Interface};
use tracing::info;

use crate::{transaction::finish, CoreContext, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait SetUserActiveInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, user_id: &str, value: bool) -> Result<User>;
}

/// Toggle whether a user can be picked as a reviewer.
///
/// Slots already held by the user are left untouched.
#[derive(Component)]
#[shaku(interface = SetUserActiveInterface)]
pub(crate) struct SetUserActive;

#[async_trait]
impl SetUserActiveInterface for SetUserActive {
    #[tracing::instrument(skip(self, ctx), ret)]
    async fn run<'a>(&self, ctx: &CoreContext<'a>, user_id: &str, value: bool) -> Result<User> {
        let mut tx = ctx.db_service.begin().await?;
        let result = tx.users_set_active(user_id, value).await.map_err(Into::into);
        let user = finish(tx, result).await?;

        info!(user_id = user_id, is_active = value, "User activity updated");
        Ok(user)
    }
}
