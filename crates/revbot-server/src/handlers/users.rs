use actix_web::{web, HttpResponse};
use revbot_core::use_cases::{
    reviews::ListReviewQueueInterface, users::SetUserActiveInterface,
};
use shaku::HasComponent;

use super::require;
use crate::{
    dto::{PullRequestShortJson, SetIsActiveJson, UserJson, UserQuery},
    server::AppContext,
    Result,
};

#[tracing::instrument(skip_all, fields(user_id = data.user_id, is_active = data.is_active))]
pub(crate) async fn set_is_active(
    ctx: web::Data<AppContext>,
    data: web::Json<SetIsActiveJson>,
) -> Result<HttpResponse> {
    require("user_id", &data.user_id)?;

    let set_user_active: &dyn SetUserActiveInterface = ctx.core_module.resolve_ref();
    let user = set_user_active
        .run(&ctx.as_core_context(), &data.user_id, data.is_active)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "user": UserJson::from(user) })))
}

#[tracing::instrument(skip_all, fields(user_id = query.user_id))]
pub(crate) async fn get_review(
    ctx: web::Data<AppContext>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    require("user_id", &query.user_id)?;

    let list_review_queue: &dyn ListReviewQueueInterface = ctx.core_module.resolve_ref();
    let pull_requests: Vec<PullRequestShortJson> = list_review_queue
        .run(&ctx.as_core_context(), &query.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user_id": query.user_id,
        "pull_requests": pull_requests,
    })))
}
