use actix_web::{web, HttpResponse};
use revbot_core::use_cases::{
    pulls::{CreatePullRequestInterface, MergePullRequestInterface},
    reviews::ReassignReviewerInterface,
};
use shaku::HasComponent;

use super::require;
use crate::{
    dto::{CreatePullRequestJson, MergePullRequestJson, PullRequestJson, ReassignJson},
    metrics::{PULL_REQUESTS_CREATED, PULL_REQUESTS_MERGED, REVIEWERS_REASSIGNED},
    server::AppContext,
    Result,
};

#[tracing::instrument(skip_all, fields(
    pull_request_id = data.pull_request_id,
    author_id = data.author_id
))]
pub(crate) async fn create(
    ctx: web::Data<AppContext>,
    data: web::Json<CreatePullRequestJson>,
) -> Result<HttpResponse> {
    require("pull_request_id", &data.pull_request_id)?;
    require("author_id", &data.author_id)?;

    let create_pull_request: &dyn CreatePullRequestInterface = ctx.core_module.resolve_ref();
    let pr = create_pull_request
        .run(
            &ctx.as_core_context(),
            &data.pull_request_id,
            &data.pull_request_name,
            &data.author_id,
        )
        .await?;
    PULL_REQUESTS_CREATED.inc();

    Ok(HttpResponse::Created().json(serde_json::json!({ "pr": PullRequestJson::from(pr) })))
}

#[tracing::instrument(skip_all, fields(pull_request_id = data.pull_request_id))]
pub(crate) async fn merge(
    ctx: web::Data<AppContext>,
    data: web::Json<MergePullRequestJson>,
) -> Result<HttpResponse> {
    require("pull_request_id", &data.pull_request_id)?;

    let merge_pull_request: &dyn MergePullRequestInterface = ctx.core_module.resolve_ref();
    let pr = merge_pull_request
        .run(&ctx.as_core_context(), &data.pull_request_id)
        .await?;
    PULL_REQUESTS_MERGED.inc();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "pr": PullRequestJson::from(pr) })))
}

#[tracing::instrument(skip_all, fields(
    pull_request_id = data.pull_request_id,
    old_user_id = data.old_user_id
))]
pub(crate) async fn reassign(
    ctx: web::Data<AppContext>,
    data: web::Json<ReassignJson>,
) -> Result<HttpResponse> {
    require("pull_request_id", &data.pull_request_id)?;
    require("old_user_id", &data.old_user_id)?;

    let reassign_reviewer: &dyn ReassignReviewerInterface = ctx.core_module.resolve_ref();
    let reassigned = reassign_reviewer
        .run(
            &ctx.as_core_context(),
            &data.pull_request_id,
            &data.old_user_id,
        )
        .await?;
    REVIEWERS_REASSIGNED.inc();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "pr": PullRequestJson::from(reassigned.pull_request),
        "replaced_by": reassigned.new_reviewer_id,
    })))
}
