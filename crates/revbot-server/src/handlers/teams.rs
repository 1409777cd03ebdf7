use actix_web::{web, HttpResponse};
use revbot_core::use_cases::teams::{AddTeamInterface, GetTeamInterface};
use shaku::HasComponent;

use super::require;
use crate::{
    dto::{TeamJson, TeamQuery},
    server::AppContext,
    Result,
};

#[tracing::instrument(skip_all, fields(team_name = data.team_name, members = data.members.len()))]
pub(crate) async fn team_add(
    ctx: web::Data<AppContext>,
    data: web::Json<TeamJson>,
) -> Result<HttpResponse> {
    let data = data.into_inner();
    require("team_name", &data.team_name)?;
    for member in &data.members {
        require("user_id", &member.user_id)?;
    }

    let members: Vec<_> = data.members.into_iter().map(|m| m.into_user()).collect();
    let add_team: &dyn AddTeamInterface = ctx.core_module.resolve_ref();
    let team = add_team
        .run(&ctx.as_core_context(), &data.team_name, &members)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "team": TeamJson::from(team) })))
}

#[tracing::instrument(skip_all, fields(team_name = query.team_name))]
pub(crate) async fn team_get(
    ctx: web::Data<AppContext>,
    query: web::Query<TeamQuery>,
) -> Result<HttpResponse> {
    require("team_name", &query.team_name)?;

    let get_team: &dyn GetTeamInterface = ctx.core_module.resolve_ref();
    let team = get_team
        .run(&ctx.as_core_context(), &query.team_name)
        .await?;

    Ok(HttpResponse::Ok().json(TeamJson::from(team)))
}
