//! JSON API handlers.

use actix_web::web;

use crate::ServerError;

mod pulls;
mod teams;
mod users;

pub(crate) fn configure_api_handlers(cfg: &mut web::ServiceConfig) {
    cfg.route("/team/add", web::post().to(teams::team_add))
        .route("/team/get", web::get().to(teams::team_get))
        .route("/users/setIsActive", web::post().to(users::set_is_active))
        .route("/users/getReview", web::get().to(users::get_review))
        .route("/pullRequest/create", web::post().to(pulls::create))
        .route("/pullRequest/merge", web::post().to(pulls::merge))
        .route("/pullRequest/reassign", web::post().to(pulls::reassign));
}

/// Reject blank identifiers.
fn require(name: &str, value: &str) -> Result<(), ServerError> {
    if value.trim().is_empty() {
        Err(ServerError::BadRequest {
            message: format!("{name} required"),
        })
    } else {
        Ok(())
    }
}
