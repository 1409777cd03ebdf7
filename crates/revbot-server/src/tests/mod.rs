//! HTTP API tests.

use actix_http::StatusCode;
use actix_web::{test, web::Data};
use pretty_assertions::assert_eq;
use revbot_config::Config;
use revbot_core::{
    random::SeededReviewerPicker,
    use_cases::reviews::{MockReassignReviewerInterface, ReassignReviewerInterface},
    CoreModule, DomainError,
};
use revbot_database_interface::DatabaseError;
use revbot_database_memory::MemoryDb;
use serde_json::{json, Value};

use crate::{
    metrics::build_metrics_handler,
    server::{build_actix_app, AppContext},
};

fn build_context(core_module: CoreModule) -> Data<AppContext> {
    let mut config = Config::from_env_no_version().unwrap();
    config.random_seed = 42;
    config.reviewers.max_count = 2;
    config.reviewers.min_count = 0;

    Data::new(AppContext::new_with_adapters(
        config,
        core_module,
        Box::new(MemoryDb::new()),
        Box::new(SeededReviewerPicker::new(42)),
    ))
}

async fn call(ctx: &Data<AppContext>, req: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(build_actix_app(
        ctx.clone(),
        build_metrics_handler().unwrap(),
    ))
    .await;
    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

async fn post(ctx: &Data<AppContext>, uri: &str, body: Value) -> (StatusCode, Value) {
    call(ctx, test::TestRequest::post().uri(uri).set_json(body)).await
}

async fn get(ctx: &Data<AppContext>, uri: &str) -> (StatusCode, Value) {
    call(ctx, test::TestRequest::get().uri(uri)).await
}

async fn seed_backend(ctx: &Data<AppContext>) {
    let (status, _) = post(
        ctx,
        "/team/add",
        json!({
            "team_name": "backend",
            "members": [
                {"user_id": "author", "username": "Author", "is_active": false},
                {"user_id": "u1", "username": "Alice", "is_active": true},
                {"user_id": "u2", "username": "Bob", "is_active": true},
                {"user_id": "u3", "username": "Carol", "is_active": true},
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

fn reviewers(body: &Value) -> Vec<String> {
    let mut output: Vec<String> = body["pr"]["assigned_reviewers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    output.sort();
    output
}

#[actix_web::test]
async fn health() {
    let ctx = build_context(CoreModule::builder().build());
    assert_eq!(
        get(&ctx, "/health").await,
        (StatusCode::OK, json!({"database": true}))
    );
}

#[actix_web::test]
async fn teams() {
    let ctx = build_context(CoreModule::builder().build());
    seed_backend(&ctx).await;

    let (status, body) = get(&ctx, "/team/get?team_name=backend").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["team_name"], "backend");
    assert_eq!(
        body["members"][1],
        json!({"user_id": "u1", "username": "Alice", "is_active": true})
    );

    let (status, body) = post(
        &ctx,
        "/team/add",
        json!({"team_name": "backend", "members": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "TEAM_EXISTS");

    let (status, body) = get(&ctx, "/team/get?team_name=frontend").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = get(&ctx, "/team/get").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[actix_web::test]
async fn users() {
    let ctx = build_context(CoreModule::builder().build());
    seed_backend(&ctx).await;

    let (status, body) = post(
        &ctx,
        "/users/setIsActive",
        json!({"user_id": "u1", "is_active": false}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"user": {"user_id": "u1", "username": "Alice", "team_name": "backend", "is_active": false}})
    );

    let (status, body) = post(
        &ctx,
        "/users/setIsActive",
        json!({"user_id": "ghost", "is_active": true}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    assert_eq!(
        get(&ctx, "/users/getReview?user_id=ghost").await,
        (
            StatusCode::OK,
            json!({"user_id": "ghost", "pull_requests": []})
        )
    );
}

#[actix_web::test]
async fn pull_request_lifecycle() {
    let ctx = build_context(CoreModule::builder().build());
    seed_backend(&ctx).await;

    let (status, body) = post(
        &ctx,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "Add feature", "author_id": "author"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["pr"]["status"], "OPEN");
    assert!(body["pr"].get("mergedAt").is_none());
    let slate = body["pr"]["assigned_reviewers"].clone();
    let assigned = reviewers(&body);
    assert_eq!(assigned.len(), 2);

    let old = assigned[0].clone();
    let remaining = ["u1", "u2", "u3"]
        .into_iter()
        .find(|u| !assigned.iter().any(|a| a == u))
        .unwrap();

    let (status, body) = get(&ctx, &format!("/users/getReview?user_id={old}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["pull_requests"],
        json!([{
            "pull_request_id": "pr-1",
            "pull_request_name": "Add feature",
            "author_id": "author",
            "status": "OPEN",
            "assigned_reviewers": slate,
        }])
    );

    let (status, body) = post(
        &ctx,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": old}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["replaced_by"], remaining);
    assert!(!reviewers(&body).contains(&old));

    // The queue of the incoming reviewer shows the updated slate.
    let (status, queue) = get(&ctx, &format!("/users/getReview?user_id={remaining}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        queue["pull_requests"][0]["assigned_reviewers"],
        body["pr"]["assigned_reviewers"]
    );

    let (status, body) = post(
        &ctx,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": old}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "NOT_ASSIGNED");

    let (status, body) = post(&ctx, "/pullRequest/merge", json!({"pull_request_id": "pr-1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pr"]["status"], "MERGED");
    let merged_at = body["pr"]["mergedAt"].clone();
    assert!(merged_at.is_string());

    let (status, body) = post(&ctx, "/pullRequest/merge", json!({"pull_request_id": "pr-1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pr"]["mergedAt"], merged_at);

    let (status, body) = post(
        &ctx,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": remaining}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "PR_MERGED");

    assert_eq!(
        get(&ctx, &format!("/users/getReview?user_id={remaining}")).await,
        (
            StatusCode::OK,
            json!({"user_id": remaining, "pull_requests": []})
        )
    );
}

#[actix_web::test]
async fn pull_request_errors() {
    let ctx = build_context(CoreModule::builder().build());
    seed_backend(&ctx).await;

    let create = json!({"pull_request_id": "pr-1", "pull_request_name": "Title", "author_id": "author"});
    assert_eq!(
        post(&ctx, "/pullRequest/create", create.clone()).await.0,
        StatusCode::CREATED
    );

    let (status, body) = post(&ctx, "/pullRequest/create", create).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "PR_EXISTS");

    let (status, body) = post(
        &ctx,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-2", "pull_request_name": "Title", "author_id": "ghost"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = post(&ctx, "/pullRequest/merge", json!({"pull_request_id": "nope"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = post(&ctx, "/pullRequest/merge", json!({"id": "pr-1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = post(&ctx, "/pullRequest/merge", json!({"pull_request_id": " "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "pull_request_id required");
}

#[actix_web::test]
async fn reassign_without_candidate() {
    let ctx = build_context(CoreModule::builder().build());
    post(
        &ctx,
        "/team/add",
        json!({
            "team_name": "solo",
            "members": [
                {"user_id": "author", "is_active": false},
                {"user_id": "u1"},
            ]
        }),
    )
    .await;

    let (_, body) = post(
        &ctx,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "Title", "author_id": "author"}),
    )
    .await;
    assert_eq!(reviewers(&body), vec!["u1".to_string()]);

    let (status, body) = post(
        &ctx,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": "u1"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "NO_CANDIDATE");
}

#[actix_web::test]
async fn busy_is_service_unavailable() {
    let mut reassign_reviewer = MockReassignReviewerInterface::new();
    reassign_reviewer
        .expect_run()
        .once()
        .withf(|_, pull_request_id, old_reviewer_id| {
            pull_request_id == "pr-1" && old_reviewer_id == "u1"
        })
        .return_once(|_, _, _| {
            Err(DomainError::Busy {
                source: DatabaseError::LockTimeout("pr-1".into()),
            })
        });

    let ctx = build_context(
        CoreModule::builder()
            .with_component_override::<dyn ReassignReviewerInterface>(Box::new(reassign_reviewer))
            .build(),
    );

    let (status, body) = post(
        &ctx,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": "u1"}),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "BUSY");
}

#[actix_web::test]
async fn metrics() {
    let ctx = build_context(CoreModule::builder().build());
    let app = test::init_service(build_actix_app(
        ctx.clone(),
        build_metrics_handler().unwrap(),
    ))
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("reviewers_reassigned"));
}
