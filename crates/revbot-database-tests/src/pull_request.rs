use pretty_assertions::assert_eq;
use revbot_database_interface::DatabaseError;
use revbot_models::{current_timestamp, PullRequest, PullRequestStatus};

use crate::{
    fixtures::{seed_pull_request, seed_team},
    testcase::db_test_case,
};

#[tokio::test]
async fn create() {
    db_test_case("pull_request_create", |db| async move {
        seed_team(&*db, "backend", &[("author", true), ("r1", true), ("r2", true)]).await?;

        let pr = seed_pull_request(&*db, "pr-1", "author", &["r2", "r1"]).await?;
        assert_eq!(pr.name, "Title pr-1");
        assert_eq!(pr.status, PullRequestStatus::Open);
        assert_eq!(pr.merged_at, None);
        assert_eq!(pr.reviewers, vec!["r2".to_string(), "r1".to_string()]);

        let empty = seed_pull_request(&*db, "pr-2", "author", &[]).await?;
        assert!(empty.reviewers.is_empty());

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn create_conflicts() {
    db_test_case("pull_request_create_conflicts", |db| async move {
        seed_team(&*db, "backend", &[("author", true)]).await?;
        seed_pull_request(&*db, "pr-1", "author", &[]).await?;

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.pull_requests_create(PullRequest::new("pr-1", "Again", "author"))
                .await,
            Err(DatabaseError::PullRequestAlreadyExists(id)) if id == "pr-1"
        ));
        tx.rollback().await?;

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.pull_requests_create(PullRequest::new("pr-2", "Ghost", "ghost"))
                .await,
            Err(DatabaseError::UnknownUser(id)) if id == "ghost"
        ));
        tx.rollback().await?;

        assert_eq!(db.pull_requests_get("pr-2").await?, None);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn get_unknown() {
    db_test_case("pull_request_get_unknown", |db| async move {
        assert!(matches!(
            db.pull_requests_get_expect("nope").await,
            Err(DatabaseError::UnknownPullRequest(id)) if id == "nope"
        ));

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn set_merged() {
    db_test_case("pull_request_set_merged", |db| async move {
        seed_team(&*db, "backend", &[("author", true), ("r1", true)]).await?;
        seed_pull_request(&*db, "pr-1", "author", &["r1"]).await?;

        let merged_at = current_timestamp();
        let mut tx = db.begin().await?;
        let pr = tx.pull_requests_set_merged("pr-1", merged_at).await?;
        tx.commit().await?;

        assert_eq!(pr.status, PullRequestStatus::Merged);
        assert_eq!(pr.merged_at, Some(merged_at));
        assert_eq!(pr.reviewers, vec!["r1".to_string()]);
        assert_eq!(db.pull_requests_get_expect("pr-1").await?, pr);

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.pull_requests_set_merged("nope", merged_at).await,
            Err(DatabaseError::UnknownPullRequest(_))
        ));
        tx.rollback().await?;

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn list_for_reviewer() {
    db_test_case("pull_request_list_for_reviewer", |db| async move {
        seed_team(
            &*db,
            "backend",
            &[("author", true), ("r1", true), ("r2", true)],
        )
        .await?;
        seed_pull_request(&*db, "pr-b", "author", &["r1", "r2"]).await?;
        seed_pull_request(&*db, "pr-a", "author", &["r2", "r1"]).await?;
        seed_pull_request(&*db, "pr-c", "author", &["r2"]).await?;
        seed_pull_request(&*db, "pr-d", "author", &["r1"]).await?;

        let mut tx = db.begin().await?;
        tx.pull_requests_set_merged("pr-d", current_timestamp())
            .await?;
        tx.commit().await?;

        let pulls = db.pull_requests_list_for_reviewer("r1").await?;
        let summary: Vec<_> = pulls
            .iter()
            .map(|p| (p.id.as_str(), p.reviewers.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("pr-a", vec!["r2".to_string(), "r1".to_string()]),
                ("pr-b", vec!["r1".to_string(), "r2".to_string()]),
            ]
        );

        assert!(db.pull_requests_list_for_reviewer("author").await?.is_empty());
        assert!(db.pull_requests_list_for_reviewer("ghost").await?.is_empty());

        Ok(())
    })
    .await;
}
