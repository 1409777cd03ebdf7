use pretty_assertions::assert_eq;
use revbot_database_interface::DatabaseError;
use revbot_models::{current_timestamp, PullRequest, Team, User};

use crate::{
    fixtures::{seed_pull_request, seed_team},
    testcase::db_test_case,
};

#[tokio::test]
async fn dropped_transaction_discards_writes() {
    db_test_case("transaction_dropped", |db| async move {
        {
            let mut tx = db.begin().await?;
            tx.teams_create(Team::new("backend")).await?;
            tx.users_upsert(User::new("u1", "backend")).await?;
        }

        assert_eq!(db.teams_get("backend").await?, None);
        assert_eq!(db.users_get("u1").await?, None);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn rollback_discards_writes() {
    db_test_case("transaction_rollback", |db| async move {
        seed_team(&*db, "backend", &[("author", true)]).await?;

        let mut tx = db.begin().await?;
        tx.pull_requests_create(PullRequest {
            created_at: current_timestamp(),
            ..PullRequest::new("pr-1", "Title", "author")
        })
        .await?;
        assert!(tx.pull_requests_get("pr-1").await?.is_some());
        tx.rollback().await?;

        assert_eq!(db.pull_requests_get("pr-1").await?, None);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn writes_stay_private_until_commit() {
    db_test_case("transaction_private_writes", |db| async move {
        seed_team(&*db, "backend", &[("u1", true)]).await?;

        let mut tx = db.begin().await?;
        tx.users_set_active("u1", false).await?;
        assert!(db.users_get_expect("u1").await?.is_active);
        tx.commit().await?;

        assert!(!db.users_get_expect("u1").await?.is_active);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn row_lock_is_exclusive() {
    db_test_case("transaction_row_lock", |db| async move {
        seed_team(&*db, "backend", &[("author", true)]).await?;
        seed_pull_request(&*db, "pr-1", "author", &[]).await?;
        seed_pull_request(&*db, "pr-2", "author", &[]).await?;

        let mut first = db.begin().await?;
        assert!(first.pull_requests_lock("pr-1").await?.is_some());

        let mut second = db.begin().await?;
        assert!(matches!(
            second.pull_requests_lock("pr-1").await,
            Err(DatabaseError::LockTimeout(id)) if id == "pr-1"
        ));
        second.rollback().await?;

        // Locks are per pull request.
        let mut other = db.begin().await?;
        assert!(other.pull_requests_lock("pr-2").await?.is_some());
        other.rollback().await?;

        // Plain reads never wait.
        assert!(db.pull_requests_get("pr-1").await?.is_some());

        first.commit().await?;

        let mut third = db.begin().await?;
        assert!(third.pull_requests_lock("pr-1").await?.is_some());
        third.rollback().await?;

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn lock_unknown_pull_request() {
    db_test_case("transaction_lock_unknown", |db| async move {
        let mut tx = db.begin().await?;
        assert_eq!(tx.pull_requests_lock("nope").await?, None);
        tx.rollback().await?;

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn concurrent_create_waits_for_owner() {
    db_test_case("transaction_concurrent_create", |db| async move {
        seed_team(&*db, "backend", &[("author", true)]).await?;

        let mut first = db.begin().await?;
        first
            .pull_requests_create(PullRequest {
                created_at: current_timestamp(),
                ..PullRequest::new("pr-1", "First", "author")
            })
            .await?;

        let mut second = db.begin().await?;
        assert!(matches!(
            second
                .pull_requests_create(PullRequest::new("pr-1", "Second", "author"))
                .await,
            Err(DatabaseError::LockTimeout(_))
        ));
        second.rollback().await?;

        first.commit().await?;

        let mut third = db.begin().await?;
        assert!(matches!(
            third
                .pull_requests_create(PullRequest::new("pr-1", "Third", "author"))
                .await,
            Err(DatabaseError::PullRequestAlreadyExists(_))
        ));
        third.rollback().await?;

        assert_eq!(db.pull_requests_get_expect("pr-1").await?.name, "First");

        Ok(())
    })
    .await;
}
