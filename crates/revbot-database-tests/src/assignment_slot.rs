use pretty_assertions::assert_eq;
use revbot_database_interface::DatabaseError;
use revbot_models::{current_timestamp, AssignmentSlot};
use time::Duration;

use crate::{
    fixtures::{seed_pull_request, seed_team},
    testcase::db_test_case,
};

#[tokio::test]
async fn create_and_list() {
    db_test_case("assignment_slot_create_and_list", |db| async move {
        seed_team(&*db, "backend", &[("author", true), ("r1", true), ("r2", true)]).await?;
        seed_pull_request(&*db, "pr-1", "author", &[]).await?;

        let now = current_timestamp();
        let mut tx = db.begin().await?;
        let second = tx
            .assignment_slots_create(AssignmentSlot::new("pr-1", 2, "r2", now))
            .await?;
        let first = tx
            .assignment_slots_create(AssignmentSlot::new("pr-1", 1, "r1", now))
            .await?;
        assert_eq!(
            tx.assignment_slots_find_by_reviewer("pr-1", "r2").await?,
            Some(second.clone())
        );
        assert_eq!(tx.assignment_slots_find_by_reviewer("pr-1", "author").await?, None);
        tx.commit().await?;

        assert_eq!(db.assignment_slots_list("pr-1").await?, vec![first, second]);
        assert!(db.assignment_slots_list("nope").await?.is_empty());

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn create_conflicts() {
    db_test_case("assignment_slot_create_conflicts", |db| async move {
        seed_team(&*db, "backend", &[("author", true), ("r1", true), ("r2", true)]).await?;
        seed_pull_request(&*db, "pr-1", "author", &["r1"]).await?;
        let now = current_timestamp();

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.assignment_slots_create(AssignmentSlot::new("pr-1", 2, "r1", now))
                .await,
            Err(DatabaseError::ReviewerAlreadyAssigned(_, id)) if id == "r1"
        ));
        tx.rollback().await?;

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.assignment_slots_create(AssignmentSlot::new("pr-1", 1, "r2", now))
                .await,
            Err(DatabaseError::SlotAlreadyTaken(_, 1))
        ));
        tx.rollback().await?;

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.assignment_slots_create(AssignmentSlot::new("nope", 1, "r2", now))
                .await,
            Err(DatabaseError::UnknownPullRequest(_))
        ));
        tx.rollback().await?;

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.assignment_slots_create(AssignmentSlot::new("pr-1", 2, "ghost", now))
                .await,
            Err(DatabaseError::UnknownUser(_))
        ));
        tx.rollback().await?;

        assert_eq!(db.pull_requests_get_expect("pr-1").await?.reviewers, vec!["r1"]);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn set_reviewer() {
    db_test_case("assignment_slot_set_reviewer", |db| async move {
        seed_team(
            &*db,
            "backend",
            &[("author", true), ("r1", true), ("r2", true), ("r3", true)],
        )
        .await?;
        seed_pull_request(&*db, "pr-1", "author", &["r1", "r2"]).await?;

        let later = current_timestamp() + Duration::minutes(1);
        let mut tx = db.begin().await?;
        let slot = tx
            .assignment_slots_set_reviewer("pr-1", 1, "r3", later)
            .await?;
        tx.commit().await?;

        assert_eq!(slot, AssignmentSlot::new("pr-1", 1, "r3", later));
        assert_eq!(
            db.pull_requests_get_expect("pr-1").await?.reviewers,
            vec!["r3", "r2"]
        );

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.assignment_slots_set_reviewer("pr-1", 1, "r2", later).await,
            Err(DatabaseError::ReviewerAlreadyAssigned(_, id)) if id == "r2"
        ));
        tx.rollback().await?;

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.assignment_slots_set_reviewer("pr-1", 3, "r1", later).await,
            Err(DatabaseError::UnknownSlot(_, 3))
        ));
        tx.rollback().await?;

        Ok(())
    })
    .await;
}
