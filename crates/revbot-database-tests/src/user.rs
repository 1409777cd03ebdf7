use pretty_assertions::assert_eq;
use revbot_database_interface::DatabaseError;
use revbot_models::User;

use crate::{fixtures::seed_team, testcase::db_test_case};

#[tokio::test]
async fn upsert() {
    db_test_case("user_upsert", |db| async move {
        seed_team(&*db, "backend", &[]).await?;
        seed_team(&*db, "frontend", &[]).await?;

        let mut tx = db.begin().await?;
        let created = tx
            .users_upsert(User::new("u1", "backend").with_username("Alice"))
            .await?;
        tx.commit().await?;

        assert_eq!(created.username, "Alice");
        assert!(created.is_active);
        assert_eq!(db.users_get_expect("u1").await?, created);

        let mut tx = db.begin().await?;
        let updated = tx
            .users_upsert(
                User::new("u1", "frontend")
                    .with_username("Alice B.")
                    .with_active(false),
            )
            .await?;
        tx.commit().await?;

        assert_eq!(updated.team_name, "frontend");
        assert_eq!(updated.username, "Alice B.");
        assert!(!updated.is_active);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn upsert_unknown_team() {
    db_test_case("user_upsert_unknown_team", |db| async move {
        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.users_upsert(User::new("u1", "ghosts")).await,
            Err(DatabaseError::UnknownTeam(name)) if name == "ghosts"
        ));
        tx.rollback().await?;

        assert_eq!(db.users_get("u1").await?, None);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn set_active() {
    db_test_case("user_set_active", |db| async move {
        seed_team(&*db, "backend", &[("u1", true)]).await?;

        let mut tx = db.begin().await?;
        let user = tx.users_set_active("u1", false).await?;
        assert!(!user.is_active);
        tx.commit().await?;

        assert!(!db.users_get_expect("u1").await?.is_active);

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.users_set_active("nobody", true).await,
            Err(DatabaseError::UnknownUser(id)) if id == "nobody"
        ));
        tx.rollback().await?;

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn active_teammates() {
    db_test_case("user_active_teammates", |db| async move {
        seed_team(
            &*db,
            "backend",
            &[("u3", true), ("u1", true), ("u2", false), ("u4", true)],
        )
        .await?;
        seed_team(&*db, "frontend", &[("f1", true)]).await?;

        let mut tx = db.begin().await?;
        assert_eq!(
            tx.users_list_active_teammates("backend", &[]).await?,
            vec!["u1".to_string(), "u3".to_string(), "u4".to_string()]
        );
        assert_eq!(
            tx.users_list_active_teammates("backend", &["u1".into(), "u4".into()])
                .await?,
            vec!["u3".to_string()]
        );
        assert_eq!(
            tx.users_list_active_teammates("nobody", &[]).await?,
            Vec::<String>::new()
        );

        // Staged changes are visible to their own transaction.
        tx.users_set_active("u2", true).await?;
        assert_eq!(
            tx.users_list_active_teammates("backend", &["u1".into()])
                .await?,
            vec!["u2".to_string(), "u3".to_string(), "u4".to_string()]
        );
        tx.rollback().await?;

        let all: Vec<_> = db.users_all().await?.into_iter().map(|u| u.id).collect();
        assert_eq!(all, vec!["f1", "u1", "u2", "u3", "u4"]);

        Ok(())
    })
    .await;
}
