use pretty_assertions::assert_eq;
use revbot_database_interface::DatabaseError;
use revbot_models::{current_timestamp, Team};

use crate::{fixtures::seed_team, testcase::db_test_case};

#[tokio::test]
async fn create() {
    db_test_case("team_create", |db| async move {
        assert_eq!(db.teams_get("backend").await?, None);

        let mut tx = db.begin().await?;
        let team = tx
            .teams_create(Team {
                description: "Backend folks".into(),
                created_at: current_timestamp(),
                ..Team::new("backend")
            })
            .await?;
        tx.commit().await?;

        assert_eq!(db.teams_get_expect("backend").await?, team);

        let mut tx = db.begin().await?;
        assert!(matches!(
            tx.teams_create(Team::new("backend")).await,
            Err(DatabaseError::TeamAlreadyExists(name)) if name == "backend"
        ));
        tx.rollback().await?;

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn get_unknown() {
    db_test_case("team_get_unknown", |db| async move {
        assert!(matches!(
            db.teams_get_expect("nope").await,
            Err(DatabaseError::UnknownTeam(_))
        ));

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn all_and_members() {
    db_test_case("team_all_and_members", |db| async move {
        seed_team(&*db, "frontend", &[("zoe", true), ("adam", false)]).await?;
        seed_team(&*db, "backend", &[("bob", true)]).await?;

        let names: Vec<_> = db.teams_all().await?.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["backend".to_string(), "frontend".to_string()]);

        let members: Vec<_> = db
            .team_members_list("frontend")
            .await?
            .into_iter()
            .map(|u| (u.id, u.is_active))
            .collect();
        assert_eq!(
            members,
            vec![("adam".to_string(), false), ("zoe".to_string(), true)]
        );

        assert!(db.team_members_list("unknown").await?.is_empty());

        Ok(())
    })
    .await;
}
