use revbot_database_interface::{DbService, Result};
use revbot_models::{current_timestamp, AssignmentSlot, PullRequest, Team, User};

/// Create a team with `(id, is_active)` members.
pub async fn seed_team(db: &dyn DbService, name: &str, members: &[(&str, bool)]) -> Result<()> {
    let mut tx = db.begin().await?;
    tx.teams_create(Team {
        created_at: current_timestamp(),
        ..Team::new(name)
    })
    .await?;

    for (id, active) in members {
        tx.users_upsert(User::new(*id, name).with_active(*active))
            .await?;
    }

    tx.commit().await
}

/// Create an open pull request with `reviewers` seated in order.
pub async fn seed_pull_request(
    db: &dyn DbService,
    id: &str,
    author: &str,
    reviewers: &[&str],
) -> Result<PullRequest> {
    let now = current_timestamp();
    let mut tx = db.begin().await?;
    tx.pull_requests_create(PullRequest {
        created_at: now,
        ..PullRequest::new(id, format!("Title {id}"), author)
    })
    .await?;

    for (idx, reviewer) in reviewers.iter().enumerate() {
        tx.assignment_slots_create(AssignmentSlot::new(id, idx as u32 + 1, *reviewer, now))
            .await?;
    }

    tx.commit().await?;
    db.pull_requests_get_expect(id).await
}
