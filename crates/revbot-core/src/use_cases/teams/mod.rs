pub(crate) mod add_team;
pub(crate) mod get_team;

use revbot_models::{Team, User};

pub use add_team::AddTeamInterface;
pub use get_team::GetTeamInterface;

/// A team along with its members, sorted by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamWithMembers {
    pub team: Team,
    pub members: Vec<User>,
}

#[cfg(any(test, feature = "testkit"))]
pub use self::{add_team::MockAddTeamInterface, get_team::MockGetTeamInterface};
