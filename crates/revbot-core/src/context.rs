use revbot_config::Config;
use revbot_database_interface::DbService;

use crate::{random::ReviewerPicker, CoreModule};

pub struct CoreContext<'a> {
    pub config: &'a Config,
    pub core_module: &'a CoreModule,
    pub db_service: &'a (dyn DbService + 'a),
    pub reviewer_picker: &'a (dyn ReviewerPicker + 'a),
}

#[cfg(any(test, feature = "testkit"))]
pub(crate) mod tests {
    use std::time::Duration;

    use revbot_config::Config;
    use revbot_database_interface::DbService;
    use revbot_database_memory::MemoryDb;
    use revbot_models::{current_timestamp, Team, User};

    use crate::{
        random::{ReviewerPicker, SeededReviewerPicker},
        CoreContext, CoreModule,
    };

    #[allow(dead_code)]
    pub struct CoreContextTest {
        pub config: Config,
        pub core_module: CoreModule,
        pub db_service: MemoryDb,
        pub reviewer_picker: Box<dyn ReviewerPicker>,
    }

    impl CoreContextTest {
        #[allow(dead_code)]
        pub fn new() -> Self {
            let mut config = Config::from_env_no_version().unwrap();
            config.random_seed = 42;

            Self {
                reviewer_picker: Box::new(SeededReviewerPicker::from_config(&config)),
                config,
                core_module: CoreModule::builder().build(),
                db_service: MemoryDb::with_lock_timeout(Duration::from_millis(200)),
            }
        }

        #[allow(dead_code)]
        pub fn with_picker<P: ReviewerPicker + 'static>(mut self, picker: P) -> Self {
            self.reviewer_picker = Box::new(picker);
            self
        }

        /// Create a team with `(id, is_active)` members.
        #[allow(dead_code)]
        pub async fn seed_team(&self, name: &str, members: &[(&str, bool)]) {
            let mut tx = self.db_service.begin().await.unwrap();
            tx.teams_create(Team {
                created_at: current_timestamp(),
                ..Team::new(name)
            })
            .await
            .unwrap();

            for (id, active) in members {
                tx.users_upsert(User::new(*id, name).with_active(*active))
                    .await
                    .unwrap();
            }

            tx.commit().await.unwrap();
        }

        #[allow(dead_code)]
        pub fn as_context(&self) -> CoreContext {
            CoreContext {
                config: &self.config,
                core_module: &self.core_module,
                db_service: &self.db_service,
                reviewer_picker: &*self.reviewer_picker,
            }
        }
    }
}
