use std::time::Duration;

use futures::Future;
use revbot_config::Config;
use revbot_database_interface::DbService;
use revbot_database_memory::MemoryDb;
use revbot_database_pg::{
    create_db_pool_connection, create_db_url, get_base_url, setup_test_db, teardown_test_db,
    PostgresDb,
};
use tracing::info;

/// Row lock wait used by every test database.
pub const TEST_LOCK_TIMEOUT: Duration = Duration::from_millis(200);

/// Run `block` against every available driver.
///
/// The memory driver always runs. Postgres runs when a database URL is
/// configured, on a fresh database named after the test.
pub async fn db_test_case<F, Fut>(test_name: &str, block: F)
where
    F: Fn(Box<dyn DbService>) -> Fut,
    Fut: Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>>,
{
    let mut config = Config::from_env_no_version().unwrap();
    let full_name = format!("test-revbot-{test_name}");

    {
        // In memory
        let mem_db = Box::new(MemoryDb::with_lock_timeout(TEST_LOCK_TIMEOUT));
        info!("running memory test {full_name} ...");
        block(mem_db).await.unwrap();
    }

    if config.database.pg.url.is_empty() {
        return;
    }

    {
        // Postgres
        let base_url = get_base_url(&config.database.pg.url);
        let new_url = create_db_url(&base_url, &full_name);
        config.database.pg.url.clone_from(&new_url);
        config.database.pg.pool_size = 4;
        config.database.pg.connection_timeout = 5;

        setup_test_db(&base_url, &full_name).await;

        let pool = create_db_pool_connection(&config, &base_url, &full_name).await;
        let pg_db = Box::new(PostgresDb::with_lock_timeout(pool, TEST_LOCK_TIMEOUT));
        info!("running postgres test {full_name} ...");
        block(pg_db).await.unwrap();

        teardown_test_db(&base_url, &full_name).await;
    }
}
