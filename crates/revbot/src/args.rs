use std::{sync::Arc, time::Duration};

use clap::Parser;
use revbot_config::{Config, DatabaseDriver};
use revbot_core::{random::SeededReviewerPicker, CoreModule};
use revbot_database_interface::DbService;
use revbot_database_memory::MemoryDb;
use revbot_database_pg::{establish_pool_connection, run_migrations, PostgresDb};
use revbot_sentry::with_sentry_configuration;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    commands::{Command, CommandContext, SubCommand},
    Result,
};

#[derive(Parser)]
#[command(about = None, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    cmd: SubCommand,
}

pub struct CommandExecutor;

impl CommandExecutor {
    pub fn parse_args(config: Config, args: Args) -> Result<()> {
        let sync = |config: Config, args: Args| async move {
            let lock_timeout = Duration::from_millis(config.database.lock_timeout_ms);
            let db_service: Box<dyn DbService> = {
                if config.database.driver == DatabaseDriver::Postgres {
                    info!("Using PostgresDb database driver");

                    let pool = establish_pool_connection(&config).await?;
                    run_migrations(&pool).await?;

                    Box::new(PostgresDb::with_lock_timeout(pool, lock_timeout))
                } else {
                    info!("Using MemoryDb database driver");
                    Box::new(MemoryDb::with_lock_timeout(lock_timeout))
                }
            };

            let ctx = CommandContext {
                config: config.clone(),
                core_module: CoreModule::builder().build(),
                db_service,
                reviewer_picker: Box::new(SeededReviewerPicker::from_config(&config)),
                writer: Arc::new(RwLock::new(std::io::stdout())),
            };

            with_sentry_configuration(&config, move || async move {
                Self::parse_args_async(args, ctx).await
            })
            .await
        };

        actix_rt::System::with_tokio_rt(|| {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("could not build the tokio runtime")
        })
        .block_on(sync(config, args))?;

        Ok(())
    }

    pub(crate) async fn parse_args_async(args: Args, ctx: CommandContext) -> Result<()> {
        args.cmd.execute(ctx).await
    }
}
