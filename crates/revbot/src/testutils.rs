use std::{io::Write, sync::Arc};

use clap::Parser;
use revbot_config::Config;
use revbot_core::{
    random::{ReviewerPicker, SeededReviewerPicker},
    CoreModule,
};
use revbot_database_interface::DbService;
use revbot_database_memory::MemoryDb;
use revbot_models::{current_timestamp, Team, User};
use tokio::sync::RwLock;

use crate::{
    args::{Args, CommandExecutor},
    commands::CommandContext,
};

pub(crate) struct CommandContextTest {
    pub config: Config,
    pub core_module: CoreModule,
    pub db_service: MemoryDb,
    pub reviewer_picker: Box<dyn ReviewerPicker>,
}

impl CommandContextTest {
    pub fn new() -> Self {
        let mut config = Config::from_env_no_version().unwrap();
        config.random_seed = 42;
        config.reviewers.max_count = 2;
        config.reviewers.min_count = 0;

        Self {
            reviewer_picker: Box::new(SeededReviewerPicker::from_config(&config)),
            config,
            core_module: CoreModule::builder().build(),
            db_service: MemoryDb::new(),
        }
    }

    /// Create a team with `(id, is_active)` members.
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

    pub fn into_context(self, writer: Arc<RwLock<dyn Write + Send + Sync>>) -> CommandContext {
        CommandContext {
            config: self.config,
            core_module: self.core_module,
            db_service: Box::new(self.db_service),
            reviewer_picker: self.reviewer_picker,
            writer,
        }
    }
}

async fn run_command(ctx: CommandContextTest, command_args: &[&str]) -> (anyhow::Result<()>, String) {
    let buf = Arc::new(RwLock::new(Vec::new()));

    let result = {
        let command_args = {
            let mut tmp_args = vec!["bot"];
            tmp_args.extend(command_args);
            tmp_args
        };

        match Args::try_parse_from(command_args) {
            Ok(args) => CommandExecutor::parse_args_async(args, ctx.into_context(buf.clone())).await,
            Err(e) => {
                eprintln!("{}", e);
                panic!("Parse error.")
            }
        }
    };

    let vec = buf.read().await.to_vec();
    (result, std::str::from_utf8(&vec).unwrap().to_string())
}

pub(crate) async fn test_command(ctx: CommandContextTest, command_args: &[&str]) -> String {
    let (result, output) = run_command(ctx, command_args).await;
    result.unwrap();
    output
}

/// Run a command expected to fail, returning its error message.
pub(crate) async fn test_command_error(ctx: CommandContextTest, command_args: &[&str]) -> String {
    let (result, _) = run_command(ctx, command_args).await;
    result.unwrap_err().to_string()
}
