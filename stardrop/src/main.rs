use dotenvy::dotenv;
use serenity::async_trait;
use serenity::framework::standard::macros::{command, group, hook};
use serenity::framework::standard::{CommandResult, Configuration, StandardFramework};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::Color;
use serenity::prelude::*;
use stardrop_common::database::{self, MongoStore};
use stardrop_common::query::QueryStateStore;
use stardrop_common::*;
use std::env;
use std::path::Path;
use std::sync::{LazyLock, OnceLock};

use crate::commands::album::*;
use crate::commands::debug::*;
use crate::commands::play::*;
use crate::commands::stats::*;
use crate::config::Config;

mod commands;
mod config;
mod helper;
mod template;

const CONFIG_PATH: &str = "./config.toml";
static CONFIG: OnceLock<Config> = OnceLock::new();
pub static QUERY_STATES: LazyLock<QueryStateStore> = LazyLock::new(QueryStateStore::new);
pub static STORE: MongoStore = MongoStore;

pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::new)
}

pub fn colour() -> Color {
    Color::new(config().bot.colour)
}

#[group]
#[commands(ping, info, play1, play10, album, view, mystats, botstats, debug)]
struct General;

struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _: Context, ready: Ready) {
        info!("Connected as {}", ready.user.name);
    }
}

#[hook]
async fn after(ctx: &Context, msg: &Message, command_name: &str, command_result: CommandResult) {
    if let Err(why) = command_result {
        error!("Command {} failed: {:?}", command_name, why);
        helper::error_message(
            ctx,
            msg,
            format!("Failed to run `{}`: `{}`", command_name, why),
            None,
        )
        .await;
    }
}

#[tokio::main]
async fn main() {
    match dotenv() {
        Ok(_) => {}
        Err(why) => {
            eprintln!("Failed to load .env: {:?}", why);
        }
    }
    let token = env::var("DISCORD_TOKEN").expect("Token not found");
    let config: Config;
    if Path::new(CONFIG_PATH).exists() {
        config = Config::load(CONFIG_PATH).expect("Failed to load config");
    } else {
        config = Config::new();
        if let Err(why) = config.save(CONFIG_PATH) {
            eprintln!("{}", why);
        }
    }
    config.validate().expect("Invalid config");
    let level_str = config.log.level.clone();
    let log_level = env::var("LOG_LEVEL").unwrap_or(level_str);
    setup_logger(&log_level).expect("Failed to setup logger");
    info!(
        "Stardrop v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );
    info!("Log level: {}", log_level);
    info!("Initializing database...");
    database::init(&config.mongo.database)
        .await
        .expect("Failed to initialize database");
    let prefix = config.bot.prefix.clone();
    CONFIG
        .set(config)
        .expect("Failed to register config to static");

    info!("Initializing Discord client...");
    let framework = StandardFramework::new().after(after).group(&GENERAL_GROUP);
    framework.configure(Configuration::new().prefix(prefix));

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(token, intents)
        .event_handler(Handler)
        .framework(framework)
        .await
        .expect("Error creating client");

    info!("Starting client...");
    if let Err(why) = client.start().await {
        error!("An error occurred while running the client: {:?}", why);
    }
}

#[command]
async fn ping(ctx: &Context, msg: &Message) -> CommandResult {
    msg.reply(ctx, "Pong!").await?;
    Ok(())
}

#[command]
async fn info(ctx: &Context, msg: &Message) -> CommandResult {
    let config = config();
    let reply_str = format!(
        "Stardrop v{}\n\
        Log level: `{}`\n\
        Build type: `{}`\n\
        Commit: `{}`\n\
        Play pool: `{}`\n",
        env!("CARGO_PKG_VERSION"),
        config.log.level.as_str(),
        env!("BUILD_PROFILE"),
        env!("GIT_HASH"),
        config.play.pool,
    );
    helper::info_message(ctx, msg, reply_str, Some("Information".to_string())).await;
    Ok(())
}
