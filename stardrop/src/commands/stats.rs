use crate::{helper, template, STORE};
use serenity::framework::standard::macros::command;
use serenity::framework::standard::CommandResult;
use serenity::model::channel::Message;
use serenity::prelude::*;
use stardrop_common::stats::AlbumStats;
use stardrop_common::store::CollectionStore;

///
/// Provides stats about you.
///
#[command]
#[aliases("stats")]
pub async fn mystats(ctx: &Context, msg: &Message) -> CommandResult {
    let album = STORE.get_user_collection(msg.author.id.get()).await?;
    let stats = AlbumStats::from_collection(&album);
    helper::info_message(
        ctx,
        msg,
        template::card::stats_lines(&stats),
        Some(format!("Stats for {}", msg.author.name)),
    )
    .await;
    Ok(())
}

///
/// Provides stats about the bot.
///
#[command]
pub async fn botstats(ctx: &Context, msg: &Message) -> CommandResult {
    let users = STORE.user_count().await?;
    let content = format!("Servers: {}\nUsers: {}", ctx.cache.guild_count(), users);
    helper::info_message(ctx, msg, content, Some("My stats".to_string())).await;
    Ok(())
}
