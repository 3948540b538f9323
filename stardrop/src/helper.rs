use crate::template::message;
use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::client::Context;
use serenity::model::channel::Message;
use stardrop_common::error;

pub async fn embed_message(ctx: &Context, msg: &Message, embed: CreateEmbed) {
    let reply = CreateMessage::new().embed(embed).reference_message(msg);
    if let Err(why) = msg.channel_id.send_message(ctx, reply).await {
        error!("Failed to send message: {:?}", why);
    }
}

pub async fn error_message(ctx: &Context, msg: &Message, content: String, title: Option<String>) {
    embed_message(ctx, msg, message::error_embed(ctx, title, Some(content))).await;
}

pub async fn info_message(ctx: &Context, msg: &Message, content: String, title: Option<String>) {
    embed_message(ctx, msg, message::info_embed(ctx, title, Some(content))).await;
}

///
/// Tokens after the command name, e.g. `["roselia", "4star"]` for
/// `$album roselia 4star`.
///
pub fn command_tokens(content: &str) -> Vec<String> {
    content
        .split_whitespace()
        .skip(1)
        .map(|token| token.to_string())
        .collect()
}
