use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use serenity::client::Context;
use serenity::model::Color;

pub fn crate_embed(
    client: &Context,
    title: Option<String>,
    description: Option<String>,
    color: Color,
) -> CreateEmbed {
    let user = client.cache.current_user().clone();
    CreateEmbed::new()
        .title(title.unwrap_or("Stardrop".to_string()))
        .description(description.unwrap_or("".to_string()))
        .color(color)
        .footer(
            CreateEmbedFooter::new(user.name.clone())
                .icon_url(user.avatar_url().unwrap_or("".to_string())),
        )
}

pub fn error_embed(
    client: &Context,
    mut title: Option<String>,
    description: Option<String>,
) -> CreateEmbed {
    if title.is_none() {
        title = Some("Error".to_string());
    }
    crate_embed(client, title, description, Color::RED)
}

pub fn info_embed(
    client: &Context,
    mut title: Option<String>,
    description: Option<String>,
) -> CreateEmbed {
    if title.is_none() {
        title = Some("Info".to_string());
    }
    crate_embed(client, title, description, crate::colour())
}
