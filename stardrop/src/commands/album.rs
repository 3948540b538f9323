use crate::{helper, template, QUERY_STATES, STORE};
use serenity::framework::standard::macros::command;
use serenity::framework::standard::CommandResult;
use serenity::model::channel::Message;
use serenity::prelude::*;
use stardrop_common::collection;
use stardrop_common::query::UserQueryState;
use stardrop_common::store::CollectionStore;
use stardrop_common::debug;

///
/// View your album.
///
/// Filters and sort are remembered between calls; `all` clears the filters.
/// Page (1, 2, ...), sort (id, name, rarity, newest, attribute, year, band,
/// date, instrument), band, member name, attribute, year, rarity (1star..4star).
///
#[command]
#[aliases("a")]
pub async fn album(ctx: &Context, msg: &Message) -> CommandResult {
    let user_id = msg.author.id.get();
    let tokens = helper::command_tokens(&msg.content);
    let resolver = super::resolver().await?;
    let cards = STORE.get_user_collection(user_id).await?;

    let state = QUERY_STATES.get(user_id).await;
    let mut state = state.lock().await;
    state.apply_tokens(&resolver, &tokens);
    let page = collection::render(cards, &mut state);
    if page.is_empty() {
        debug!("No matching cards for {}, resetting album query", user_id);
        *state = UserQueryState::new();
        drop(state);
        helper::error_message(ctx, msg, "No matching cards found.".to_string(), None).await;
        return Ok(());
    }
    let title = format!("{}'s album", msg.author.name);
    let embed = template::card::album_embed(ctx, title, &page, &state.filters);
    drop(state);
    helper::embed_message(ctx, msg, embed).await;
    Ok(())
}

fn parse_view_tokens(tokens: &[String]) -> (Option<u32>, bool) {
    let mut card_id = None;
    let mut trained = false;
    for token in tokens {
        if let Ok(id) = token.parse::<u32>() {
            card_id = Some(id);
        }
        if token.eq_ignore_ascii_case("trained") || token.eq_ignore_ascii_case("t") {
            trained = true;
        }
    }
    (card_id, trained)
}

///
/// View a card from your album, e.g. `view 1200` or `view 1200 trained`.
///
#[command]
#[aliases("v")]
pub async fn view(ctx: &Context, msg: &Message) -> CommandResult {
    let tokens = helper::command_tokens(&msg.content);
    let (card_id, trained) = parse_view_tokens(&tokens);
    let owned = match card_id {
        Some(card_id) => STORE.get_card_by_id(msg.author.id.get(), card_id).await?,
        None => None,
    };
    let url = owned
        .as_ref()
        .and_then(|owned| owned.card.art_url(trained).map(str::to_string));
    match (owned, url) {
        (Some(owned), Some(url)) => {
            let embed = crate::template::message::info_embed(
                ctx,
                Some(format!("{} {}", owned.card.rarity, owned.card.member_name)),
                Some(template::card::owned_line(&owned)),
            )
            .image(url);
            helper::embed_message(ctx, msg, embed).await;
        }
        _ => {
            helper::error_message(
                ctx,
                msg,
                "Could not find card in album.".to_string(),
                None,
            )
            .await;
        }
    }
    Ok(())
}
