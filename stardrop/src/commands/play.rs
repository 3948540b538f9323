use crate::{config, helper, template, STORE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serenity::framework::standard::macros::command;
use serenity::framework::standard::CommandResult;
use serenity::model::channel::Message;
use serenity::prelude::*;
use stardrop_common::draw::{DrawEngine, DrawRequest};
use stardrop_common::facet::FacetFilterSet;
use stardrop_common::store::CollectionStore;
use stardrop_common::{info, trace};

async fn play(ctx: &Context, msg: &Message, count: usize, guarantee_upgrade: bool) -> CommandResult {
    let config = config();
    let tokens = helper::command_tokens(&msg.content);
    let resolver = super::resolver().await?;
    let filters: FacetFilterSet = tokens
        .iter()
        .flat_map(|token| resolver.resolve(token))
        .collect();
    let request = DrawRequest {
        pool: config.play.pool.clone(),
        count,
        guarantee_upgrade,
        filters,
    };
    trace!("Draw request from {}: {:?}", msg.author.id, request);
    let engine = DrawEngine::new(&STORE, &config.pools);
    let mut rng = StdRng::from_entropy();
    let outcome = engine.draw(&request, &mut rng).await?;
    if outcome.is_failure() {
        helper::error_message(
            ctx,
            msg,
            "A transmission error occured. No cards found!".to_string(),
            None,
        )
        .await;
        return Ok(());
    }
    STORE
        .add_cards_to_collection(msg.author.id.get(), &outcome.cards)
        .await?;
    info!(
        "{} drew {} cards ({} distinct)",
        msg.author.id,
        outcome.cards.len(),
        outcome.tally().len()
    );
    let title = format!("{}'s play", msg.author.name);
    let embed = template::card::draw_embed(ctx, title, &outcome.cards);
    helper::embed_message(ctx, msg, embed).await;
    Ok(())
}

///
/// Solo play.
///
/// Accepts the same filter words as `album`: band, member, attribute, year.
///
#[command]
#[aliases("1play")]
pub async fn play1(ctx: &Context, msg: &Message) -> CommandResult {
    play(ctx, msg, config().play.solo_count, false).await
}

///
/// Multi play with a guaranteed 3★ or better.
///
#[command]
#[aliases("10play")]
pub async fn play10(ctx: &Context, msg: &Message) -> CommandResult {
    play(ctx, msg, config().play.multi_count, true).await
}
