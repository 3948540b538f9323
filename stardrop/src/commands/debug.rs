use crate::{config, helper, QUERY_STATES, STORE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serenity::framework::standard::macros::command;
use serenity::framework::standard::CommandResult;
use serenity::model::channel::Message;
use serenity::prelude::*;
use stardrop_common::draw::{DrawEngine, DrawRequest};
use stardrop_common::facet::FacetFilterSet;
use stardrop_common::structs::Rarity;

pub async fn dbg_rates(ctx: &Context, msg: &Message) -> CommandResult {
    let mut reply_str = String::new();
    for (name, pool) in &config().pools {
        let rates: Vec<String> = Rarity::ALL
            .iter()
            .map(|rarity| format!("{} {:.1}%", rarity, pool.rate(*rarity) * 100.0))
            .collect();
        reply_str.push_str(&format!(
            "`{}` • {} • guarantee {}{}\n",
            name,
            rates.join(" / "),
            pool.min_guaranteed_tier,
            if pool.strict_guarantee { " (strict)" } else { "" }
        ));
    }
    helper::info_message(ctx, msg, reply_str, Some("Pools".to_string())).await;
    Ok(())
}

///
/// Resolve a draw without saving it and show which batches were requested.
///
pub async fn dbg_dryrun(ctx: &Context, msg: &Message, args: &[String]) -> CommandResult {
    let count = match args.first().map(|arg| arg.parse::<usize>()) {
        Some(Ok(count)) if count > 0 => count,
        _ => {
            helper::error_message(
                ctx,
                msg,
                "Usage: `debug dryrun <count> [filters...]`".to_string(),
                None,
            )
            .await;
            return Ok(());
        }
    };
    let resolver = super::resolver().await?;
    let filters: FacetFilterSet = args[1..]
        .iter()
        .flat_map(|token| resolver.resolve(token))
        .collect();
    let config = config();
    let request = DrawRequest {
        pool: config.play.pool.clone(),
        count,
        guarantee_upgrade: false,
        filters,
    };
    let engine = DrawEngine::new(&STORE, &config.pools);
    let mut rng = StdRng::from_entropy();
    let outcome = engine.draw(&request, &mut rng).await?;
    let mut reply_str = format!("Filters: {}\n", request.filters.describe());
    for batch in &outcome.batches {
        reply_str.push_str(&format!(
            "{} • requested `{}` • returned `{}`\n",
            batch.rarity, batch.requested, batch.returned
        ));
    }
    reply_str.push_str(&format!(
        "Result: `{}` cards{}",
        outcome.cards.len(),
        if outcome.is_failure() { " (failed)" } else { "" }
    ));
    helper::info_message(ctx, msg, reply_str, Some("Dry run".to_string())).await;
    Ok(())
}

pub async fn dbg_state(ctx: &Context, msg: &Message) -> CommandResult {
    let tracked = QUERY_STATES.len().await;
    let state = QUERY_STATES.get(msg.author.id.get()).await;
    let reply_str = {
        let state = state.lock().await;
        format!(
            "Page: `{}`\nSort: `{:?}`\nFilters: {}\nTracked users: `{}`",
            state.page + 1,
            state.sort,
            state.filters.describe(),
            tracked
        )
    };
    helper::info_message(ctx, msg, reply_str, Some("Album query".to_string())).await;
    Ok(())
}

#[command]
pub async fn debug(ctx: &Context, msg: &Message) -> CommandResult {
    if !config().debug.allowed_users.contains(&msg.author.id.get()) {
        return Ok(());
    }
    let args = helper::command_tokens(&msg.content);
    let subcommand = match args.first() {
        Some(content) => content.as_str(),
        None => {
            helper::error_message(
                ctx,
                msg,
                "Usage: `debug <subcommand> [args...]`".to_string(),
                None,
            )
            .await;
            return Ok(());
        }
    };
    match subcommand {
        "rates" => dbg_rates(ctx, msg).await?,
        "dryrun" => dbg_dryrun(ctx, msg, &args[1..]).await?,
        "state" => dbg_state(ctx, msg).await?,
        _ => {
            helper::error_message(
                ctx,
                msg,
                format!("Unknown subcommand: `{}`", subcommand),
                None,
            )
            .await;
        }
    }
    Ok(())
}
