use serenity::builder::CreateEmbed;
use serenity::client::Context;
use stardrop_common::collection::AlbumPage;
use stardrop_common::facet::FacetFilterSet;
use stardrop_common::stats::AlbumStats;
use stardrop_common::structs::{CardEntry, OwnedCard};

pub fn card_line(card: &CardEntry) -> String {
    format!(
        "`#{:<5}` {} **{}** · {} · {} · {}",
        card.id, card.rarity, card.member_name, card.band, card.attribute, card.instrument
    )
}

pub fn owned_line(owned: &OwnedCard) -> String {
    format!("{} · ×{}", card_line(&owned.card), owned.count)
}

///
/// Lay lines out `per_row` to a row, separated by blank lines, the way
/// draws show two rows of five.
///
pub fn rows(lines: &[String], per_row: usize) -> String {
    lines
        .chunks(per_row.max(1))
        .map(|row| row.join("\n"))
        .collect::<Vec<String>>()
        .join("\n\n")
}

pub fn draw_embed(ctx: &Context, title: String, cards: &[CardEntry]) -> CreateEmbed {
    let lines: Vec<String> = cards.iter().map(card_line).collect();
    let per_row = if cards.len() > 1 { cards.len().div_ceil(2) } else { 1 };
    let mut embed = super::message::info_embed(ctx, Some(title), Some(rows(&lines, per_row)));
    let best = cards.iter().max_by_key(|card| (card.rarity, std::cmp::Reverse(card.id)));
    if let Some(url) = best.and_then(|card| card.art_url(false)) {
        embed = embed.image(url);
    }
    embed
}

pub fn album_embed(
    ctx: &Context,
    title: String,
    page: &AlbumPage,
    filters: &FacetFilterSet,
) -> CreateEmbed {
    let lines: Vec<String> = page.cards.iter().map(owned_line).collect();
    let description = format!(
        "{}\n\nPage {} of {} · {} cards · filters: {}",
        rows(&lines, 4),
        page.page + 1,
        page.page_count(),
        page.total_matched,
        filters.describe()
    );
    super::message::info_embed(ctx, Some(title), Some(description))
}

pub fn stats_lines(stats: &AlbumStats) -> String {
    let mut lines = vec![
        format!("Unique cards collected: {}", stats.distinct),
        format!("Total cards: {}", stats.total),
    ];
    for (rarity, count) in &stats.by_rarity {
        lines.push(format!("{} cards: {}", rarity, count));
    }
    for (attribute, count) in &stats.by_attribute {
        lines.push(format!("{} cards: {}", attribute, count));
    }
    lines.join("\n")
}
