use crate::facet::FacetFilterSet;
use crate::query::{SortKey, UserQueryState};
use crate::structs::OwnedCard;
use std::cmp::Ordering;
use tracing::trace;

pub const PAGE_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumPage {
    pub cards: Vec<OwnedCard>,
    /// Zero-based page actually shown after clamping.
    pub page: usize,
    /// Matches before pagination.
    pub total_matched: usize,
}

impl AlbumPage {
    pub fn page_count(&self) -> usize {
        self.total_matched.div_ceil(PAGE_SIZE)
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn apply_filter(collection: Vec<OwnedCard>, filters: &FacetFilterSet) -> Vec<OwnedCard> {
    collection
        .into_iter()
        .filter(|owned| filters.matches(&owned.card))
        .collect()
}

fn compare_by(key: SortKey, a: &OwnedCard, b: &OwnedCard) -> Ordering {
    match key {
        SortKey::Id => a.card.id.cmp(&b.card.id),
        SortKey::Name => a.card.member_name.cmp(&b.card.member_name),
        SortKey::Attribute => a.card.attribute.as_str().cmp(b.card.attribute.as_str()),
        SortKey::Rarity => a.card.rarity.cmp(&b.card.rarity),
        SortKey::SchoolYear => a.card.school_year.as_str().cmp(b.card.school_year.as_str()),
        SortKey::Date => a.card.release_date.cmp(&b.card.release_date),
        SortKey::Band => a.card.band.as_str().cmp(b.card.band.as_str()),
        SortKey::Newest => a.acquired_at.cmp(&b.acquired_at),
        SortKey::Instrument => a.card.instrument.as_str().cmp(b.card.instrument.as_str()),
    }
}

///
/// Sort by the given key, breaking ties by ascending card id. Without a key
/// the album is shown in id order.
///
pub fn apply_sort(collection: &mut [OwnedCard], sort: Option<SortKey>) {
    let key = sort.unwrap_or(SortKey::Id);
    collection.sort_by(|a, b| {
        let primary = compare_by(key, a, b);
        let primary = if key.is_descending() {
            primary.reverse()
        } else {
            primary
        };
        primary.then_with(|| a.card.id.cmp(&b.card.id))
    });
}

///
/// Clamp `state.page` to the pages `total` entries fill, store the clamped
/// value back and return it.
///
pub fn clamp_page(state: &mut UserQueryState, total: usize) -> usize {
    let max_page = total.div_ceil(PAGE_SIZE).saturating_sub(1) as i64;
    let page = state.page.clamp(0, max_page);
    state.page = page;
    page as usize
}

pub fn render(collection: Vec<OwnedCard>, state: &mut UserQueryState) -> AlbumPage {
    let mut matched = apply_filter(collection, &state.filters);
    apply_sort(&mut matched, state.sort);
    let total_matched = matched.len();
    let page = clamp_page(state, total_matched);
    let cards: Vec<OwnedCard> = matched
        .into_iter()
        .skip(page * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();
    trace!(
        "Rendered page {} with {} of {} matching cards",
        page,
        cards.len(),
        total_matched
    );
    AlbumPage {
        cards,
        page,
        total_matched,
    }
}
