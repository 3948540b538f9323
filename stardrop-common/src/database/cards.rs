use crate::facet::FacetFilterSet;
use crate::structs::{CardEntry, Rarity};
use crate::{Error, Result};
use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::{Collection, Database};
use std::sync::OnceLock;
use tracing::trace;

static CARDS: OnceLock<Collection<CardEntry>> = OnceLock::new();

///
/// Initialize the "cards" collection in MongoDB
///
/// This method is called automatically when you initialize the
/// database module.
///
pub fn init(database: &Database) {
    CARDS.get_or_init(|| database.collection::<CardEntry>("cards"));
}

fn collection() -> Result<&'static Collection<CardEntry>> {
    CARDS.get().ok_or(Error::NotInitialized("cards collection"))
}

pub async fn get_random_cards(
    rarity: Rarity,
    filters: &FacetFilterSet,
    count: usize,
) -> Result<Vec<CardEntry>> {
    let query = filters.catalog_query(rarity);
    trace!("Sampling {} cards matching {}", count, query);
    let pipeline = vec![
        doc! { "$match": query },
        doc! { "$sample": { "size": count as i64 } },
    ];
    let mut cursor = collection()?.aggregate(pipeline, None).await?;
    let mut cards: Vec<CardEntry> = Vec::with_capacity(count);
    while let Some(document) = cursor.try_next().await? {
        cards.push(bson::from_document(document)?);
    }
    Ok(cards)
}
