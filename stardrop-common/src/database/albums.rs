use crate::store::tally;
use crate::structs::{CardEntry, OwnedCard};
use crate::{Error, Result};
use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::options::UpdateOptions;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

///
/// One owned card of one user. BSON has no unsigned 64-bit integer, so the
/// Discord user id is stored as its two's complement `i64`.
///
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AlbumRecord {
    pub user_id: i64,
    pub card_id: i64,
    pub card: CardEntry,
    pub count: u32,
    pub acquired_at: i64,
}

impl From<AlbumRecord> for OwnedCard {
    fn from(record: AlbumRecord) -> OwnedCard {
        OwnedCard {
            card: record.card,
            count: record.count,
            acquired_at: record.acquired_at,
        }
    }
}

static ALBUMS: OnceLock<Collection<AlbumRecord>> = OnceLock::new();

pub fn init(database: &Database) {
    ALBUMS.get_or_init(|| database.collection::<AlbumRecord>("albums"));
}

fn collection() -> Result<&'static Collection<AlbumRecord>> {
    ALBUMS.get().ok_or(Error::NotInitialized("albums collection"))
}

fn stored_user_id(user_id: u64) -> i64 {
    user_id as i64
}

pub async fn get_user_album(user_id: u64) -> Result<Vec<OwnedCard>> {
    let cursor = collection()?
        .find(doc! { "user_id": stored_user_id(user_id) }, None)
        .await?;
    let records: Vec<AlbumRecord> = cursor.try_collect().await?;
    Ok(records.into_iter().map(OwnedCard::from).collect())
}

///
/// Add drawn cards to a user's album. Repeat cards only bump the count;
/// the acquisition time is set when a card is first added.
///
pub async fn add_to_user_album(user_id: u64, cards: &[CardEntry]) -> Result<()> {
    let albums = collection()?;
    let now = chrono::Utc::now().timestamp();
    let upsert = UpdateOptions::builder().upsert(true).build();
    for (card, copies) in tally(cards) {
        debug!("Adding {} copies of card {} for {}", copies, card.id, user_id);
        albums
            .update_one(
                doc! { "user_id": stored_user_id(user_id), "card_id": card.id as i64 },
                doc! {
                    "$inc": { "count": copies as i64 },
                    "$setOnInsert": { "card": bson::to_bson(card)?, "acquired_at": now },
                },
                upsert.clone(),
            )
            .await?;
    }
    Ok(())
}

pub async fn get_card_from_album(user_id: u64, card_id: u32) -> Result<Option<OwnedCard>> {
    let record = collection()?
        .find_one(
            doc! { "user_id": stored_user_id(user_id), "card_id": card_id as i64 },
            None,
        )
        .await?;
    Ok(record.map(OwnedCard::from))
}

pub async fn get_user_count() -> Result<u64> {
    let users = collection()?.distinct("user_id", None, None).await?;
    Ok(users.len() as u64)
}
