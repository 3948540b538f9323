pub mod albums;
pub mod cards;
pub mod members;

use crate::facet::FacetFilterSet;
use crate::store::{CardSource, CollectionStore, MemberRoster};
use crate::structs::{CardEntry, OwnedCard, Rarity};
use crate::{Error, Result};
use async_trait::async_trait;
use mongodb::options::{ClientOptions, Credential};
use mongodb::Client;
use std::env;
use std::sync::OnceLock;
use tracing::{info, warn};

static MONGO_CLIENT: OnceLock<Client> = OnceLock::new();

///
/// Connect to MongoDB and register the `cards`, `members` and `albums`
/// collections.
///
/// The connection string comes from `MONGODB_URL`. When `MONGODB_USERNAME`
/// is set, `MONGODB_PASSWORD` must be set too.
///
pub async fn init(database_name: &str) -> Result<()> {
    let url = env::var("MONGODB_URL").map_err(|_| Error::MissingEnv("MONGODB_URL"))?;
    let mut options = ClientOptions::parse(url).await?;
    match env::var("MONGODB_USERNAME") {
        Ok(username) => {
            let password =
                env::var("MONGODB_PASSWORD").map_err(|_| Error::MissingEnv("MONGODB_PASSWORD"))?;
            options.credential = Some(
                Credential::builder()
                    .username(username)
                    .password(password)
                    .build(),
            );
        }
        Err(_) => {
            info!("No MongoDB username provided, using authentication provided in the url");
        }
    }
    let client = Client::with_options(options)?;
    let database = client.database(database_name);
    if MONGO_CLIENT.set(client).is_err() {
        warn!("Database is already initialized");
        return Ok(());
    }
    cards::init(&database);
    members::init(&database);
    albums::init(&database);
    Ok(())
}

///
/// The MongoDB collections behind the store traits. Requires [`init`].
///
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoStore;

#[async_trait]
impl CardSource for MongoStore {
    async fn random_cards(
        &self,
        rarity: Rarity,
        filters: &FacetFilterSet,
        count: usize,
    ) -> Result<Vec<CardEntry>> {
        cards::get_random_cards(rarity, filters, count).await
    }
}

#[async_trait]
impl CollectionStore for MongoStore {
    async fn get_user_collection(&self, user_id: u64) -> Result<Vec<OwnedCard>> {
        albums::get_user_album(user_id).await
    }

    async fn add_cards_to_collection(&self, user_id: u64, cards: &[CardEntry]) -> Result<()> {
        albums::add_to_user_album(user_id, cards).await
    }

    async fn get_card_by_id(&self, user_id: u64, card_id: u32) -> Result<Option<OwnedCard>> {
        albums::get_card_from_album(user_id, card_id).await
    }

    async fn user_count(&self) -> Result<u64> {
        albums::get_user_count().await
    }
}

#[async_trait]
impl MemberRoster for MongoStore {
    async fn list_known_full_names(&self) -> Result<Vec<String>> {
        members::list_full_names().await
    }
}
