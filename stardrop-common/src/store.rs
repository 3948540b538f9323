use crate::facet::FacetFilterSet;
use crate::structs::{CardEntry, OwnedCard, Rarity};
use crate::Result;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Random sampling from the card catalog.
#[async_trait]
pub trait CardSource: Send + Sync {
    ///
    /// Return up to `count` distinct random cards of `rarity` matching
    /// `filters`. The rarity facet of `filters` is ignored.
    ///
    async fn random_cards(
        &self,
        rarity: Rarity,
        filters: &FacetFilterSet,
        count: usize,
    ) -> Result<Vec<CardEntry>>;
}

/// Per-user card albums.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn get_user_collection(&self, user_id: u64) -> Result<Vec<OwnedCard>>;
    async fn add_cards_to_collection(&self, user_id: u64, cards: &[CardEntry]) -> Result<()>;
    async fn get_card_by_id(&self, user_id: u64, card_id: u32) -> Result<Option<OwnedCard>>;
    async fn user_count(&self) -> Result<u64>;
}

#[async_trait]
pub trait MemberRoster: Send + Sync {
    async fn list_known_full_names(&self) -> Result<Vec<String>>;
}

///
/// Group drawn cards by id, keeping first-seen order, so each distinct card
/// is stored once with the number of copies the user receives.
///
pub fn tally(cards: &[CardEntry]) -> Vec<(&CardEntry, u32)> {
    let mut order: Vec<(&CardEntry, u32)> = Vec::new();
    let mut positions: HashMap<u32, usize> = HashMap::new();
    for card in cards {
        match positions.get(&card.id) {
            Some(&position) => order[position].1 += 1,
            None => {
                positions.insert(card.id, order.len());
                order.push((card, 1));
            }
        }
    }
    order
}

/// Catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    cards: Vec<CardEntry>,
}

impl MemoryCatalog {
    pub fn new(cards: Vec<CardEntry>) -> MemoryCatalog {
        MemoryCatalog { cards }
    }
}

#[async_trait]
impl CardSource for MemoryCatalog {
    async fn random_cards(
        &self,
        rarity: Rarity,
        filters: &FacetFilterSet,
        count: usize,
    ) -> Result<Vec<CardEntry>> {
        let mut filters = filters.clone();
        filters.rarities.clear();
        let matching: Vec<&CardEntry> = self
            .cards
            .iter()
            .filter(|card| card.rarity == rarity && filters.matches(card))
            .collect();
        let mut rng = rand::thread_rng();
        Ok(matching
            .choose_multiple(&mut rng, count)
            .map(|card| (*card).clone())
            .collect())
    }
}

#[async_trait]
impl MemberRoster for MemoryCatalog {
    async fn list_known_full_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.cards.iter().map(|c| c.member_name.clone()).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

/// Albums held in memory.
#[derive(Debug, Default)]
pub struct MemoryAlbums {
    albums: RwLock<HashMap<u64, Vec<OwnedCard>>>,
}

impl MemoryAlbums {
    pub fn new() -> MemoryAlbums {
        MemoryAlbums::default()
    }
}

#[async_trait]
impl CollectionStore for MemoryAlbums {
    async fn get_user_collection(&self, user_id: u64) -> Result<Vec<OwnedCard>> {
        let albums = self.albums.read().await;
        Ok(albums.get(&user_id).cloned().unwrap_or_default())
    }

    async fn add_cards_to_collection(&self, user_id: u64, cards: &[CardEntry]) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let mut albums = self.albums.write().await;
        let album = albums.entry(user_id).or_default();
        for (card, copies) in tally(cards) {
            match album.iter_mut().find(|owned| owned.card.id == card.id) {
                Some(owned) => owned.count += copies,
                None => album.push(OwnedCard {
                    card: card.clone(),
                    count: copies,
                    acquired_at: now,
                }),
            }
        }
        Ok(())
    }

    async fn get_card_by_id(&self, user_id: u64, card_id: u32) -> Result<Option<OwnedCard>> {
        let albums = self.albums.read().await;
        Ok(albums
            .get(&user_id)
            .and_then(|album| album.iter().find(|owned| owned.card.id == card_id))
            .cloned())
    }

    async fn user_count(&self) -> Result<u64> {
        Ok(self.albums.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::FacetValue;
    use crate::structs::{fixtures, Band};

    #[test]
    fn tally_counts_copies_in_first_seen_order() {
        let a = fixtures::card(5, "Ran Mitake", Rarity::Two);
        let b = fixtures::card(2, "Moca Aoba", Rarity::Two);
        let cards = vec![a.clone(), b.clone(), a.clone(), a.clone()];
        let tallied: Vec<(u32, u32)> = tally(&cards).into_iter().map(|(c, n)| (c.id, n)).collect();
        assert_eq!(tallied, vec![(5, 3), (2, 1)]);
    }

    #[tokio::test]
    async fn memory_catalog_samples_matching_tier_only() {
        let mut roselia = fixtures::card(3, "Yukina Minato", Rarity::Four);
        roselia.band = Band::Roselia;
        let catalog = MemoryCatalog::new(vec![
            fixtures::card(1, "Kasumi Toyama", Rarity::Four),
            fixtures::card(2, "Kasumi Toyama", Rarity::Two),
            roselia,
        ]);
        let mut filters = FacetFilterSet::new();
        filters.insert(FacetValue::Band(Band::Roselia));
        filters.insert(FacetValue::Rarity(Rarity::One));
        let cards = catalog.random_cards(Rarity::Four, &filters, 5).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, 3);

        let all = catalog
            .random_cards(Rarity::Four, &FacetFilterSet::new(), 5)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn memory_albums_increment_repeat_draws() {
        let albums = MemoryAlbums::new();
        let card = fixtures::card(10, "Aya Maruyama", Rarity::Three);
        albums
            .add_cards_to_collection(1, &[card.clone(), card.clone()])
            .await
            .unwrap();
        albums.add_cards_to_collection(1, &[card.clone()]).await.unwrap();

        let owned = albums.get_card_by_id(1, 10).await.unwrap().unwrap();
        assert_eq!(owned.count, 3);
        assert_eq!(albums.get_user_collection(1).await.unwrap().len(), 1);
        assert!(albums.get_card_by_id(2, 10).await.unwrap().is_none());
        assert!(albums.get_user_collection(2).await.unwrap().is_empty());
        assert_eq!(albums.user_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn roster_lists_distinct_names() {
        let catalog = MemoryCatalog::new(vec![
            fixtures::card(1, "Kasumi Toyama", Rarity::Four),
            fixtures::card(2, "Kasumi Toyama", Rarity::Two),
            fixtures::card(3, "Arisa Ichigaya", Rarity::Two),
        ]);
        let names = catalog.list_known_full_names().await.unwrap();
        assert_eq!(names, vec!["Arisa Ichigaya".to_string(), "Kasumi Toyama".to_string()]);
    }
}
