use crate::structs::{Attribute, OwnedCard, Rarity};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumStats {
    /// Different cards owned.
    pub distinct: usize,
    /// Copies owned, duplicates included.
    pub total: u64,
    pub by_rarity: BTreeMap<Rarity, u64>,
    pub by_attribute: BTreeMap<Attribute, u64>,
}

impl AlbumStats {
    pub fn from_collection(collection: &[OwnedCard]) -> AlbumStats {
        let mut by_rarity: BTreeMap<Rarity, u64> = Rarity::ALL.iter().map(|r| (*r, 0)).collect();
        let mut by_attribute: BTreeMap<Attribute, u64> =
            Attribute::ALL.iter().map(|a| (*a, 0)).collect();
        let mut total = 0;
        for owned in collection {
            let copies = owned.count as u64;
            total += copies;
            *by_rarity.entry(owned.card.rarity).or_default() += copies;
            *by_attribute.entry(owned.card.attribute).or_default() += copies;
        }
        AlbumStats {
            distinct: collection.len(),
            total,
            by_rarity,
            by_attribute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::fixtures;

    #[test]
    fn counts_copies_per_rarity_and_attribute() {
        let mut four = fixtures::owned(fixtures::card(1, "Kasumi Toyama", Rarity::Four));
        four.count = 3;
        let mut pure = fixtures::owned(fixtures::card(2, "Tae Hanazono", Rarity::Two));
        pure.card.attribute = Attribute::Pure;
        let stats = AlbumStats::from_collection(&[four, pure]);
        assert_eq!(stats.distinct, 2);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_rarity[&Rarity::Four], 3);
        assert_eq!(stats.by_rarity[&Rarity::Two], 1);
        assert_eq!(stats.by_rarity[&Rarity::One], 0);
        assert_eq!(stats.by_attribute[&Attribute::Cool], 3);
        assert_eq!(stats.by_attribute[&Attribute::Pure], 1);
    }

    #[test]
    fn empty_album() {
        let stats = AlbumStats::from_collection(&[]);
        assert_eq!(stats.distinct, 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.by_rarity.len(), 4);
        assert_eq!(stats.by_attribute.len(), 4);
    }
}
