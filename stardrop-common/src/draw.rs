//! Draw resolution: rarity sampling with an optional guarantee, one catalog
//! batch per tier, padding of short batches, neighbor smoothing and a final
//! shuffle.

use crate::facet::FacetFilterSet;
use crate::store::{tally, CardSource};
use crate::structs::{CardEntry, Rarity};
use crate::{Error, Result};
use futures::future::try_join_all;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

const RATE_TOLERANCE: f64 = 1e-6;

fn default_min_guaranteed_tier() -> Rarity {
    Rarity::Three
}

///
/// A named rarity table draws are resolved against.
///
/// `rates` holds the probability of tiers 1 to 4 in that order.
///
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Pool {
    pub rates: [f64; 4],
    /// Tier the last card of a guaranteed draw is lifted to.
    #[serde(default = "default_min_guaranteed_tier")]
    pub min_guaranteed_tier: Rarity,
    /// Also lift tier 1 rolls on the forced draw. Off by default, so a pool
    /// with a non-zero tier 1 rate can still miss the guarantee.
    #[serde(default)]
    pub strict_guarantee: bool,
}

impl Pool {
    pub fn new(rates: [f64; 4]) -> Pool {
        Pool {
            rates,
            min_guaranteed_tier: default_min_guaranteed_tier(),
            strict_guarantee: false,
        }
    }

    /// 2★ 88.5%, 3★ 8.5%, 4★ 3%.
    pub fn standard() -> Pool {
        Pool::new([0.0, 0.885, 0.085, 0.03])
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        let invalid = |reason: String| Error::InvalidPool {
            pool: name.to_string(),
            reason,
        };
        if let Some(rate) = self.rates.iter().find(|r| !(0.0..=1.0).contains(*r)) {
            return Err(invalid(format!("rate {} is outside [0, 1]", rate)));
        }
        let sum: f64 = self.rates.iter().sum();
        if (sum - 1.0).abs() > RATE_TOLERANCE {
            return Err(invalid(format!("rates sum to {} instead of 1", sum)));
        }
        Ok(())
    }

    pub fn rate(&self, rarity: Rarity) -> f64 {
        self.rates[rarity.index()]
    }

    ///
    /// Map one uniform roll in `[0, 1)` to a tier, rarest band first.
    ///
    /// A `forced` roll lifts a result below `min_guaranteed_tier` to it,
    /// except a tier 1 result when the guarantee is not strict.
    ///
    pub fn roll_rarity(&self, roll: f64, forced: bool) -> Rarity {
        let p4 = self.rate(Rarity::Four);
        let p3 = p4 + self.rate(Rarity::Three);
        let p2 = p3 + self.rate(Rarity::Two);
        let rarity = if roll < p4 {
            Rarity::Four
        } else if roll < p3 {
            Rarity::Three
        } else if roll < p2 {
            Rarity::Two
        } else {
            Rarity::One
        };
        let liftable = rarity >= Rarity::Two || self.strict_guarantee;
        if forced && liftable && rarity < self.min_guaranteed_tier {
            self.min_guaranteed_tier
        } else {
            rarity
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub pool: String,
    pub count: usize,
    pub guarantee_upgrade: bool,
    pub filters: FacetFilterSet,
}

/// One catalog request made for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRecord {
    pub rarity: Rarity,
    pub requested: usize,
    pub returned: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawOutcome {
    /// Final, shuffled draw. Empty when the draw failed.
    pub cards: Vec<CardEntry>,
    pub batches: Vec<BatchRecord>,
    pub requested: usize,
}

impl DrawOutcome {
    pub fn is_failure(&self) -> bool {
        self.cards.len() != self.requested
    }

    /// Distinct cards with the number of copies the user receives.
    pub fn tally(&self) -> Vec<(&CardEntry, u32)> {
        tally(&self.cards)
    }
}

///
/// Roll `count` tiers. With `guarantee`, the last roll is forced unless one
/// of the earlier rolls already reached the pool's guaranteed tier.
///
pub fn sample_rarities<R: Rng + ?Sized>(
    pool: &Pool,
    count: usize,
    guarantee: bool,
    rng: &mut R,
) -> Vec<Rarity> {
    let mut rarities: Vec<Rarity> = Vec::with_capacity(count);
    if guarantee && count >= 1 {
        for _ in 0..count - 1 {
            rarities.push(pool.roll_rarity(rng.gen::<f64>(), false));
        }
        let reached = rarities.iter().any(|r| *r >= pool.min_guaranteed_tier);
        rarities.push(pool.roll_rarity(rng.gen::<f64>(), !reached));
    } else {
        for _ in 0..count {
            rarities.push(pool.roll_rarity(rng.gen::<f64>(), false));
        }
    }
    rarities
}

///
/// Pad a short batch with random copies of the cards it came back with.
/// An empty batch stays empty.
///
pub fn backfill<R: Rng + ?Sized>(batch: &mut Vec<CardEntry>, required: usize, rng: &mut R) {
    let returned = batch.len();
    if returned == 0 {
        return;
    }
    while batch.len() < required {
        let pick = rng.gen_range(0..returned);
        batch.push(batch[pick].clone());
    }
}

///
/// Walk the batch and, with probability `1 / len` per slot, replace a card
/// with the one after it. The length is read again on every step.
///
pub fn smooth<R: Rng + ?Sized>(batch: &mut [CardEntry], rng: &mut R) {
    for index in 0..batch.len().saturating_sub(1) {
        let roll: f64 = rng.gen();
        if roll < 1.0 / batch.len() as f64 {
            batch[index] = batch[index + 1].clone();
        }
    }
}

pub struct DrawEngine<'a, S: CardSource + ?Sized> {
    source: &'a S,
    pools: &'a BTreeMap<String, Pool>,
}

impl<'a, S: CardSource + ?Sized> DrawEngine<'a, S> {
    pub fn new(source: &'a S, pools: &'a BTreeMap<String, Pool>) -> DrawEngine<'a, S> {
        DrawEngine { source, pools }
    }

    pub async fn draw<R: Rng + Send>(
        &self,
        request: &DrawRequest,
        rng: &mut R,
    ) -> Result<DrawOutcome> {
        let pool = self.pools.get(&request.pool).ok_or_else(|| Error::InvalidPool {
            pool: request.pool.clone(),
            reason: "no such pool".to_string(),
        })?;
        pool.validate(&request.pool)?;
        let rarities = sample_rarities(pool, request.count, request.guarantee_upgrade, rng);
        trace!("Sampled rarities: {:?}", rarities);

        let plan: Vec<(Rarity, usize)> = Rarity::ALL
            .iter()
            .map(|rarity| (*rarity, rarities.iter().filter(|r| *r == rarity).count()))
            .filter(|(_, requested)| *requested > 0)
            .collect();
        let fetched = try_join_all(plan.iter().map(|(rarity, requested)| {
            self.source
                .random_cards(*rarity, &request.filters, *requested)
        }))
        .await?;

        let mut cards: Vec<CardEntry> = Vec::with_capacity(request.count);
        let mut batches: Vec<BatchRecord> = Vec::with_capacity(plan.len());
        for ((rarity, requested), mut batch) in plan.into_iter().zip(fetched) {
            let returned = batch.len();
            if returned < requested {
                debug!(
                    "Catalog returned {} of {} {} cards",
                    returned, requested, rarity
                );
            }
            backfill(&mut batch, requested, rng);
            smooth(&mut batch, rng);
            batches.push(BatchRecord {
                rarity,
                requested,
                returned,
            });
            cards.extend(batch);
        }
        cards.shuffle(rng);

        if cards.len() != request.count {
            warn!(
                "Draw of {} cards from pool {} failed, only {} resolved",
                request.count,
                request.pool,
                cards.len()
            );
            cards.clear();
        }
        Ok(DrawOutcome {
            cards,
            batches,
            requested: request.count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::FacetValue;
    use crate::store::MemoryCatalog;
    use crate::structs::{fixtures, Band};
    use proptest::prelude::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn pools(pool: Pool) -> BTreeMap<String, Pool> {
        BTreeMap::from([("star".to_string(), pool)])
    }

    fn request(count: usize, guarantee_upgrade: bool) -> DrawRequest {
        DrawRequest {
            pool: "star".to_string(),
            count,
            guarantee_upgrade,
            filters: FacetFilterSet::new(),
        }
    }

    fn catalog() -> MemoryCatalog {
        let mut cards = Vec::new();
        let mut id = 0;
        for rarity in Rarity::ALL {
            for _ in 0..30 {
                id += 1;
                cards.push(fixtures::card(id, "Kasumi Toyama", rarity));
            }
        }
        MemoryCatalog::new(cards)
    }

    #[test]
    fn roll_bands_are_checked_rarest_first() {
        let pool = Pool::new([0.1, 0.6, 0.2, 0.1]);
        assert_eq!(pool.roll_rarity(0.05, false), Rarity::Four);
        assert_eq!(pool.roll_rarity(0.25, false), Rarity::Three);
        assert_eq!(pool.roll_rarity(0.5, false), Rarity::Two);
        assert_eq!(pool.roll_rarity(0.95, false), Rarity::One);
        assert_eq!(pool.roll_rarity(0.5, true), Rarity::Three);
        assert_eq!(pool.roll_rarity(0.05, true), Rarity::Four);
    }

    #[test]
    fn forced_roll_can_still_land_on_tier_one() {
        let mut pool = Pool::new([1.0, 0.0, 0.0, 0.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(sample_rarities(&pool, 1, true, &mut rng), vec![Rarity::One]);
        pool.strict_guarantee = true;
        assert_eq!(sample_rarities(&pool, 1, true, &mut rng), vec![Rarity::Three]);
    }

    #[test]
    fn single_guaranteed_draw_is_forced() {
        let pool = Pool::new([0.0, 1.0, 0.0, 0.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(sample_rarities(&pool, 1, true, &mut rng), vec![Rarity::Three]);
        assert_eq!(sample_rarities(&pool, 1, false, &mut rng), vec![Rarity::Two]);
    }

    #[test]
    fn last_roll_is_not_forced_once_guarantee_is_reached() {
        let pool = Pool::new([0.0, 0.5, 0.5, 0.0]);
        // Rolls 0.0 then 0.5: tier three first, so the second stays tier two.
        let mut rng = StepRng::new(0, 1 << 63);
        assert_eq!(
            sample_rarities(&pool, 2, true, &mut rng),
            vec![Rarity::Three, Rarity::Two]
        );
        // Both rolls 0.75: nothing reached, so the last one is lifted.
        let mut rng = StepRng::new(3 << 62, 0);
        assert_eq!(
            sample_rarities(&pool, 2, true, &mut rng),
            vec![Rarity::Two, Rarity::Three]
        );
    }

    #[test]
    fn pool_validation() {
        assert!(Pool::standard().validate("star").is_ok());
        assert!(Pool::new([0.5, 0.5, 0.5, 0.0]).validate("bad").is_err());
        assert!(Pool::new([-0.5, 1.5, 0.0, 0.0]).validate("bad").is_err());
    }

    #[test]
    fn empirical_distribution_matches_rates() {
        let pool = Pool::new([0.1, 0.6, 0.2, 0.1]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let trials = 200_000;
        let rarities = sample_rarities(&pool, trials, false, &mut rng);
        for rarity in Rarity::ALL {
            let seen = rarities.iter().filter(|r| **r == rarity).count() as f64 / trials as f64;
            assert!(
                (seen - pool.rate(rarity)).abs() < 0.01,
                "{} seen {} expected {}",
                rarity,
                seen,
                pool.rate(rarity)
            );
        }
    }

    #[test]
    fn smoothing_always_copies_successor_on_zero_rolls() {
        let mut batch: Vec<CardEntry> = (1..=3)
            .map(|id| fixtures::card(id, "Ran Mitake", Rarity::Two))
            .collect();
        smooth(&mut batch, &mut StepRng::new(0, 0));
        let ids: Vec<u32> = batch.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 3]);
    }

    #[test]
    fn smoothing_never_copies_on_high_rolls() {
        let mut batch: Vec<CardEntry> = (1..=3)
            .map(|id| fixtures::card(id, "Ran Mitake", Rarity::Two))
            .collect();
        smooth(&mut batch, &mut StepRng::new(u64::MAX, 0));
        let ids: Vec<u32> = batch.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn smoothing_duplicate_rate_for_pairs() {
        // Two distinct cards: the first slot is overwritten half the time.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let trials = 20_000;
        let mut duplicated = 0;
        for _ in 0..trials {
            let mut batch = vec![
                fixtures::card(1, "Ran Mitake", Rarity::Two),
                fixtures::card(2, "Ran Mitake", Rarity::Two),
            ];
            smooth(&mut batch, &mut rng);
            if batch[0].id == batch[1].id {
                duplicated += 1;
            }
        }
        let rate = duplicated as f64 / trials as f64;
        assert!((rate - 0.5).abs() < 0.02, "duplicate rate {}", rate);
    }

    #[tokio::test]
    async fn draw_returns_requested_count() {
        let catalog = catalog();
        let pools = pools(Pool::new([0.25, 0.25, 0.25, 0.25]));
        let engine = DrawEngine::new(&catalog, &pools);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = engine.draw(&request(10, false), &mut rng).await.unwrap();
        assert!(!outcome.is_failure());
        assert_eq!(outcome.cards.len(), 10);
        let requested: usize = outcome.batches.iter().map(|b| b.requested).sum();
        assert_eq!(requested, 10);
        assert!(outcome.batches.iter().all(|b| b.requested > 0));
        let mut tiers: Vec<Rarity> = outcome.batches.iter().map(|b| b.rarity).collect();
        let sorted = {
            let mut sorted = tiers.clone();
            sorted.sort();
            sorted
        };
        assert_eq!(tiers, sorted);
        tiers.dedup();
        assert_eq!(tiers.len(), outcome.batches.len());
    }

    #[tokio::test]
    async fn merged_tiers_are_shuffled() {
        let catalog = catalog();
        let pools = pools(Pool::new([0.25, 0.25, 0.25, 0.25]));
        let engine = DrawEngine::new(&catalog, &pools);
        let mut unsorted = 0;
        for seed in 0..5 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let outcome = engine.draw(&request(20, false), &mut rng).await.unwrap();
            assert_eq!(outcome.cards.len(), 20);
            let tiers: Vec<Rarity> = outcome.cards.iter().map(|c| c.rarity).collect();
            if tiers.windows(2).any(|pair| pair[0] > pair[1]) {
                unsorted += 1;
            }
        }
        assert!(unsorted > 0);
    }

    #[tokio::test]
    async fn invalid_pool_is_rejected_before_drawing() {
        let catalog = catalog();
        let pools = pools(Pool::new([0.0, 5.0, 0.0, 0.0]));
        let engine = DrawEngine::new(&catalog, &pools);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            engine.draw(&request(3, false), &mut rng).await,
            Err(Error::InvalidPool { .. })
        ));
    }

    #[tokio::test]
    async fn short_batch_is_padded_with_duplicates() {
        let catalog = MemoryCatalog::new(vec![fixtures::card(77, "Aya Maruyama", Rarity::Two)]);
        let pools = pools(Pool::new([0.0, 1.0, 0.0, 0.0]));
        let engine = DrawEngine::new(&catalog, &pools);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let outcome = engine.draw(&request(10, false), &mut rng).await.unwrap();
        assert_eq!(outcome.cards.len(), 10);
        assert!(outcome.cards.iter().all(|c| c.id == 77));
        assert_eq!(
            outcome.batches,
            vec![BatchRecord {
                rarity: Rarity::Two,
                requested: 10,
                returned: 1
            }]
        );
        assert_eq!(outcome.tally().len(), 1);
        assert_eq!(outcome.tally()[0].1, 10);
    }

    #[tokio::test]
    async fn empty_tier_fails_the_whole_draw() {
        let catalog = MemoryCatalog::new(vec![fixtures::card(1, "Aya Maruyama", Rarity::Two)]);
        let pools = pools(Pool::new([0.0, 0.5, 0.0, 0.5]));
        let engine = DrawEngine::new(&catalog, &pools);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let outcome = engine.draw(&request(20, false), &mut rng).await.unwrap();
        assert!(outcome.is_failure());
        assert!(outcome.cards.is_empty());
        assert!(outcome
            .batches
            .iter()
            .any(|b| b.rarity == Rarity::Four && b.returned == 0));
    }

    #[tokio::test]
    async fn filters_narrow_the_catalog_request() {
        let mut roselia = fixtures::card(500, "Sayo Hikawa", Rarity::Two);
        roselia.band = Band::Roselia;
        let catalog = MemoryCatalog::new(vec![
            roselia,
            fixtures::card(501, "Kasumi Toyama", Rarity::Two),
        ]);
        let pools = pools(Pool::new([0.0, 1.0, 0.0, 0.0]));
        let engine = DrawEngine::new(&catalog, &pools);
        let mut draw = request(5, false);
        draw.filters.insert(FacetValue::Band(Band::Roselia));
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let outcome = engine.draw(&draw, &mut rng).await.unwrap();
        assert_eq!(outcome.cards.len(), 5);
        assert!(outcome.cards.iter().all(|c| c.band == Band::Roselia));
    }

    #[tokio::test]
    async fn unknown_pool_is_an_error() {
        let catalog = catalog();
        let pools = pools(Pool::standard());
        let engine = DrawEngine::new(&catalog, &pools);
        let mut draw = request(1, false);
        draw.pool = "honour".to_string();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            engine.draw(&draw, &mut rng).await,
            Err(Error::InvalidPool { .. })
        ));
    }

    fn rates_without_tier_one() -> impl Strategy<Value = [f64; 4]> {
        (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0)
            .prop_filter("needs weight", |(a, b, c)| a + b + c > 0.01)
            .prop_map(|(a, b, c)| {
                let sum = a + b + c;
                [0.0, a / sum, b / sum, c / sum]
            })
    }

    proptest! {
        #[test]
        fn guarantee_holds_without_tier_one(
            rates in rates_without_tier_one(),
            count in 2usize..12,
            seed in any::<u64>(),
        ) {
            let pool = Pool::new(rates);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let rarities = sample_rarities(&pool, count, true, &mut rng);
            prop_assert_eq!(rarities.len(), count);
            prop_assert!(rarities.iter().any(|r| *r >= Rarity::Three));
        }

        #[test]
        fn backfill_pads_with_existing_cards(
            returned in 1usize..10,
            extra in 0usize..15,
            seed in any::<u64>(),
        ) {
            let mut batch: Vec<CardEntry> = (0..returned as u32)
                .map(|id| fixtures::card(id, "Moca Aoba", Rarity::Two))
                .collect();
            let original: HashSet<u32> = batch.iter().map(|c| c.id).collect();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            backfill(&mut batch, returned + extra, &mut rng);
            prop_assert_eq!(batch.len(), returned + extra);
            prop_assert!(batch.iter().all(|c| original.contains(&c.id)));
        }
    }

    #[test]
    fn backfill_leaves_empty_batch_empty() {
        let mut batch: Vec<CardEntry> = Vec::new();
        backfill(&mut batch, 5, &mut ChaCha8Rng::seed_from_u64(0));
        assert!(batch.is_empty());
    }
}
