// File: prizecode-core/src/services/outcome_selector.rs

use rand::Rng;
use prizecode_common::error::Error;
use prizecode_common::models::prize::PrizeTier;
use prizecode_common::traits::selector_traits::PrizeDraw;

/// Uniform randomness in [0, 1). Injectable so tests can pin draws.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Production source backed by the thread-local generator. The odds are not
/// security-sensitive; they only have to be unbiased.
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn next_unit(&self) -> f64 {
        rand::rng().random()
    }
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Holds the prize-weight table and draws one tier per redemption. Pure: no
/// state changes between draws, so a draw discarded by a rolled-back
/// transaction costs nothing.
pub struct OutcomeSelector {
    tiers: Vec<PrizeTier>,
    random: Box<dyn RandomSource>,
}

impl OutcomeSelector {
    pub fn new(tiers: Vec<PrizeTier>) -> Result<Self, Error> {
        Self::with_random_source(tiers, Box::new(ThreadRandomSource))
    }

    pub fn with_random_source(
        tiers: Vec<PrizeTier>,
        random: Box<dyn RandomSource>,
    ) -> Result<Self, Error> {
        if tiers.is_empty() {
            return Err(Error::PrizeTable("at least one tier is required".to_string()));
        }
        for tier in &tiers {
            if !tier.weight.is_finite() || tier.weight < 0.0 {
                return Err(Error::PrizeTable(format!(
                    "tier '{}' has invalid weight {}",
                    tier.label, tier.weight
                )));
            }
            if tier.payout_cents < 0 {
                return Err(Error::PrizeTable(format!(
                    "tier '{}' has negative payout {}",
                    tier.label, tier.payout_cents
                )));
            }
        }
        let sum: f64 = tiers.iter().map(|t| t.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::PrizeTable(format!(
                "tier weights sum to {}, expected 1.0",
                sum
            )));
        }
        Ok(Self { tiers, random })
    }

    pub fn tiers(&self) -> &[PrizeTier] {
        &self.tiers
    }
}

impl PrizeDraw for OutcomeSelector {
    fn draw(&self) -> PrizeTier {
        let r = self.random.next_unit();
        let mut cumulative = 0.0;
        // Non-empty is a construction invariant, so `chosen` always lands on
        // a real tier; if floating drift keeps the cumulative sum below `r`,
        // the walk runs off the end and the last tier stands.
        let mut chosen = &self.tiers[0];
        for tier in &self.tiers {
            chosen = tier;
            cumulative += tier.weight;
            if cumulative >= r {
                break;
            }
        }
        chosen.clone()
    }
}

/// The canonical prize table. Weights must sum to 1.0; payouts are cents.
pub fn default_prize_table() -> Vec<PrizeTier> {
    vec![
        PrizeTier::new("grand", 0.01, 100_000),
        PrizeTier::new("second", 0.04, 10_000),
        PrizeTier::new("third", 0.15, 1_000),
        PrizeTier::new("consolation", 0.30, 100),
        PrizeTier::new("no_prize", 0.50, 0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Replays a fixed sequence of "random" values, then repeats the last.
    struct FixedSource {
        values: Mutex<Vec<f64>>,
    }

    impl FixedSource {
        fn new(values: Vec<f64>) -> Self {
            Self {
                values: Mutex::new(values),
            }
        }
    }

    impl RandomSource for FixedSource {
        fn next_unit(&self) -> f64 {
            let mut values = self.values.lock().unwrap();
            if values.len() > 1 {
                values.remove(0)
            } else {
                values[0]
            }
        }
    }

    struct SeededSource {
        rng: Mutex<StdRng>,
    }

    impl SeededSource {
        fn new(seed: u64) -> Self {
            Self {
                rng: Mutex::new(StdRng::seed_from_u64(seed)),
            }
        }
    }

    impl RandomSource for SeededSource {
        fn next_unit(&self) -> f64 {
            self.rng.lock().unwrap().random()
        }
    }

    fn two_tier_table() -> Vec<PrizeTier> {
        vec![
            PrizeTier::new("A", 0.05, 10_000),
            PrizeTier::new("B", 0.95, 0),
        ]
    }

    #[test]
    fn draw_picks_tier_by_cumulative_weight() {
        let selector = OutcomeSelector::with_random_source(
            two_tier_table(),
            Box::new(FixedSource::new(vec![0.03])),
        )
        .unwrap();
        let tier = selector.draw();
        assert_eq!(tier.label, "A");
        assert_eq!(tier.payout_cents, 10_000);

        let selector = OutcomeSelector::with_random_source(
            two_tier_table(),
            Box::new(FixedSource::new(vec![0.50])),
        )
        .unwrap();
        let tier = selector.draw();
        assert_eq!(tier.label, "B");
        assert_eq!(tier.payout_cents, 0);
    }

    #[test]
    fn draw_falls_back_to_last_tier_at_the_upper_edge() {
        let selector = OutcomeSelector::with_random_source(
            two_tier_table(),
            Box::new(FixedSource::new(vec![1.0 - 1e-9])),
        )
        .unwrap();
        let tier = selector.draw();
        assert_eq!(tier.label, "B");
    }

    #[test]
    fn draw_never_leaves_the_configured_set() {
        let selector = OutcomeSelector::with_random_source(
            default_prize_table(),
            Box::new(SeededSource::new(7)),
        )
        .unwrap();
        let labels: Vec<String> = selector.tiers().iter().map(|t| t.label.clone()).collect();
        for _ in 0..10_000 {
            let tier = selector.draw();
            assert!(labels.contains(&tier.label));
        }
    }

    #[test]
    fn empirical_frequencies_converge_to_configured_weights() {
        let selector = OutcomeSelector::with_random_source(
            default_prize_table(),
            Box::new(SeededSource::new(42)),
        )
        .unwrap();

        let draws = 200_000usize;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..draws {
            *counts.entry(selector.draw().label).or_insert(0) += 1;
        }

        for tier in selector.tiers() {
            let observed = *counts.get(&tier.label).unwrap_or(&0) as f64 / draws as f64;
            assert!(
                (observed - tier.weight).abs() < 0.01,
                "tier '{}': observed {} vs weight {}",
                tier.label,
                observed,
                tier.weight
            );
        }
    }

    #[test]
    fn draw_reports_the_weight_it_was_configured_with() {
        let selector = OutcomeSelector::with_random_source(
            two_tier_table(),
            Box::new(FixedSource::new(vec![0.01])),
        )
        .unwrap();
        let tier = selector.draw();
        assert_eq!(tier.weight, 0.05);
    }

    #[test]
    fn rejects_weights_that_do_not_sum_to_one() {
        let tiers = vec![
            PrizeTier::new("A", 0.05, 10_000),
            PrizeTier::new("B", 0.80, 0),
        ];
        assert!(matches!(
            OutcomeSelector::new(tiers),
            Err(Error::PrizeTable(_))
        ));
    }

    #[test]
    fn rejects_negative_weights_and_empty_tables() {
        let tiers = vec![
            PrizeTier::new("A", -0.5, 0),
            PrizeTier::new("B", 1.5, 0),
        ];
        assert!(matches!(
            OutcomeSelector::new(tiers),
            Err(Error::PrizeTable(_))
        ));
        assert!(matches!(
            OutcomeSelector::new(Vec::new()),
            Err(Error::PrizeTable(_))
        ));
    }

    #[test]
    fn default_table_is_well_formed() {
        assert!(OutcomeSelector::new(default_prize_table()).is_ok());
    }
}
