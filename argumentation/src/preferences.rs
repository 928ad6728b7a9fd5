use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{Criterion, Rating};
use crate::item::Item;

/// Value given to an item on a criterion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionRating {
    pub item: Item,
    pub criterion: Criterion,
    pub rating: Rating,
}

/// Preferences of a negotiator: criteria in descending order of importance
/// and ratings given to items on those criteria.
///
/// Preferences are built once and never change afterwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// More important criteria are at the beginning.
    criteria: Vec<Criterion>,
    ratings: Vec<CriterionRating>,
}

impl CriterionRating {
    pub fn new(item: Item, criterion: Criterion, rating: Rating) -> CriterionRating {
        CriterionRating {
            item,
            criterion,
            rating,
        }
    }
}

impl Preferences {
    /// Duplicated criteria keep only their first (most important) position.
    pub fn new(criteria: Vec<Criterion>, ratings: Vec<CriterionRating>) -> Preferences {
        let mut ordered = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            if !ordered.contains(&criterion) {
                ordered.push(criterion);
            }
        }
        Preferences {
            criteria: ordered,
            ratings,
        }
    }

    /// Ranks all known criteria in random order and rates every item randomly.
    pub fn random<R: Rng + ?Sized>(items: &[Item], rng: &mut R) -> Preferences {
        let mut criteria = Criterion::ALL.to_vec();
        criteria.shuffle(rng);

        let mut ratings = Vec::with_capacity(items.len() * criteria.len());
        for item in items {
            for criterion in &criteria {
                let rating = Rating::ALL[rng.gen_range(0..Rating::ALL.len())];
                ratings.push(CriterionRating::new(item.clone(), *criterion, rating));
            }
        }
        Preferences { criteria, ratings }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn ratings(&self) -> &[CriterionRating] {
        &self.ratings
    }

    pub fn is_rated(&self, item: &Item) -> bool {
        self.ratings.iter().any(|fact| &fact.item == item)
    }

    pub fn rating(&self, item: &Item, criterion: Criterion) -> Option<Rating> {
        self.ratings
            .iter()
            .find(|fact| &fact.item == item && fact.criterion == criterion)
            .map(|fact| fact.rating)
    }

    /// Ranked criteria get `N - rank`, unranked ones 0.
    pub fn importance(&self, criterion: Criterion) -> u32 {
        match self.criteria.iter().position(|ranked| *ranked == criterion) {
            Some(rank) => (self.criteria.len() - rank) as u32,
            None => 0,
        }
    }

    /// Weighted sum of all ratings recorded for the item.
    pub fn score(&self, item: &Item) -> u32 {
        self.ratings
            .iter()
            .filter(|fact| &fact.item == item)
            .map(|fact| fact.rating.value() * self.importance(fact.criterion))
            .sum()
    }

    /// Best scoring candidate. On ties the first candidate wins.
    /// Candidates without any rating are skipped.
    pub fn best<'a>(&self, candidates: &'a [Item]) -> Option<&'a Item> {
        let mut best: Option<(&Item, u32)> = None;
        for item in candidates {
            if !self.is_rated(item) {
                continue;
            }
            let score = self.score(item);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((item, score)),
            }
        }
        best.map(|(item, _)| item)
    }

    /// Item is acceptable if it scores at least as well as the item ranked
    /// at the top 10% of the reference set. Nothing is acceptable against
    /// an empty reference set.
    pub fn is_acceptable(&self, item: &Item, reference: &[Item]) -> bool {
        if reference.is_empty() {
            return false;
        }

        let mut scores = reference
            .iter()
            .map(|item| self.score(item))
            .collect::<Vec<_>>();
        scores.sort_unstable();

        // ceil(0.1 * n) computed on integers.
        let top = (scores.len() + 9) / 10;
        let threshold = scores[scores.len() - top.min(scores.len())];
        self.score(item) >= threshold
    }

    pub fn is_better_criterion(&self, criterion: Criterion, other: Criterion) -> bool {
        self.importance(criterion) > self.importance(other)
    }

    /// Most important ranked criterion, that isn't excluded.
    pub fn best_criterion_except(&self, excluded: &[Criterion]) -> Option<Criterion> {
        self.criteria
            .iter()
            .copied()
            .find(|criterion| !excluded.contains(criterion))
    }

    /// Evaluated items in order of their first rating.
    pub fn items(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = vec![];
        for fact in &self.ratings {
            if !items.contains(&&fact.item) {
                items.push(&fact.item);
            }
        }
        items
    }
}

impl fmt::Display for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- PREFERENCES ---")?;
        let order = self
            .criteria
            .iter()
            .map(|criterion| criterion.to_string())
            .collect::<Vec<_>>()
            .join(" > ");
        writeln!(f, "{}", order)?;

        for item in self.items() {
            writeln!(f, "\n{} (score {}):", item.name, self.score(item))?;
            for criterion in &self.criteria {
                if let Some(rating) = self.rating(item, *criterion) {
                    writeln!(f, "\t{} = {}", criterion, rating)?;
                }
            }
        }
        write!(f, "-------------------")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use Criterion::*;
    use Rating::*;

    pub fn item(name: &str) -> Item {
        Item::new(name, format!("{} description", name))
    }

    /// Items A, B with `Power > Cost` ranking.
    pub fn power_over_cost() -> (Vec<Item>, Preferences) {
        let (a, b) = (item("A"), item("B"));
        let preferences = Preferences::new(
            vec![Power, Cost],
            vec![
                CriterionRating::new(a.clone(), Power, Good),
                CriterionRating::new(a.clone(), Cost, Bad),
                CriterionRating::new(b.clone(), Power, Bad),
                CriterionRating::new(b.clone(), Cost, Good),
            ],
        );
        (vec![a, b], preferences)
    }

    /// Items `I0..In` rated only on `Power`, item `I<idx>` scores `scores[idx]`.
    fn synthetic_scores(scores: &[u32]) -> (Vec<Item>, Preferences) {
        let items = (0..scores.len())
            .map(|idx| item(&format!("I{}", idx)))
            .collect::<Vec<_>>();

        // Single ranked criterion has importance 1, so score == rating value.
        let mut ratings = vec![];
        let criteria = vec![Power];
        for (item, score) in items.iter().zip(scores) {
            ratings.push(CriterionRating::new(
                item.clone(),
                Power,
                Rating::from_value(*score).unwrap(),
            ));
        }
        (items, Preferences::new(criteria, ratings))
    }

    #[test]
    fn test_importance_and_scores() {
        let (items, preferences) = power_over_cost();

        assert_eq!(preferences.importance(Power), 2);
        assert_eq!(preferences.importance(Cost), 1);
        assert_eq!(preferences.importance(Noise), 0);

        assert_eq!(preferences.score(&items[0]), 5);
        assert_eq!(preferences.score(&items[1]), 4);
        assert_eq!(preferences.best(&items), Some(&items[0]));
        assert!(preferences.is_better_criterion(Power, Cost));
        assert!(!preferences.is_better_criterion(Cost, Power));
        assert!(!preferences.is_better_criterion(Noise, Environment));
    }

    #[test]
    fn test_rating_lookup() {
        let (items, preferences) = power_over_cost();
        assert_eq!(preferences.rating(&items[0], Power), Some(Good));
        assert_eq!(preferences.rating(&items[1], Cost), Some(Good));
        assert_eq!(preferences.rating(&items[1], Noise), None);
        assert_eq!(preferences.rating(&item("C"), Power), None);
    }

    #[test]
    fn test_best_prefers_first_on_ties() {
        let (_, preferences) = synthetic_scores(&[2, 3, 3, 1]);
        let items = (0..4).map(|i| item(&format!("I{}", i))).collect::<Vec<_>>();
        assert_eq!(preferences.best(&items).unwrap().name, "I1");
        assert_eq!(preferences.best(&items[2..]).unwrap().name, "I2");
        assert_eq!(preferences.best(&[]), None);
    }

    #[test]
    fn test_best_skips_unrated_candidates() {
        let (items, preferences) = synthetic_scores(&[0]);
        let candidates = vec![item("C"), items[0].clone()];
        assert_eq!(preferences.best(&candidates), Some(&items[0]));
        assert_eq!(preferences.best(&candidates[..1]), None);
        assert!(!preferences.is_rated(&candidates[0]));
    }

    #[test]
    fn test_acceptable_boundary_on_ten_items() {
        // With 10 items the threshold is the single top score.
        let (items, preferences) = synthetic_scores(&[0, 1, 1, 2, 0, 1, 3, 2, 0, 1]);
        assert!(preferences.is_acceptable(&items[6], &items));
        for item in items.iter().filter(|item| item.name != "I6") {
            assert!(!preferences.is_acceptable(item, &items));
        }

        // Item scoring exactly one below the threshold.
        assert_eq!(preferences.score(&items[3]), 2);
        assert!(!preferences.is_acceptable(&items[3], &items));
    }

    #[test]
    fn test_acceptable_threshold_moves_with_reference_size() {
        // 11 items: ceil(1.1) = 2, so the second best score is enough.
        let (items, preferences) = synthetic_scores(&[0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3]);
        assert!(preferences.is_acceptable(&items[10], &items));
        assert!(preferences.is_acceptable(&items[9], &items));
        assert!(!preferences.is_acceptable(&items[8], &items));

        // Single item reference set accepts its only item.
        assert!(preferences.is_acceptable(&items[0], &items[0..1]));
    }

    #[test]
    fn test_nothing_acceptable_against_empty_reference() {
        let (items, preferences) = power_over_cost();
        assert!(!preferences.is_acceptable(&items[0], &[]));
    }

    #[test]
    fn test_score_monotonic_under_rating_upgrade() {
        let (items, preferences) = power_over_cost();
        for fact_idx in 0..preferences.ratings().len() {
            let fact = &preferences.ratings()[fact_idx];
            let before = preferences.score(&fact.item);

            for upgraded in Rating::ALL.iter().filter(|rating| **rating > fact.rating) {
                let mut ratings = preferences.ratings().to_vec();
                ratings[fact_idx].rating = *upgraded;
                let upgraded_prefs = Preferences::new(preferences.criteria().to_vec(), ratings);

                assert!(upgraded_prefs.score(&fact.item) >= before);
                // Other items stay untouched.
                for other in items.iter().filter(|other| **other != fact.item) {
                    assert_eq!(upgraded_prefs.score(other), preferences.score(other));
                }
            }
        }
    }

    #[test]
    fn test_best_criterion_except() {
        let (_, preferences) = power_over_cost();
        assert_eq!(preferences.best_criterion_except(&[]), Some(Power));
        assert_eq!(preferences.best_criterion_except(&[Power]), Some(Cost));
        assert_eq!(preferences.best_criterion_except(&[Power, Cost]), None);
        // Unranked criteria are never returned.
        assert_eq!(preferences.best_criterion_except(&[Power, Cost, Noise]), None);
    }

    #[test]
    fn test_duplicated_criteria_keep_first_rank() {
        let preferences = Preferences::new(vec![Cost, Power, Cost], vec![]);
        assert_eq!(preferences.criteria(), &[Cost, Power]);
        assert_eq!(preferences.importance(Cost), 2);
    }

    #[test]
    fn test_random_preferences_are_reproducible() {
        let items = vec![item("A"), item("B"), item("C")];
        let first = Preferences::random(&items, &mut StdRng::seed_from_u64(42));
        let second = Preferences::random(&items, &mut StdRng::seed_from_u64(42));

        assert_eq!(first.criteria(), second.criteria());
        assert_eq!(first.ratings(), second.ratings());

        assert_eq!(first.criteria().len(), Criterion::ALL.len());
        assert_eq!(first.ratings().len(), items.len() * Criterion::ALL.len());
        for item in &items {
            for criterion in Criterion::ALL {
                assert!(first.rating(item, criterion).is_some());
            }
        }
    }
}
