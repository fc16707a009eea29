use std::sync::{Mutex, PoisonError};

use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;

/// Spoken exactly as written, including the original wording and trailing space.
pub const STANDARD_FACTS: [&str; 3] = [
    "A negative number times another negative number is a postive",
    "Georg Cantor proved that there are many infinities, some vastly larger than others.",
    "A prime number is a whole number greater than 1, \
     whose only two whole-number factors are 1 and itself. ",
];

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("a fact set needs at least one non-empty fact")]
pub struct EmptyFactSet;

/// Ordered, non-empty list of facts read by the fact intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactSet {
    facts: Vec<String>,
}

impl FactSet {
    pub fn new<I, S>(facts: I) -> Result<Self, EmptyFactSet>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let facts = facts
            .into_iter()
            .map(|fact| {
                let fact: String = fact.into();
                fact.trim().to_owned()
            })
            .filter(|fact| !fact.is_empty())
            .collect::<Vec<_>>();

        if facts.is_empty() {
            return Err(EmptyFactSet);
        }
        Ok(Self { facts })
    }

    pub fn standard() -> Self {
        Self { facts: STANDARD_FACTS.iter().map(|fact| (*fact).to_owned()).collect() }
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.facts.iter().map(String::as_str)
    }

    pub fn contains(&self, fact: &str) -> bool {
        self.iter().any(|known| known == fact)
    }

    /// Picks one fact. The bound handed to the selector is the current set size.
    pub fn pick<S>(&self, selector: &S) -> &str
    where
        S: FactSelector + ?Sized,
    {
        let index = selector.select(self.facts.len()) % self.facts.len();
        &self.facts[index]
    }
}

impl Default for FactSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Source of fact indices. `select(upper)` must return a value in `0..upper`;
/// `upper` is never zero.
pub trait FactSelector: Send + Sync {
    fn select(&self, upper: usize) -> usize;
}

/// Uniform selection backed by the thread-local generator, so concurrent requests
/// never share state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRngSelector;

impl FactSelector for ThreadRngSelector {
    fn select(&self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..upper)
    }
}

/// Reproducible selection for replays and tests.
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl FactSelector for SeededSelector {
    fn select(&self, upper: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..upper)
    }
}

/// Always answers the same index, whatever the bound.
#[cfg(test)]
pub(crate) struct FixedSelector(pub usize);

#[cfg(test)]
impl FactSelector for FixedSelector {
    fn select(&self, _upper: usize) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EmptyFactSet, FactSelector, FactSet, FixedSelector, SeededSelector, ThreadRngSelector,
        STANDARD_FACTS,
    };

    #[test]
    fn standard_facts_are_kept_verbatim() {
        let facts = FactSet::standard();

        assert_eq!(facts.iter().collect::<Vec<_>>(), STANDARD_FACTS.to_vec());
        assert!(facts.contains("A negative number times another negative number is a postive"));
        assert!(STANDARD_FACTS[2].ends_with("1 and itself. "));
    }

    #[test]
    fn empty_and_blank_fact_lists_are_rejected() {
        assert_eq!(FactSet::new(Vec::<String>::new()), Err(EmptyFactSet));
        assert_eq!(FactSet::new(["", "   "]), Err(EmptyFactSet));
    }

    #[test]
    fn facts_are_trimmed_and_keep_their_order() {
        let facts = FactSet::new([" one ", "", "two"]).expect("non-empty");

        assert_eq!(facts.iter().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn pick_uses_the_selected_index() {
        let facts = FactSet::new(["zero", "one", "two"]).expect("non-empty");

        assert_eq!(facts.pick(&FixedSelector(0)), "zero");
        assert_eq!(facts.pick(&FixedSelector(2)), "two");
    }

    #[test]
    fn pick_never_panics_on_a_misbehaving_selector() {
        let facts = FactSet::new(["zero", "one"]).expect("non-empty");

        assert_eq!(facts.pick(&FixedSelector(5)), "one");
    }

    #[test]
    fn selectors_stay_within_the_bound() {
        let seeded = SeededSelector::new(42);
        for upper in 1..20 {
            for _ in 0..50 {
                assert!(ThreadRngSelector.select(upper) < upper);
                assert!(seeded.select(upper) < upper);
            }
        }
    }

    #[test]
    fn seeded_selectors_replay_the_same_sequence() {
        let first = SeededSelector::new(7);
        let second = SeededSelector::new(7);

        let a = (0..32).map(|_| first.select(10)).collect::<Vec<_>>();
        let b = (0..32).map(|_| second.select(10)).collect::<Vec<_>>();

        assert_eq!(a, b);
    }
}
