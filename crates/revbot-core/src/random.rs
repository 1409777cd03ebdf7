//! Reviewer selection.

use std::sync::{Mutex, PoisonError};

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use revbot_config::Config;

/// Random source for reviewer selection.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
pub trait ReviewerPicker: Send + Sync {
    /// Pick up to `count` distinct entries of `candidates`, uniformly at random.
    fn pick(&self, candidates: &[String], count: usize) -> Vec<String>;
}

/// [`ReviewerPicker`] backed by a seeded ChaCha generator.
///
/// Two pickers built from the same seed produce the same picks for the same
/// sequence of calls.
pub struct SeededReviewerPicker {
    rng: Mutex<ChaCha8Rng>,
}

impl SeededReviewerPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.random_seed)
    }
}

impl ReviewerPicker for SeededReviewerPicker {
    fn pick(&self, candidates: &[String], count: usize) -> Vec<String> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        candidates
            .choose_multiple(&mut *rng, count)
            .cloned()
            .collect()
    }
}
