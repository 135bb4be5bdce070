//! Account pool computation and per-run sampling.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::index;

use crate::core::types::AccountId;
use crate::state::RunState;

/// Configured accounts that are not exhausted, in configured order, without duplicates.
pub fn eligible_accounts(configured: &[AccountId], state: &RunState) -> Vec<AccountId> {
    let mut seen = BTreeSet::new();
    configured
        .iter()
        .filter(|account| !state.is_exhausted(account))
        .filter(|account| seen.insert(account.as_str()))
        .cloned()
        .collect()
}

/// Source of the per-run account sample.
pub trait AccountSampler {
    /// Pick `min(count, pool.len())` distinct accounts; the returned order is the probe order.
    fn sample(&mut self, pool: &[AccountId], count: usize) -> Vec<AccountId>;
}

/// Uniform sampling without replacement backed by a [`Rng`].
pub struct RandomSampler<R> {
    rng: R,
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSampler<rand::rngs::ThreadRng> {
    pub fn from_thread_rng() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> AccountSampler for RandomSampler<R> {
    fn sample(&mut self, pool: &[AccountId], count: usize) -> Vec<AccountId> {
        let amount = count.min(pool.len());
        // `index::sample` returns the chosen indices fully shuffled.
        index::sample(&mut self.rng, pool.len(), amount)
            .into_iter()
            .map(|i| pool[i].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeMap;

    fn ids(raw: &[&str]) -> Vec<AccountId> {
        raw.iter().map(|s| AccountId::new(s)).collect()
    }

    #[test]
    fn eligible_excludes_exhausted_and_duplicates() {
        let mut state = RunState::default();
        state.exhausted_accounts.insert(AccountId::new("b"));
        let pool = eligible_accounts(&ids(&["a", "b", "@a", "c"]), &state);
        assert_eq!(pool, ids(&["a", "c"]));
    }

    #[test]
    fn sample_is_bounded_by_pool_size() {
        let mut sampler = RandomSampler::new(StdRng::seed_from_u64(7));
        let pool = ids(&["a", "b"]);
        let picked = sampler.sample(&pool, 5);
        assert_eq!(picked.len(), 2);
        let unique: BTreeSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn sample_has_no_repeats() {
        let mut sampler = RandomSampler::new(StdRng::seed_from_u64(11));
        let pool = ids(&["a", "b", "c", "d", "e", "f"]);
        for _ in 0..50 {
            let picked = sampler.sample(&pool, 3);
            let unique: BTreeSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), 3);
            assert!(picked.iter().all(|id| pool.contains(id)));
        }
    }

    #[test]
    fn sample_does_not_favor_list_head() {
        let mut sampler = RandomSampler::new(StdRng::seed_from_u64(3));
        let pool = ids(&["a", "b", "c", "d"]);
        let mut first_picks: BTreeMap<AccountId, u32> = BTreeMap::new();
        for _ in 0..4_000 {
            let picked = sampler.sample(&pool, 1);
            *first_picks.entry(picked[0].clone()).or_default() += 1;
        }
        for account in &pool {
            let hits = first_picks.get(account).copied().unwrap_or(0);
            assert!(
                (700..=1300).contains(&hits),
                "{account} picked {hits} times out of 4000"
            );
        }
    }

    #[test]
    fn empty_pool_yields_empty_sample() {
        let mut sampler = RandomSampler::new(StdRng::seed_from_u64(1));
        assert!(sampler.sample(&[], 3).is_empty());
    }
}
