use std::collections::BTreeMap;

use rand::{Rng, RngCore};

const BASE_SUCCESS_CHANCE: i64 = 50;
const BASE_BREAKTHROUGH_CHANCE: i64 = 5;

/// Outcome of one week's research investment in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchResult {
    Failure,
    Discovery,
    Breakthrough,
}

impl ResearchResult {
    pub fn display_name(&self) -> &'static str {
        match self {
            ResearchResult::Failure => "Failure",
            ResearchResult::Discovery => "Discovery",
            ResearchResult::Breakthrough => "Breakthrough",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        match name {
            "Failure" => Some(ResearchResult::Failure),
            "Discovery" => Some(ResearchResult::Discovery),
            "Breakthrough" => Some(ResearchResult::Breakthrough),
            _ => None,
        }
    }
}

/// Rolls a research outcome for the given investment.
///
/// Two-stage trial: success chance = clamp(50 + invested, 0, 100) against a
/// uniform 1..=100 roll; on success a second roll against
/// clamp(5 + invested, 0, 100) decides Breakthrough vs. Discovery. The
/// outcome is independent of any accumulated progress.
pub fn resolve_outcome(rng: &mut dyn RngCore, invested_ap: i64) -> ResearchResult {
    let success_chance = (BASE_SUCCESS_CHANCE + invested_ap).clamp(0, 100);
    let roll: i64 = rng.random_range(1..=100);
    if roll > success_chance {
        return ResearchResult::Failure;
    }

    let breakthrough_chance = (BASE_BREAKTHROUGH_CHANCE + invested_ap).clamp(0, 100);
    let breakthrough_roll: i64 = rng.random_range(1..=100);
    if breakthrough_roll <= breakthrough_chance {
        ResearchResult::Breakthrough
    } else {
        ResearchResult::Discovery
    }
}

/// Per-field progress accumulation plus the most recent result per field.
/// Progress is unbounded; only the latest result is kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchLedger {
    progress: BTreeMap<String, i64>,
    results: BTreeMap<String, ResearchResult>,
}

impl ResearchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_progress(&mut self, field: &str, amount: i64) {
        *self.progress.entry(field.to_string()).or_insert(0) += amount;
    }

    pub fn progress(&self, field: &str) -> i64 {
        self.progress.get(field).copied().unwrap_or(0)
    }

    pub fn record_result(&mut self, field: &str, result: ResearchResult) {
        self.results.insert(field.to_string(), result);
    }

    pub fn last_result(&self, field: &str) -> Option<ResearchResult> {
        self.results.get(field).copied()
    }

    /// Latest results in sorted field order.
    pub fn results(&self) -> impl Iterator<Item = (&str, ResearchResult)> {
        self.results.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn progress_accumulates_unbounded() {
        let mut ledger = ResearchLedger::new();
        ledger.add_progress("alchemy", 3);
        ledger.add_progress("alchemy", 4);
        assert_eq!(ledger.progress("alchemy"), 7);
        assert_eq!(ledger.progress("smithing"), 0);
    }

    #[test]
    fn only_latest_result_is_kept() {
        let mut ledger = ResearchLedger::new();
        ledger.record_result("alchemy", ResearchResult::Failure);
        ledger.record_result("alchemy", ResearchResult::Discovery);
        assert_eq!(ledger.last_result("alchemy"), Some(ResearchResult::Discovery));
    }

    #[test]
    fn huge_investment_guarantees_breakthrough() {
        // Both chances clamp to 100, so every roll succeeds.
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(resolve_outcome(&mut rng, 100), ResearchResult::Breakthrough);
        }
    }

    #[test]
    fn negative_clamp_guarantees_failure() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(resolve_outcome(&mut rng, -100), ResearchResult::Failure);
        }
    }

    #[test]
    fn display_names_round_trip() {
        for r in [
            ResearchResult::Failure,
            ResearchResult::Discovery,
            ResearchResult::Breakthrough,
        ] {
            assert_eq!(ResearchResult::from_display_name(r.display_name()), Some(r));
        }
        assert_eq!(ResearchResult::from_display_name("Fiasco"), None);
    }
}
