mod pipeline;
mod rules;
mod signal;

pub use pipeline::{resolve_all, resolve_week};
pub use rules::{FactionRules, FertileRules, FrugalRules, MartialRules, StandardRules, rules_for};
pub use signal::CombatSignal;
