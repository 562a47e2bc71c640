use crate::model::{Army, Faction, FactionKind};

/// Per-kind formula overrides for the weekly pipeline.
///
/// Small capability interface instead of an inheritance tree: the default
/// methods are the standard formulas, each variant overrides only the
/// constant or calculation it bends. Kinds and traits are independent
/// override points — a kind changes constants, traits add offsets.
pub trait FactionRules {
    /// Divisor applied to (population + army population) for the weekly
    /// food need.
    fn consumption_divisor(&self) -> i64 {
        2
    }

    /// Divisor in the growth multiplier term `1 + (pop/divisor)/pop`.
    fn growth_divisor(&self) -> f64 {
        4.0
    }

    /// Weekly food consumption with starvation. The need is reduced by the
    /// flat `populationConsumptionModifier` trait offset and floored at
    /// zero; a shortfall empties the granary and starves population
    /// directly, floored at zero.
    fn consume_food(&self, faction: &mut Faction) {
        let need = ((faction.population() + faction.army_population()) / self.consumption_divisor()
            - faction.traits().population_consumption_offset())
        .max(0);
        let food = faction.resources().food();
        if food < need {
            let shortfall = need - food;
            faction.resources_mut().set_food(0);
            faction.set_population(faction.population() - shortfall);
        } else {
            faction.resources_mut().subtract("food", need);
        }
    }

    /// Weekly growth, gated on post-consumption food >= population.
    /// surplus = food - population; the surplus contribution is scaled by
    /// the faction's surplus modifier, the whole by the growth multiplier
    /// (plus the `populationGrowthModifier` trait rate), truncated toward
    /// zero.
    fn apply_population_growth(&self, faction: &mut Faction) {
        let pop = faction.population();
        let food = faction.resources().food();
        if pop <= 0 || food < pop {
            return;
        }
        let surplus = (food - pop) as f64;
        let multiplier = 1.0
            + (pop as f64 / self.growth_divisor()) / pop as f64
            + faction.traits().population_growth_rate();
        let grown = (pop as f64 + surplus * faction.surplus_modifier()) * multiplier;
        faction.set_population(grown as i64);
    }

    /// Aggregate combat strength: sum of army might.
    fn calculate_might(&self, faction: &Faction) -> i64 {
        faction.armies().map(Army::might).sum()
    }
}

/// Standard formulas, no overrides.
#[derive(Debug, Clone, Copy)]
pub struct StandardRules;

impl FactionRules for StandardRules {}

/// Eats less: consumption divisor 3 instead of 2.
#[derive(Debug, Clone, Copy)]
pub struct FrugalRules;

impl FactionRules for FrugalRules {
    fn consumption_divisor(&self) -> i64 {
        3
    }
}

/// Grows faster: growth divisor 3 instead of 4.
#[derive(Debug, Clone, Copy)]
pub struct FertileRules;

impl FactionRules for FertileRules {
    fn growth_divisor(&self) -> f64 {
        3.0
    }
}

/// Counts double on the field: every army's might contributes twice.
#[derive(Debug, Clone, Copy)]
pub struct MartialRules;

impl FactionRules for MartialRules {
    fn calculate_might(&self, faction: &Faction) -> i64 {
        faction.armies().map(|a| a.might() * 2).sum()
    }
}

/// Strategy table keyed by faction kind.
pub fn rules_for(kind: FactionKind) -> &'static dyn FactionRules {
    match kind {
        FactionKind::Standard => &StandardRules,
        FactionKind::Frugal => &FrugalRules,
        FactionKind::Fertile => &FertileRules,
        FactionKind::Martial => &MartialRules,
    }
}
