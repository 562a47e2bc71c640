use std::collections::BTreeMap;

/// Display metadata for a trait: how it is shown in snapshots and which
/// category it contributes to in the per-category summation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitDefinition {
    pub display_name: String,
    pub description: String,
    pub category: String,
}

impl TraitDefinition {
    pub fn new(display_name: &str, description: &str, category: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
        }
    }
}

/// Per-faction additive modifiers keyed by name.
///
/// Traits are read-only inputs to every formula in the weekly pipeline; the
/// pipeline never mutates them. `add_trait` accumulates, `set_trait`
/// replaces (and drops the trait entirely at values <= 0).
///
/// The two population modifiers deliberately use different readings:
/// `populationConsumptionModifier` is a flat point offset subtracted from
/// the weekly food need, while `populationGrowthModifier` is a rate, scaled
/// by 0.01 into the growth multiplier. Both are exposed as named accessors
/// so neither reading is applied by accident.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitSet {
    values: BTreeMap<String, i64>,
    definitions: BTreeMap<String, TraitDefinition>,
}

impl TraitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds to the trait's accumulated value, keeping any prior definition.
    pub fn add_trait(&mut self, name: &str, value: i64) {
        *self.values.entry(name.to_string()).or_insert(0) += value;
    }

    pub fn add_trait_with(&mut self, name: &str, value: i64, definition: TraitDefinition) {
        self.add_trait(name, value);
        self.definitions.insert(name.to_string(), definition);
    }

    /// Replaces the trait's value. A value <= 0 removes the trait and its
    /// definition.
    pub fn set_trait(&mut self, name: &str, value: i64) {
        if value <= 0 {
            self.values.remove(name);
            self.definitions.remove(name);
        } else {
            self.values.insert(name.to_string(), value);
        }
    }

    pub fn set_trait_with(&mut self, name: &str, value: i64, definition: TraitDefinition) {
        self.set_trait(name, value);
        if value > 0 {
            self.definitions.insert(name.to_string(), definition);
        }
    }

    pub fn remove_trait(&mut self, name: &str) {
        self.values.remove(name);
        self.definitions.remove(name);
    }

    pub fn get(&self, name: &str) -> i64 {
        self.values.get(name).copied().unwrap_or(0)
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn definition(&self, name: &str) -> Option<&TraitDefinition> {
        self.definitions.get(name)
    }

    /// All traits in sorted name order.
    pub fn all(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // ------------------------------------------------------------------
    // Named formula inputs
    // ------------------------------------------------------------------

    /// Sum of every `actionPoints` contribution.
    pub fn action_points_total(&self) -> i64 {
        self.get("actionPoints")
    }

    pub fn max_concurrent_buildings_bonus(&self) -> i64 {
        self.get("maxConcurrentBuildings")
    }

    pub fn max_building_type_limit(&self, building_type: &str) -> i64 {
        self.get(&format!("maxBuildingType_{building_type}"))
    }

    /// Flat point offset subtracted from the weekly food need.
    pub fn population_consumption_offset(&self) -> i64 {
        self.get("populationConsumptionModifier")
    }

    /// Rate added to the growth multiplier: trait value scaled by 0.01.
    pub fn population_growth_rate(&self) -> f64 {
        self.get("populationGrowthModifier") as f64 * 0.01
    }

    pub fn resource_production_modifier(&self, resource: &str) -> i64 {
        self.get(&format!("resourceProduction_{resource}"))
    }

    pub fn resource_consumption_modifier(&self, resource: &str) -> i64 {
        self.get(&format!("resourceConsumption_{resource}"))
    }

    /// Fixed might modifier stamped onto armies at creation time. Later
    /// trait changes do not reach armies already in the field.
    pub fn army_might_bonus(&self) -> i64 {
        self.get("armyMightBonus")
    }

    /// Category -> summed value over traits that carry a definition, in
    /// first-seen category order.
    pub fn category_totals(&self) -> Vec<(String, i64)> {
        let mut order: Vec<String> = Vec::new();
        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for (name, value) in &self.values {
            if let Some(def) = self.definitions.get(name) {
                if !totals.contains_key(&def.category) {
                    order.push(def.category.clone());
                }
                *totals.entry(def.category.clone()).or_insert(0) += value;
            }
        }
        order.into_iter().map(|c| (c.clone(), totals[&c])).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_trait_accumulates() {
        let mut t = TraitSet::new();
        t.add_trait("actionPoints", 3);
        t.add_trait("actionPoints", 2);
        assert_eq!(t.action_points_total(), 5);
    }

    #[test]
    fn set_trait_replaces() {
        let mut t = TraitSet::new();
        t.add_trait("actionPoints", 3);
        t.set_trait("actionPoints", 7);
        assert_eq!(t.get("actionPoints"), 7);
    }

    #[test]
    fn set_trait_nonpositive_removes() {
        let mut t = TraitSet::new();
        t.add_trait("armyMightBonus", 10);
        t.set_trait("armyMightBonus", 0);
        assert!(!t.has("armyMightBonus"));
        assert_eq!(t.army_might_bonus(), 0);
    }

    #[test]
    fn consumption_offset_is_flat_points() {
        let mut t = TraitSet::new();
        t.add_trait("populationConsumptionModifier", 50);
        assert_eq!(t.population_consumption_offset(), 50);
    }

    #[test]
    fn growth_modifier_is_a_rate() {
        let mut t = TraitSet::new();
        t.add_trait("populationGrowthModifier", 5);
        assert!((t.population_growth_rate() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn per_type_building_limit_uses_suffixed_name() {
        let mut t = TraitSet::new();
        t.add_trait("maxBuildingType_Farm", 2);
        assert_eq!(t.max_building_type_limit("Farm"), 2);
        assert_eq!(t.max_building_type_limit("Quarry"), 0);
    }

    #[test]
    fn category_totals_sum_defined_traits() {
        let mut t = TraitSet::new();
        t.add_trait_with(
            "actionPoints",
            5,
            TraitDefinition::new("Industrious", "Extra weekly actions", "economy"),
        );
        t.add_trait_with(
            "resourceProduction_food",
            10,
            TraitDefinition::new("Green Thumbs", "Better harvests", "economy"),
        );
        t.add_trait("armyMightBonus", 99); // no definition, no category
        assert_eq!(t.category_totals(), vec![("economy".to_string(), 15)]);
    }
}
