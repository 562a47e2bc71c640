use std::collections::BTreeMap;

/// Weeks a queued building may sit without progress before it is forfeited.
pub const MAX_DORMANT_WEEKS: u32 = 3;

/// Fraction of the recorded construction cost refunded on demolition,
/// in percent.
pub const DEMOLITION_REFUND_PERCENT: i64 = 15;

/// Immutable catalog entry for one building type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingDefinition {
    building_type: String,
    construction_weeks: u32,
    cost: BTreeMap<String, i64>,
    upkeep: BTreeMap<String, i64>,
    production: BTreeMap<String, i64>,
    /// Maximum concurrent instances of this type, completed plus queued,
    /// before trait overrides.
    max_count: u32,
}

impl BuildingDefinition {
    pub fn new(building_type: &str, construction_weeks: u32, max_count: u32) -> Self {
        Self {
            building_type: building_type.to_string(),
            construction_weeks,
            cost: BTreeMap::new(),
            upkeep: BTreeMap::new(),
            production: BTreeMap::new(),
            max_count,
        }
    }

    pub fn with_cost(mut self, resource: &str, amount: i64) -> Self {
        self.cost.insert(resource.to_string(), amount);
        self
    }

    pub fn with_upkeep(mut self, resource: &str, amount: i64) -> Self {
        self.upkeep.insert(resource.to_string(), amount);
        self
    }

    pub fn with_production(mut self, resource: &str, amount: i64) -> Self {
        self.production.insert(resource.to_string(), amount);
        self
    }

    pub fn building_type(&self) -> &str {
        &self.building_type
    }

    pub fn construction_weeks(&self) -> u32 {
        self.construction_weeks
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    pub fn cost(&self) -> impl Iterator<Item = (&str, i64)> {
        self.cost.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Creates a queue entry with the full construction time remaining.
    pub fn start_constructing(&self, id: &str) -> ConstructingBuilding {
        self.start_constructing_at(id, self.construction_weeks)
    }

    /// Creates a queue entry with an explicit number of weeks remaining
    /// (snapshot restore path).
    pub fn start_constructing_at(&self, id: &str, weeks_remaining: u32) -> ConstructingBuilding {
        ConstructingBuilding {
            id: id.to_string(),
            building_type: self.building_type.clone(),
            cost: self.cost.clone(),
            weeks_remaining: weeks_remaining as i64,
            weeks_since_progress: 0,
        }
    }

    /// Creates a fresh completed building from the catalog definition.
    pub fn build_completed(&self, id: &str) -> Building {
        Building {
            id: id.to_string(),
            building_type: self.building_type.clone(),
            cost: self.cost.clone(),
            upkeep: self.upkeep.clone(),
            production: self.production.clone(),
        }
    }
}

/// Explicitly constructed, immutable building-type lookup table. Passed into
/// the simulation at startup; there is no process-wide catalog.
#[derive(Debug, Clone, Default)]
pub struct BuildingCatalog {
    definitions: BTreeMap<String, BuildingDefinition>,
}

impl BuildingCatalog {
    pub fn new(definitions: impl IntoIterator<Item = BuildingDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|d| (d.building_type.clone(), d))
                .collect(),
        }
    }

    /// The stock three-building table: Farm, Lumbermill, Quarry.
    pub fn standard() -> Self {
        Self::new([
            BuildingDefinition::new("Farm", 2, 10)
                .with_cost("wood", 50)
                .with_cost("stone", 25)
                .with_upkeep("food", 5)
                .with_production("food", 100),
            BuildingDefinition::new("Lumbermill", 3, 5)
                .with_cost("stone", 100)
                .with_cost("wood", 50)
                .with_upkeep("food", 10)
                .with_production("wood", 80),
            BuildingDefinition::new("Quarry", 4, 5)
                .with_cost("wood", 100)
                .with_cost("stone", 50)
                .with_upkeep("food", 10)
                .with_production("stone", 60),
        ])
    }

    pub fn get(&self, building_type: &str) -> Option<&BuildingDefinition> {
        self.definitions.get(building_type)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

/// A building in the construction queue.
///
/// The cost snapshot is kept for refund accounting; the entry is never
/// mutated into a completed [`Building`] — completion builds a fresh one
/// from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructingBuilding {
    id: String,
    building_type: String,
    cost: BTreeMap<String, i64>,
    weeks_remaining: i64,
    weeks_since_progress: u32,
}

impl ConstructingBuilding {
    /// Applies construction progress and clears the dormancy counter.
    /// No-op once complete.
    pub fn advance(&mut self, weeks: i64) {
        if self.weeks_remaining > 0 {
            self.weeks_remaining -= weeks;
            self.weeks_since_progress = 0;
        }
    }

    /// Marks a week in which no progress was applied. Hook for external
    /// interruption events; the weekly pipeline itself always advances.
    pub fn add_dormant_week(&mut self) {
        self.weeks_since_progress += 1;
    }

    /// True once the entry has sat dormant past [`MAX_DORMANT_WEEKS`];
    /// the queue drops it with no refund.
    pub fn is_failed(&self) -> bool {
        self.weeks_since_progress > MAX_DORMANT_WEEKS
    }

    pub fn is_complete(&self) -> bool {
        self.weeks_remaining <= 0
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn building_type(&self) -> &str {
        &self.building_type
    }

    pub fn weeks_remaining(&self) -> i64 {
        self.weeks_remaining
    }

    pub fn weeks_since_progress(&self) -> u32 {
        self.weeks_since_progress
    }
}

/// A completed building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    id: String,
    building_type: String,
    cost: BTreeMap<String, i64>,
    upkeep: BTreeMap<String, i64>,
    production: BTreeMap<String, i64>,
}

impl Building {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn building_type(&self) -> &str {
        &self.building_type
    }

    pub fn upkeep(&self) -> impl Iterator<Item = (&str, i64)> {
        self.upkeep.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn production(&self) -> impl Iterator<Item = (&str, i64)> {
        self.production.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// 15% of the recorded construction cost, per resource, integer floor.
    pub fn demolition_refund(&self) -> Vec<(String, i64)> {
        self.cost
            .iter()
            .map(|(r, amount)| (r.clone(), amount * DEMOLITION_REFUND_PERCENT / 100))
            .collect()
    }
}
