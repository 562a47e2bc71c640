use std::collections::{BTreeMap, VecDeque};

use rand::RngCore;
use serde::Deserialize;
use thiserror::Error;

use crate::id::IdGenerator;

use super::army::Army;
use super::building::{Building, BuildingCatalog, ConstructingBuilding};
use super::research::{ResearchLedger, resolve_outcome};
use super::resources::Resources;
use super::traits::TraitSet;
use super::validate;

/// Default cap on concurrently queued buildings, before trait bonuses.
pub const DEFAULT_MAX_CONCURRENT_BUILDINGS: u32 = 3;

/// Selects which formula overrides apply to a faction (consumption divisor,
/// growth divisor, might calculation). Kinds are an override point
/// independent of traits: a kind changes constants, traits add offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionKind {
    /// Consumption divisor 2, growth divisor 4, might = sum of army might.
    #[default]
    Standard,
    /// Eats less: consumption divisor 3.
    Frugal,
    /// Grows faster: growth divisor 3.
    Fertile,
    /// Counts double on the field: might = 2 x sum of army might.
    Martial,
}

/// A validated rejection: the precondition failed and no state was mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),
    #[error("not enough population: need {needed}, have {available}")]
    InsufficientPopulation { needed: i64, available: i64 },
    #[error("not enough {resource}: need {needed}, have {available}")]
    InsufficientResources {
        resource: String,
        needed: i64,
        available: i64,
    },
    #[error("not enough action points: need {needed}, have {available}")]
    InsufficientActionPoints { needed: i64, available: i64 },
    #[error("army not found: {0}")]
    ArmyNotFound(String),
    #[error("army already exists: {0}")]
    ArmyExists(String),
    #[error("army is destroyed: {0}")]
    ArmyDestroyed(String),
    #[error("unknown building type: {0}")]
    UnknownBuildingType(String),
    #[error("construction queue is full ({limit} concurrent)")]
    QueueFull { limit: usize },
    #[error("building type {building_type} is at its cap of {limit}")]
    BuildingTypeCapReached { building_type: String, limit: i64 },
    #[error("building not found: {0}")]
    BuildingNotFound(String),
    #[error("target faction not found: {0}")]
    FactionNotFound(String),
    #[error("no distance set between {from} and {to}")]
    DistanceUnknown { from: String, to: String },
    #[error("investment must be non-negative, got {0}")]
    NegativeInvestment(i64),
}

/// One simulated civilization: population, resources, armies, buildings,
/// research, and the trait set that bends every weekly formula.
///
/// All mutation goes through the validated operations below; each either
/// applies fully or returns an [`ActionError`] with nothing changed.
#[derive(Debug, Clone)]
pub struct Faction {
    name: String,
    kind: FactionKind,
    pub(crate) population: i64,
    pub(crate) action_points: i64,
    pub(crate) used_action_points: i64,
    pub(crate) might: i64,
    pub(crate) resources: Resources,
    traits: TraitSet,
    armies: BTreeMap<String, Army>,
    buildings: BTreeMap<String, Building>,
    queue: VecDeque<ConstructingBuilding>,
    base_max_concurrent_buildings: u32,
    research: ResearchLedger,
    features: String,
    /// Fraction of the food surplus converted into growth each week.
    surplus_modifier: f64,
    id_gen: IdGenerator,
}

impl Faction {
    pub fn new(name: &str, kind: FactionKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            population: 0,
            action_points: 0,
            used_action_points: 0,
            might: 0,
            resources: Resources::new(),
            traits: TraitSet::new(),
            armies: BTreeMap::new(),
            buildings: BTreeMap::new(),
            queue: VecDeque::new(),
            base_max_concurrent_buildings: DEFAULT_MAX_CONCURRENT_BUILDINGS,
            research: ResearchLedger::new(),
            features: String::new(),
            surplus_modifier: 0.1,
            id_gen: IdGenerator::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FactionKind {
        self.kind
    }

    pub fn population(&self) -> i64 {
        self.population
    }

    pub fn set_population(&mut self, population: i64) {
        self.population = population.max(0);
    }

    pub fn action_points(&self) -> i64 {
        self.action_points
    }

    pub fn used_action_points(&self) -> i64 {
        self.used_action_points
    }

    pub fn might(&self) -> i64 {
        self.might
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn traits(&self) -> &TraitSet {
        &self.traits
    }

    pub fn traits_mut(&mut self) -> &mut TraitSet {
        &mut self.traits
    }

    pub fn armies(&self) -> impl Iterator<Item = &Army> {
        self.armies.values()
    }

    pub fn army(&self, id: &str) -> Option<&Army> {
        self.armies.get(id)
    }

    pub fn army_mut(&mut self, id: &str) -> Option<&mut Army> {
        self.armies.get_mut(id)
    }

    pub(crate) fn armies_mut(&mut self) -> impl Iterator<Item = &mut Army> {
        self.armies.values_mut()
    }

    pub fn army_population(&self) -> i64 {
        self.armies.values().map(Army::population).sum()
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings.get(id)
    }

    pub fn queue(&self) -> impl Iterator<Item = &ConstructingBuilding> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn research(&self) -> &ResearchLedger {
        &self.research
    }

    pub fn research_mut(&mut self) -> &mut ResearchLedger {
        &mut self.research
    }

    pub fn features(&self) -> &str {
        &self.features
    }

    pub fn set_features(&mut self, features: &str) {
        self.features = features.to_string();
    }

    pub fn surplus_modifier(&self) -> f64 {
        self.surplus_modifier
    }

    pub fn set_surplus_modifier(&mut self, modifier: f64) {
        self.surplus_modifier = modifier;
    }

    /// Queue capacity after the `maxConcurrentBuildings` trait bonus.
    pub fn effective_max_concurrent_buildings(&self) -> usize {
        let bonus = self.traits.max_concurrent_buildings_bonus();
        (self.base_max_concurrent_buildings as i64 + bonus).max(0) as usize
    }

    /// Completed plus queued instances of one building type.
    pub fn building_type_count(&self, building_type: &str) -> i64 {
        let completed = self
            .buildings
            .values()
            .filter(|b| b.building_type() == building_type)
            .count();
        let queued = self
            .queue
            .iter()
            .filter(|c| c.building_type() == building_type)
            .count();
        (completed + queued) as i64
    }

    // ------------------------------------------------------------------
    // Army operations
    // ------------------------------------------------------------------

    /// Raises a new army from the faction's population. The army's might
    /// modifier is stamped from the `armyMightBonus` trait at this moment
    /// and never re-read.
    pub fn create_army(&mut self, name: &str, population: i64) -> Result<String, ActionError> {
        validate::can_create_army(self, name, population)?;
        let mut army = Army::new(name, population);
        army.set_might_modifier(self.traits.army_might_bonus());
        self.population -= population;
        let id = army.id().to_string();
        self.armies.insert(id.clone(), army);
        Ok(id)
    }

    /// Moves population into an existing army. Over-reinforcement past the
    /// faction's spare population is rejected with nothing changed.
    pub fn reinforce_army(&mut self, id: &str, amount: i64) -> Result<(), ActionError> {
        validate::can_reinforce_army(self, id, amount)?;
        let army = self
            .armies
            .get_mut(id)
            .ok_or_else(|| ActionError::ArmyNotFound(id.to_string()))?;
        army.reinforce(amount);
        self.population -= amount;
        Ok(())
    }

    /// Folds the acting army's entire population into another army of the
    /// same faction, then deletes the actor.
    pub fn merge_army(&mut self, actor_id: &str, target_id: &str) -> Result<(), ActionError> {
        if !self.armies.contains_key(target_id) {
            return Err(ActionError::ArmyNotFound(target_id.to_string()));
        }
        let actor = self
            .armies
            .remove(actor_id)
            .ok_or_else(|| ActionError::ArmyNotFound(actor_id.to_string()))?;
        if let Some(target) = self.armies.get_mut(target_id) {
            target.reinforce(actor.population());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Building operations
    // ------------------------------------------------------------------

    /// Queues a building: the cost is deducted now, the entry enters the
    /// back of the FIFO queue with its full construction time.
    pub fn queue_building(
        &mut self,
        building_type: &str,
        catalog: &BuildingCatalog,
    ) -> Result<String, ActionError> {
        validate::can_queue_building(self, building_type, catalog)?;
        let def = catalog
            .get(building_type)
            .ok_or_else(|| ActionError::UnknownBuildingType(building_type.to_string()))?;

        for (resource, amount) in def.cost() {
            self.resources.subtract(resource, amount);
        }
        let id = self.id_gen.building_id(building_type);
        self.queue.push_back(def.start_constructing(&id));
        Ok(id)
    }

    /// Moves a queue entry to the back, by id.
    pub fn postpone_building(&mut self, id: &str) -> Result<(), ActionError> {
        let pos = self
            .queue
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| ActionError::BuildingNotFound(id.to_string()))?;
        if let Some(entry) = self.queue.remove(pos) {
            self.queue.push_back(entry);
        }
        Ok(())
    }

    /// Tears down a completed building, refunding 15% of its recorded
    /// construction cost. Succeeds for any existing id.
    pub fn demolish_building(&mut self, id: &str) -> Result<(), ActionError> {
        validate::can_demolish_building(self, id)?;
        let building = self
            .buildings
            .remove(id)
            .ok_or_else(|| ActionError::BuildingNotFound(id.to_string()))?;
        for (resource, amount) in building.demolition_refund() {
            self.resources.add(&resource, amount);
        }
        Ok(())
    }

    /// Restore path: inserts a completed building without cost or checks.
    pub(crate) fn install_building(&mut self, building: Building) {
        self.buildings.insert(building.id().to_string(), building);
    }

    /// Restore path: appends a queue entry without cost or checks.
    pub(crate) fn install_constructing(&mut self, entry: ConstructingBuilding) {
        self.queue.push_back(entry);
    }

    pub(crate) fn fresh_building_id(&mut self, building_type: &str) -> String {
        self.id_gen.building_id(building_type)
    }

    pub(crate) fn queue_mut(&mut self) -> &mut VecDeque<ConstructingBuilding> {
        &mut self.queue
    }

    // ------------------------------------------------------------------
    // Research
    // ------------------------------------------------------------------

    /// Spends action points on a research field, accumulating progress and
    /// rolling this week's outcome.
    pub fn invest_research(
        &mut self,
        field: &str,
        invested_ap: i64,
        rng: &mut dyn RngCore,
    ) -> Result<(), ActionError> {
        if invested_ap < 0 {
            return Err(ActionError::NegativeInvestment(invested_ap));
        }
        if invested_ap > 0 {
            validate::can_use_action_points(self, invested_ap)?;
        }
        self.used_action_points += invested_ap;
        self.research.add_progress(field, invested_ap);
        let outcome = resolve_outcome(rng, invested_ap);
        self.research.record_result(field, outcome);
        Ok(())
    }

    // ------------------------------------------------------------------
    // External interruption hook
    // ------------------------------------------------------------------

    /// Marks every queued building as dormant for one week. The weekly
    /// pipeline never calls this; it exists for external interruption
    /// events (a siege, a canceled supply line) that freeze construction.
    pub fn record_dormant_week(&mut self) {
        for entry in &mut self.queue {
            entry.add_dormant_week();
        }
    }
}
