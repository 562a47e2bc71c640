//! Pure precondition checks over faction state.
//!
//! Every mutation operation on [`Faction`] runs the matching check before
//! touching anything, so a failed validation is guaranteed to leave state
//! unchanged. The command interpreter reuses the same checks for verbs
//! that need pre-flight answers.

use super::army::Army;
use super::building::BuildingCatalog;
use super::faction::{ActionError, Faction};

pub fn can_create_army(faction: &Faction, name: &str, population: i64) -> Result<(), ActionError> {
    if population <= 0 {
        return Err(ActionError::NonPositiveAmount(population));
    }
    if population > faction.population() {
        return Err(ActionError::InsufficientPopulation {
            needed: population,
            available: faction.population(),
        });
    }
    let id = Army::new(name, population).id().to_string();
    if faction.army(&id).is_some() {
        return Err(ActionError::ArmyExists(id));
    }
    Ok(())
}

pub fn can_reinforce_army(faction: &Faction, id: &str, amount: i64) -> Result<(), ActionError> {
    if amount <= 0 {
        return Err(ActionError::NonPositiveAmount(amount));
    }
    if amount > faction.population() {
        return Err(ActionError::InsufficientPopulation {
            needed: amount,
            available: faction.population(),
        });
    }
    let army = faction
        .army(id)
        .ok_or_else(|| ActionError::ArmyNotFound(id.to_string()))?;
    if !army.is_alive() {
        return Err(ActionError::ArmyDestroyed(id.to_string()));
    }
    Ok(())
}

pub fn can_queue_building(
    faction: &Faction,
    building_type: &str,
    catalog: &BuildingCatalog,
) -> Result<(), ActionError> {
    let def = catalog
        .get(building_type)
        .ok_or_else(|| ActionError::UnknownBuildingType(building_type.to_string()))?;

    let limit = faction.effective_max_concurrent_buildings();
    if faction.queue_len() >= limit {
        return Err(ActionError::QueueFull { limit });
    }

    let type_cap =
        def.max_count() as i64 + faction.traits().max_building_type_limit(building_type);
    if faction.building_type_count(building_type) >= type_cap {
        return Err(ActionError::BuildingTypeCapReached {
            building_type: building_type.to_string(),
            limit: type_cap,
        });
    }

    for (resource, amount) in def.cost() {
        if !faction.resources().has(resource, amount) {
            return Err(ActionError::InsufficientResources {
                resource: resource.to_string(),
                needed: amount,
                available: faction.resources().get(resource),
            });
        }
    }
    Ok(())
}

pub fn can_use_action_points(faction: &Faction, amount: i64) -> Result<(), ActionError> {
    if faction.used_action_points() + amount > faction.action_points() {
        return Err(ActionError::InsufficientActionPoints {
            needed: amount,
            available: faction.action_points() - faction.used_action_points(),
        });
    }
    Ok(())
}

/// An attack needs a living army; the interpreter separately resolves the
/// target faction and travel distance against the registry.
pub fn can_attack(faction: &Faction, army_id: &str) -> Result<(), ActionError> {
    let army = faction
        .army(army_id)
        .ok_or_else(|| ActionError::ArmyNotFound(army_id.to_string()))?;
    if !army.is_alive() {
        return Err(ActionError::ArmyDestroyed(army_id.to_string()));
    }
    Ok(())
}

/// Demolition always succeeds for an id that exists.
pub fn can_demolish_building(faction: &Faction, id: &str) -> Result<(), ActionError> {
    if faction.building(id).is_none() {
        return Err(ActionError::BuildingNotFound(id.to_string()));
    }
    Ok(())
}
