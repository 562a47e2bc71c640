//! Shared scaffolding for integration tests.

use crate::model::{BuildingCatalog, Faction, FactionKind, FactionRegistry};

/// A faction with the given population and food, nothing else.
pub fn faction(name: &str, kind: FactionKind, population: i64, food: i64) -> Faction {
    let mut f = Faction::new(name, kind);
    f.set_population(population);
    f.resources_mut().set_food(food);
    f
}

/// A faction that can afford several buildings.
pub fn stocked_faction(name: &str, kind: FactionKind) -> Faction {
    let mut f = faction(name, kind, 1000, 2000);
    f.resources_mut().set("wood", 1000);
    f.resources_mut().set("stone", 1000);
    f
}

/// Two factions three weeks apart, with the standard catalog.
pub fn two_faction_registry() -> (FactionRegistry, BuildingCatalog) {
    let mut registry = FactionRegistry::new();
    registry.register(stocked_faction("dwarfs", FactionKind::Frugal));
    registry.register(stocked_faction("ogres", FactionKind::Martial));
    registry.set_distance("dwarfs", "ogres", 3);
    (registry, BuildingCatalog::standard())
}
