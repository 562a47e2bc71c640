use std::collections::BTreeMap;

use super::faction::Faction;

/// Holds every faction plus the symmetric travel-distance table between
/// them. Factions are owned exclusively by the registry; armies and
/// buildings are owned exclusively by their faction.
#[derive(Debug, Clone, Default)]
pub struct FactionRegistry {
    factions: BTreeMap<String, Faction>,
    distances: BTreeMap<(String, String), u32>,
}

impl FactionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, faction: Faction) {
        self.factions.insert(faction.name().to_string(), faction);
    }

    pub fn get(&self, name: &str) -> Option<&Faction> {
        self.factions.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Faction> {
        self.factions.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factions.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Faction> {
        self.factions.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Faction> {
        self.factions.values_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factions.keys().map(String::as_str)
    }

    /// Sets the travel time between two factions, in both directions.
    pub fn set_distance(&mut self, a: &str, b: &str, weeks: u32) {
        self.distances
            .insert((a.to_string(), b.to_string()), weeks);
        self.distances
            .insert((b.to_string(), a.to_string()), weeks);
    }

    pub fn distance(&self, from: &str, to: &str) -> Option<u32> {
        self.distances
            .get(&(from.to_string(), to.to_string()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::faction::FactionKind;

    use super::*;

    #[test]
    fn distances_are_symmetric() {
        let mut registry = FactionRegistry::new();
        registry.register(Faction::new("dwarfs", FactionKind::Frugal));
        registry.register(Faction::new("humans", FactionKind::Fertile));
        registry.set_distance("dwarfs", "humans", 2);
        assert_eq!(registry.distance("dwarfs", "humans"), Some(2));
        assert_eq!(registry.distance("humans", "dwarfs"), Some(2));
        assert_eq!(registry.distance("dwarfs", "ogres"), None);
    }

    #[test]
    fn lookup_by_name() {
        let mut registry = FactionRegistry::new();
        registry.register(Faction::new("ogres", FactionKind::Martial));
        assert!(registry.contains("ogres"));
        assert!(registry.get("ogres").is_some());
        assert!(registry.get("elves").is_none());
    }
}
