//! Scenario configuration: the initial economic parameters and the
//! pairwise travel-distance table the simulation consumes at startup.
//!
//! A missing or malformed scenario is fatal — no faction can run without
//! its base data.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{Faction, FactionKind, FactionRegistry, TraitDefinition};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read scenario: {0}")]
    Io(#[from] io::Error),
    #[error("malformed scenario: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Initial value of one faction trait, with optional display metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct TraitSetup {
    pub name: String,
    pub value: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// One faction's starting state.
#[derive(Debug, Clone, Deserialize)]
pub struct FactionSetup {
    pub name: String,
    #[serde(default)]
    pub kind: FactionKind,
    pub population: i64,
    #[serde(default)]
    pub food: i64,
    #[serde(default)]
    pub wood: i64,
    #[serde(default)]
    pub stone: i64,
    #[serde(default = "default_surplus_modifier")]
    pub surplus_modifier: f64,
    #[serde(default)]
    pub traits: Vec<TraitSetup>,
}

fn default_surplus_modifier() -> f64 {
    0.1
}

/// Symmetric travel time between two factions, in weeks.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceSetup {
    pub from: String,
    pub to: String,
    pub weeks: u32,
}

/// A complete startup scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub factions: Vec<FactionSetup>,
    #[serde(default)]
    pub distances: Vec<DistanceSetup>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Builds the faction registry this scenario describes.
    pub fn build(&self) -> FactionRegistry {
        let mut registry = FactionRegistry::new();
        for setup in &self.factions {
            let mut faction = Faction::new(&setup.name, setup.kind);
            faction.set_population(setup.population);
            faction.resources_mut().set_food(setup.food);
            faction.resources_mut().set("wood", setup.wood);
            faction.resources_mut().set("stone", setup.stone);
            faction.set_surplus_modifier(setup.surplus_modifier);
            for t in &setup.traits {
                match &t.display_name {
                    Some(display_name) => faction.traits_mut().add_trait_with(
                        &t.name,
                        t.value,
                        TraitDefinition::new(
                            display_name,
                            t.description.as_deref().unwrap_or(""),
                            t.category.as_deref().unwrap_or(""),
                        ),
                    ),
                    None => faction.traits_mut().add_trait(&t.name, t.value),
                }
            }
            registry.register(faction);
        }
        for d in &self.distances {
            registry.set_distance(&d.from, &d.to, d.weeks);
        }
        registry
    }
}
