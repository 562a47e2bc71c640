pub mod commands;
pub mod config;
pub mod id;
pub mod model;
pub mod save;
pub mod sim;
pub mod testutil;

pub use commands::{CommandError, CommandReport, apply_script};
pub use config::Scenario;
pub use id::IdGenerator;
pub use model::{
    ActionError, Army, ArmyState, Building, BuildingCatalog, BuildingDefinition,
    ConstructingBuilding, Faction, FactionKind, FactionRegistry, ResearchLedger, ResearchResult,
    Resources, TraitDefinition, TraitSet,
};
pub use save::{SaveError, SaveManager, snapshot};
pub use sim::{CombatSignal, FactionRules, resolve_all, resolve_week};
