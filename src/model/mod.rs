pub mod army;
pub mod building;
pub mod faction;
pub mod registry;
pub mod research;
pub mod resources;
pub mod traits;
pub mod validate;

pub use army::{Army, ArmyState};
pub use building::{
    Building, BuildingCatalog, BuildingDefinition, ConstructingBuilding, MAX_DORMANT_WEEKS,
};
pub use faction::{ActionError, Faction, FactionKind};
pub use registry::FactionRegistry;
pub use research::{ResearchLedger, ResearchResult, resolve_outcome};
pub use resources::Resources;
pub use traits::{TraitDefinition, TraitSet};
