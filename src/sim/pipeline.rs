use std::collections::VecDeque;

use crate::model::{ArmyState, BuildingCatalog, Faction, FactionRegistry};

use super::rules::rules_for;
use super::signal::CombatSignal;

/// Runs one faction's weekly resolution: the fixed, order-dependent
/// economic sequence. Combat signals for armies that reached their target
/// are pushed into `signals`; resolving the combat itself is the caller's
/// job.
///
/// Order matters: starvation precedes the food/population penalty, which
/// precedes growth. A faction cannot both starve and grow in the same
/// resolution, and growth is gated on the post-consumption food level.
pub fn resolve_week(
    faction: &mut Faction,
    catalog: &BuildingCatalog,
    signals: &mut Vec<CombatSignal>,
) {
    let rules = rules_for(faction.kind());

    // 1. Action points recompute
    faction.action_points = faction.traits().action_points_total();
    faction.used_action_points = 0;

    // 2. Food consumption (starvation on shortfall)
    rules.consume_food(faction);

    // 3. Food/population penalty
    apply_food_penalty(faction);

    // 4. Construction queue advance
    advance_queue(faction, catalog);

    // 5. Building production
    let production: Vec<(String, i64)> = faction
        .buildings()
        .flat_map(|b| b.production().map(|(r, base)| (r.to_string(), base)))
        .collect();
    for (resource, base) in production {
        let amount = (base + faction.traits().resource_production_modifier(&resource)).max(0);
        faction.resources_mut().add(&resource, amount);
    }

    // 6. Building upkeep
    let upkeep: Vec<(String, i64)> = faction
        .buildings()
        .flat_map(|b| b.upkeep().map(|(r, base)| (r.to_string(), base)))
        .collect();
    for (resource, base) in upkeep {
        let amount = (base + faction.traits().resource_consumption_modifier(&resource)).max(0);
        faction.resources_mut().subtract(&resource, amount);
    }

    // 7. Army processing
    process_armies(faction, signals);

    // 8. Might recompute
    faction.might = rules.calculate_might(faction);

    // 9. Population growth
    rules.apply_population_growth(faction);

    // 10. Terminal guard: used points end the week at zero
    faction.used_action_points = 0;
}

/// Resolves the week for every faction in the registry, sequentially, and
/// returns the collected combat signals.
pub fn resolve_all(registry: &mut FactionRegistry, catalog: &BuildingCatalog) -> Vec<CombatSignal> {
    let mut signals = Vec::new();
    for faction in registry.iter_mut() {
        resolve_week(faction, catalog, &mut signals);
    }
    signals
}

/// Step 3: if food < population, population shrinks by the fractional
/// shortfall, truncated toward zero. With an empty granary this zeroes the
/// population outright.
fn apply_food_penalty(faction: &mut Faction) {
    let pop = faction.population();
    let food = faction.resources().food();
    if pop > 0 && food < pop {
        let factor = 1.0 - (pop - food) as f64 / pop as f64;
        faction.set_population((pop as f64 * factor) as i64);
    }
}

/// Step 4: dormant-failed entries are dropped without refund, everything
/// else advances one week, and finished entries are promoted to fresh
/// catalog-built buildings.
fn advance_queue(faction: &mut Faction, catalog: &BuildingCatalog) {
    let entries = std::mem::take(faction.queue_mut());
    let mut kept = VecDeque::new();
    for mut entry in entries {
        if entry.is_failed() {
            tracing::warn!(
                building = entry.id(),
                weeks_dormant = entry.weeks_since_progress(),
                "construction abandoned, no refund"
            );
            continue;
        }
        entry.advance(1);
        if entry.is_complete() {
            match catalog.get(entry.building_type()) {
                Some(def) => {
                    let id = faction.fresh_building_id(entry.building_type());
                    faction.install_building(def.build_completed(&id));
                }
                None => {
                    tracing::warn!(
                        building_type = entry.building_type(),
                        "completed building has no catalog entry, dropping"
                    );
                }
            }
        } else {
            kept.push_back(entry);
        }
    }
    *faction.queue_mut() = kept;
}

/// Step 7: attacking armies travel and signal on arrival; retreating
/// armies travel home and stand down at the end of the road.
fn process_armies(faction: &mut Faction, signals: &mut Vec<CombatSignal>) {
    let faction_name = faction.name().to_string();
    for army in faction.armies_mut() {
        match army.state() {
            ArmyState::Attacking => {
                army.advance_travel();
                if army.has_reached_target() {
                    if let Some(target) = army.target_faction() {
                        signals.push(CombatSignal {
                            attacker_faction: faction_name.clone(),
                            army_id: army.id().to_string(),
                            target_faction: target.to_string(),
                        });
                    }
                }
            }
            ArmyState::Retreating => {
                army.advance_travel();
                if army.travel_weeks_remaining() == 0 {
                    army.set_state(ArmyState::Defending);
                }
            }
            ArmyState::Defending | ArmyState::Idle => {}
        }
    }
}
