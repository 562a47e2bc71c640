//! Weekly command script interpreter.
//!
//! Consumes a batch of whitespace/comma-delimited lines, resolves targets
//! against the registry, validates, and applies mutations. Failures are
//! per-line: each one is logged and counted, and the rest of the batch
//! keeps going. The batch must run to completion before the week's
//! economic resolution.

use rand::RngCore;
use thiserror::Error;

use crate::model::{ActionError, ArmyState, BuildingCatalog, FactionRegistry, validate};

/// Why a single command line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{verb} requires {expected}")]
    MissingArgs {
        verb: &'static str,
        expected: &'static str,
    },
    #[error("not a number: {0}")]
    InvalidNumber(String),
    #[error("unknown command: {0}")]
    UnknownVerb(String),
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Outcome of one script batch: how many lines applied, how many failed,
/// and the formatted warnings that were logged along the way.
#[derive(Debug, Default)]
pub struct CommandReport {
    pub applied: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
}

impl CommandReport {
    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

/// Applies a weekly command script to the registry. Blank lines and
/// `#` comments are skipped; a `FACTION <name>` line sets the acting
/// faction for the lines after it. An unknown faction name suppresses
/// every command until the next context switch.
pub fn apply_script(
    script: &str,
    registry: &mut FactionRegistry,
    catalog: &BuildingCatalog,
    rng: &mut dyn RngCore,
) -> CommandReport {
    let mut report = CommandReport::default();
    let mut context: Option<String> = None;

    for raw in script.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        // a line of pure delimiters tokenizes to nothing
        let Some(&verb) = parts.first() else {
            continue;
        };

        if verb == "FACTION" {
            match parts.get(1) {
                Some(name) if registry.contains(name) => {
                    context = Some((*name).to_string());
                }
                Some(name) => {
                    report.warn(format!("faction not found: {name}"));
                    context = None;
                }
                None => {
                    report.warn("FACTION requires a name".to_string());
                    context = None;
                }
            }
            continue;
        }

        let Some(faction_name) = context.as_deref() else {
            continue;
        };

        match dispatch(&parts, faction_name, registry, catalog, rng) {
            Ok(()) => report.applied += 1,
            Err(err) => {
                report.failed += 1;
                report.warn(format!("error processing command: {line} - {err}"));
            }
        }
    }

    report
}

fn dispatch(
    parts: &[&str],
    faction_name: &str,
    registry: &mut FactionRegistry,
    catalog: &BuildingCatalog,
    rng: &mut dyn RngCore,
) -> Result<(), CommandError> {
    match parts[0] {
        "ARMY_CREATE" => {
            let (name, amount) = two_args(parts, "ARMY_CREATE", "name and amount")?;
            let amount = parse_number(amount)?;
            let faction = faction_mut(registry, faction_name)?;
            faction.create_army(name, amount)?;
            Ok(())
        }
        "ARMY_ATTACK" => {
            let (army_id, target) = two_args(parts, "ARMY_ATTACK", "army and target faction")?;
            if !registry.contains(target) {
                return Err(ActionError::FactionNotFound(target.to_string()).into());
            }
            let distance = registry.distance(faction_name, target).ok_or_else(|| {
                ActionError::DistanceUnknown {
                    from: faction_name.to_string(),
                    to: target.to_string(),
                }
            })?;
            let faction = faction_mut(registry, faction_name)?;
            validate::can_attack(faction, army_id)?;
            if let Some(army) = faction.army_mut(army_id) {
                army.set_target(target, distance);
            }
            Ok(())
        }
        "ARMY_PROTECT" => {
            let (army_id, target) = two_args(parts, "ARMY_PROTECT", "army and target")?;
            // A faction target means "stand guard"; an own-army target
            // merges the actor into it.
            if registry.contains(target) {
                let faction = faction_mut(registry, faction_name)?;
                let army = faction
                    .army_mut(army_id)
                    .ok_or_else(|| ActionError::ArmyNotFound(army_id.to_string()))?;
                army.set_state(ArmyState::Defending);
            } else {
                let faction = faction_mut(registry, faction_name)?;
                faction.merge_army(army_id, target)?;
            }
            Ok(())
        }
        "ARMY_RETREAT" => {
            let army_id = one_arg(parts, "ARMY_RETREAT", "an army")?;
            let faction = faction_mut(registry, faction_name)?;
            let army = faction
                .army_mut(army_id)
                .ok_or_else(|| ActionError::ArmyNotFound(army_id.to_string()))?;
            army.retreat();
            Ok(())
        }
        "BUILDING_CONSTRUCT" => {
            let building_type = one_arg(parts, "BUILDING_CONSTRUCT", "a building type")?;
            let faction = faction_mut(registry, faction_name)?;
            faction.queue_building(building_type, catalog)?;
            Ok(())
        }
        "BUILDING_DEMOLISH" => {
            let id = one_arg(parts, "BUILDING_DEMOLISH", "a building id")?;
            let faction = faction_mut(registry, faction_name)?;
            faction.demolish_building(id)?;
            Ok(())
        }
        "BUILDING_POSTPONE" => {
            let id = one_arg(parts, "BUILDING_POSTPONE", "a building id")?;
            let faction = faction_mut(registry, faction_name)?;
            faction.postpone_building(id)?;
            Ok(())
        }
        "RESEARCH" => {
            let field = one_arg(parts, "RESEARCH", "a field name")?;
            let invested = match parts.get(2) {
                Some(raw) => parse_number(raw)?,
                None => 1,
            };
            let faction = faction_mut(registry, faction_name)?;
            faction.invest_research(field, invested, rng)?;
            Ok(())
        }
        verb => Err(CommandError::UnknownVerb(verb.to_string())),
    }
}

fn faction_mut<'a>(
    registry: &'a mut FactionRegistry,
    name: &str,
) -> Result<&'a mut crate::model::Faction, CommandError> {
    registry
        .get_mut(name)
        .ok_or_else(|| ActionError::FactionNotFound(name.to_string()).into())
}

fn one_arg<'a>(
    parts: &[&'a str],
    verb: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    parts
        .get(1)
        .copied()
        .ok_or(CommandError::MissingArgs { verb, expected })
}

fn two_args<'a>(
    parts: &[&'a str],
    verb: &'static str,
    expected: &'static str,
) -> Result<(&'a str, &'a str), CommandError> {
    match (parts.get(1), parts.get(2)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(CommandError::MissingArgs { verb, expected }),
    }
}

fn parse_number(raw: &str) -> Result<i64, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::model::{Faction, FactionKind};

    use super::*;

    fn registry() -> FactionRegistry {
        let mut registry = FactionRegistry::new();
        let mut dwarfs = Faction::new("dwarfs", FactionKind::Frugal);
        dwarfs.set_population(1000);
        dwarfs.resources_mut().set("wood", 500);
        dwarfs.resources_mut().set("stone", 500);
        let mut ogres = Faction::new("ogres", FactionKind::Martial);
        ogres.set_population(500);
        registry.register(dwarfs);
        registry.register(ogres);
        registry.set_distance("dwarfs", "ogres", 3);
        registry
    }

    #[test]
    fn faction_context_scopes_commands() {
        let mut r = registry();
        let catalog = BuildingCatalog::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        let script = "FACTION dwarfs\nARMY_CREATE Vanguard 200\nFACTION ogres\nARMY_CREATE Maw 100\n";
        let report = apply_script(script, &mut r, &catalog, &mut rng);
        assert_eq!(report.applied, 2);
        assert_eq!(report.failed, 0);
        assert!(r.get("dwarfs").unwrap().army("vanguard").is_some());
        assert!(r.get("ogres").unwrap().army("maw").is_some());
    }

    #[test]
    fn unknown_faction_suppresses_until_next_switch() {
        let mut r = registry();
        let catalog = BuildingCatalog::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        let script = "FACTION elves\nARMY_CREATE Ghosts 100\nFACTION dwarfs\nARMY_CREATE Vanguard 200\n";
        let report = apply_script(script, &mut r, &catalog, &mut rng);
        assert_eq!(report.applied, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(r.get("dwarfs").unwrap().army("vanguard").is_some());
    }

    #[test]
    fn failing_line_does_not_stop_the_batch() {
        let mut r = registry();
        let catalog = BuildingCatalog::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        let script = "\
FACTION dwarfs
ARMY_CREATE Horde 99999
BUILDING_CONSTRUCT Ziggurat
BUILDING_CONSTRUCT Farm
";
        let report = apply_script(script, &mut r, &catalog, &mut rng);
        assert_eq!(report.applied, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(r.get("dwarfs").unwrap().queue_len(), 1);
    }

    #[test]
    fn attack_requires_known_target_and_distance() {
        let mut r = registry();
        r.register(Faction::new("trolls", FactionKind::Standard));
        let catalog = BuildingCatalog::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        let script = "\
FACTION dwarfs
ARMY_CREATE Vanguard 200
ARMY_ATTACK vanguard elves
ARMY_ATTACK vanguard trolls
ARMY_ATTACK vanguard ogres
";
        let report = apply_script(script, &mut r, &catalog, &mut rng);
        // elves: unknown faction; trolls: no distance set; ogres: fine
        assert_eq!(report.applied, 2);
        assert_eq!(report.failed, 2);
        let army = r.get("dwarfs").unwrap().army("vanguard").unwrap();
        assert_eq!(army.state(), ArmyState::Attacking);
        assert_eq!(army.target_faction(), Some("ogres"));
        assert_eq!(army.travel_weeks_remaining(), 3);
    }

    #[test]
    fn protect_merges_into_own_army_or_defends() {
        let mut r = registry();
        let catalog = BuildingCatalog::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        let script = "\
FACTION dwarfs
ARMY_CREATE Alpha 200
ARMY_CREATE Bravo 300
ARMY_PROTECT alpha bravo
ARMY_PROTECT bravo dwarfs
";
        let report = apply_script(script, &mut r, &catalog, &mut rng);
        assert_eq!(report.failed, 0);
        let dwarfs = r.get("dwarfs").unwrap();
        assert!(dwarfs.army("alpha").is_none());
        let bravo = dwarfs.army("bravo").unwrap();
        assert_eq!(bravo.population(), 500);
        assert_eq!(bravo.state(), ArmyState::Defending);
    }

    #[test]
    fn delimiter_only_lines_are_skipped() {
        let mut r = registry();
        let catalog = BuildingCatalog::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        let script = "FACTION dwarfs\n,\n , ,\nARMY_CREATE Vanguard 100\n";
        let report = apply_script(script, &mut r, &catalog, &mut rng);
        assert_eq!(report.applied, 1);
        assert_eq!(report.failed, 0);
        assert!(r.get("dwarfs").unwrap().army("vanguard").is_some());
    }

    #[test]
    fn comma_and_whitespace_tokens_both_work() {
        let mut r = registry();
        let catalog = BuildingCatalog::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        let script = "FACTION dwarfs\nARMY_CREATE, Vanguard, 200\n# a comment\n\n";
        let report = apply_script(script, &mut r, &catalog, &mut rng);
        assert_eq!(report.applied, 1);
        assert_eq!(r.get("dwarfs").unwrap().army("vanguard").unwrap().population(), 200);
    }

    #[test]
    fn research_charges_the_weekly_budget() {
        let mut r = registry();
        let catalog = BuildingCatalog::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        {
            let dwarfs = r.get_mut("dwarfs").unwrap();
            dwarfs.traits_mut().add_trait("actionPoints", 4);
            crate::sim::resolve_week(dwarfs, &catalog, &mut Vec::new());
        }
        let script = "FACTION dwarfs\nRESEARCH smithing 3\nRESEARCH smithing 3\nRESEARCH alchemy\n";
        let report = apply_script(script, &mut r, &catalog, &mut rng);
        // 3 AP spent, second 3 exceeds the budget of 4, then 1 more fits
        assert_eq!(report.applied, 2);
        assert_eq!(report.failed, 1);
        let dwarfs = r.get("dwarfs").unwrap();
        assert_eq!(dwarfs.used_action_points(), 4);
        assert_eq!(dwarfs.research().progress("smithing"), 3);
        assert_eq!(dwarfs.research().progress("alchemy"), 1);
    }
}
