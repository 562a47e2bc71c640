//! Per-faction save snapshot: a fixed line-oriented text layout.
//!
//! Rendering is deterministic (sorted iteration everywhere), so saving the
//! same state twice produces byte-identical output. Parsing is
//! section-scoped: a line of only letters ending in `:` closes the current
//! section, and blank, bracketed, and `--` lines are separators ignored
//! everywhere except inside Features. Aggregate counts round-trip;
//! building and army identities deliberately do not — reload synthesizes
//! fresh ids.

use std::collections::BTreeMap;

use crate::model::{BuildingCatalog, Faction, ResearchResult};

/// Placeholder written when a faction has no features text yet.
pub const FEATURES_PLACEHOLDER: &str = "[Space for manual faction features and quirks]";

/// Renders one faction's weekly snapshot.
pub fn render(faction: &Faction) -> String {
    let mut out = String::new();

    out.push_str(faction.name());
    out.push('\n');
    out.push_str(&format!("Population={}\n", faction.population()));
    out.push_str(&format!("ActionPoints={}\n", faction.action_points()));
    out.push('\n');

    out.push_str("Traits:\n");
    if faction.traits().is_empty() {
        out.push_str("  None\n");
    } else {
        for (name, value) in faction.traits().all() {
            match faction.traits().definition(name) {
                Some(def) => out.push_str(&format!(
                    "  {}: {} [{}={}]\n",
                    def.display_name, def.description, name, value
                )),
                None => out.push_str(&format!("  {name} [{name}={value}]\n")),
            }
        }
        for (category, total) in faction.traits().category_totals() {
            out.push_str(&format!("  -- {category}: {total}\n"));
        }
    }
    out.push('\n');

    out.push_str("Resources:\n");
    for (resource, amount) in faction.resources().amounts() {
        out.push_str(&format!("  {resource}={amount}\n"));
    }
    out.push('\n');

    out.push_str("Armies:\n");
    if faction.armies().count() == 0 {
        out.push_str("  None\n");
    } else {
        for army in faction.armies() {
            out.push_str(&format!(
                "  {}: {} soldiers, {} might, {}\n",
                army.name(),
                army.population(),
                army.might(),
                army.state()
            ));
        }
    }
    out.push('\n');

    out.push_str("Buildings:\n");
    let mut building_counts: BTreeMap<&str, u32> = BTreeMap::new();
    for building in faction.buildings() {
        *building_counts.entry(building.building_type()).or_insert(0) += 1;
    }
    if building_counts.is_empty() {
        out.push_str("  None\n");
    } else {
        let line = building_counts
            .iter()
            .map(|(ty, count)| format!("{ty} {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("  {line}\n"));
    }
    out.push('\n');

    out.push_str("Constructing:\n");
    let mut constructing: BTreeMap<&str, (u32, i64)> = BTreeMap::new();
    for entry in faction.queue() {
        let slot = constructing.entry(entry.building_type()).or_insert((0, 0));
        slot.0 += 1;
        slot.1 = entry.weeks_remaining();
    }
    if constructing.is_empty() {
        out.push_str("  None\n");
    } else {
        let line = constructing
            .iter()
            .map(|(ty, (count, weeks))| format!("{ty} {count} ({weeks} weeks)"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("  {line}\n"));
    }
    out.push('\n');

    out.push_str("Research:\n");
    if !faction.research().has_results() {
        out.push_str("  None\n");
    } else {
        for (field, result) in faction.research().results() {
            out.push_str(&format!("  {field}: {}\n", result.display_name()));
        }
    }
    out.push('\n');

    out.push_str("Features:\n");
    if faction.features().is_empty() {
        out.push_str(&format!("  {FEATURES_PLACEHOLDER}\n"));
    } else {
        for line in faction.features().lines() {
            out.push_str(&format!("  {line}\n"));
        }
    }

    out
}

/// Which snapshot section the parser is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Traits,
    Resources,
    Armies,
    Buildings,
    Constructing,
    Research,
    Features,
    /// A letters-plus-colon line we do not recognize still closes the
    /// current section; its content is skipped.
    Other,
}

/// True for lines of only ASCII letters ending in a colon — the exact
/// section-closing rule other tooling depends on.
fn is_section_line(line: &str) -> bool {
    line.strip_suffix(':')
        .is_some_and(|name| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Applies a snapshot to a freshly constructed faction of the same kind.
///
/// Restores population, resources, traits (via the bracketed `key=value`
/// token), building and constructing counts by type, research results, and
/// features. Army records are not restored — the format only keeps their
/// display line. Malformed integers and unknown building types are skipped
/// with a warning, never propagated.
pub fn apply(faction: &mut Faction, text: &str, catalog: &BuildingCatalog) {
    let mut section = Section::Header;
    let mut buildings_line = String::new();
    let mut constructing_line = String::new();
    let mut features = String::new();

    for raw in text.lines() {
        let line = raw.trim();

        if line.is_empty() || line.starts_with('[') || line.starts_with("--") {
            // The placeholder sentinel is itself a bracketed line; keeping
            // it would turn empty features into literal sentinel text.
            if section == Section::Features && !line.is_empty() && line != FEATURES_PLACEHOLDER {
                features.push_str(line);
                features.push('\n');
            }
            continue;
        }

        if is_section_line(line) {
            section = match line {
                "Traits:" => Section::Traits,
                "Resources:" => Section::Resources,
                "Armies:" => Section::Armies,
                "Buildings:" => Section::Buildings,
                "Constructing:" => Section::Constructing,
                "Research:" => Section::Research,
                "Features:" => Section::Features,
                _ => Section::Other,
            };
            continue;
        }

        match section {
            Section::Header | Section::Resources => {
                if let Some((key, value)) = line.split_once('=') {
                    apply_key_value(faction, key.trim(), value.trim());
                }
            }
            Section::Traits => {
                if line != "None" {
                    apply_trait_line(faction, line);
                }
            }
            Section::Buildings => {
                if line != "None" {
                    buildings_line = line.to_string();
                }
            }
            Section::Constructing => {
                if line != "None" {
                    constructing_line = line.to_string();
                }
            }
            Section::Research => {
                if line != "None" {
                    apply_research_line(faction, line);
                }
            }
            Section::Features => {
                if line != FEATURES_PLACEHOLDER {
                    features.push_str(line);
                    features.push('\n');
                }
            }
            Section::Armies | Section::Other => {}
        }
    }

    apply_buildings(faction, &buildings_line, catalog);
    apply_constructing(faction, &constructing_line, catalog);

    let features = features.trim_end();
    if !features.is_empty() {
        faction.set_features(features);
    }
}

fn apply_key_value(faction: &mut Faction, key: &str, value: &str) {
    let Ok(amount) = value.parse::<i64>() else {
        tracing::warn!(key, value, "unparseable snapshot value, skipping");
        return;
    };
    match key.to_lowercase().as_str() {
        "population" => faction.set_population(amount),
        // recomputed from traits every week
        "actionpoints" => {}
        resource => faction.resources_mut().set(resource, amount),
    }
}

/// Trait lines carry their machine token in brackets:
/// `Display Name: description [traitName=value]`.
fn apply_trait_line(faction: &mut Faction, line: &str) {
    let Some(open) = line.find('[') else {
        return;
    };
    let Some(close) = line[open..].find(']') else {
        return;
    };
    let token = &line[open + 1..open + close];
    let Some((name, value)) = token.split_once('=') else {
        return;
    };
    let Ok(value) = value.trim().parse::<i64>() else {
        tracing::warn!(line, "unparseable trait value, skipping");
        return;
    };
    // add_trait rather than set_trait: set_trait drops values <= 0, and
    // negative overrides are valid state that must survive the reload
    faction.traits_mut().add_trait(name.trim(), value);
}

fn apply_research_line(faction: &mut Faction, line: &str) {
    let Some((field, result)) = line.split_once(':') else {
        return;
    };
    match ResearchResult::from_display_name(result.trim()) {
        Some(result) => faction.research_mut().record_result(field.trim(), result),
        None => tracing::warn!(line, "unknown research result, skipping"),
    }
}

fn apply_buildings(faction: &mut Faction, line: &str, catalog: &BuildingCatalog) {
    if line.is_empty() {
        return;
    }
    for entry in line.split(',') {
        let mut parts = entry.split_whitespace();
        let (Some(building_type), Some(count)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(count) = count.parse::<u32>() else {
            tracing::warn!(entry, "unparseable building count, skipping");
            continue;
        };
        let Some(def) = catalog.get(building_type) else {
            tracing::warn!(building_type, "unknown building type in snapshot, skipping");
            continue;
        };
        for _ in 0..count {
            let id = faction.fresh_building_id(building_type);
            faction.install_building(def.build_completed(&id));
        }
    }
}

fn apply_constructing(faction: &mut Faction, line: &str, catalog: &BuildingCatalog) {
    if line.is_empty() {
        return;
    }
    for entry in line.split(',') {
        let entry = entry.trim();
        let mut parts = entry.split_whitespace();
        let (Some(building_type), Some(count)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(count) = count.parse::<u32>() else {
            tracing::warn!(entry, "unparseable constructing count, skipping");
            continue;
        };
        let weeks = entry
            .find('(')
            .and_then(|open| entry[open..].find(')').map(|close| (open, open + close)))
            .map(|(open, close)| {
                entry[open + 1..close]
                    .chars()
                    .filter(char::is_ascii_digit)
                    .collect::<String>()
            })
            .and_then(|digits| digits.parse::<u32>().ok())
            .unwrap_or(0);
        let Some(def) = catalog.get(building_type) else {
            tracing::warn!(building_type, "unknown building type in snapshot, skipping");
            continue;
        };
        for _ in 0..count {
            let id = faction.fresh_building_id(building_type);
            faction.install_constructing(def.start_constructing_at(&id, weeks));
        }
    }
}
