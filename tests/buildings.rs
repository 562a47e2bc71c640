//! Construction lifecycle driven through the command interpreter.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use faction_sim::testutil::two_faction_registry;
use faction_sim::{apply_script, resolve_all};

#[test]
fn construct_command_through_completion() {
    let (mut registry, catalog) = two_faction_registry();
    let mut rng = SmallRng::seed_from_u64(3);

    let report = apply_script(
        "FACTION dwarfs\nBUILDING_CONSTRUCT Farm\n",
        &mut registry,
        &catalog,
        &mut rng,
    );
    assert_eq!(report.applied, 1);
    // cost comes out at queue time
    let dwarfs = registry.get("dwarfs").unwrap();
    assert_eq!(dwarfs.resources().get("wood"), 950);
    assert_eq!(dwarfs.resources().get("stone"), 975);
    assert_eq!(dwarfs.queue_len(), 1);

    resolve_all(&mut registry, &catalog);
    assert_eq!(registry.get("dwarfs").unwrap().buildings().count(), 0);
    resolve_all(&mut registry, &catalog);

    let dwarfs = registry.get("dwarfs").unwrap();
    assert_eq!(dwarfs.queue_len(), 0);
    assert_eq!(dwarfs.building_type_count("Farm"), 1);
    // wood and stone are untouched by the farm's food-only economy
    assert_eq!(dwarfs.resources().get("wood"), 950);
    assert_eq!(dwarfs.resources().get("stone"), 975);
}

#[test]
fn demolish_command_refunds_recorded_cost() {
    let (mut registry, catalog) = two_faction_registry();
    let mut rng = SmallRng::seed_from_u64(3);

    apply_script(
        "FACTION dwarfs\nBUILDING_CONSTRUCT Farm\n",
        &mut registry,
        &catalog,
        &mut rng,
    );
    resolve_all(&mut registry, &catalog);
    resolve_all(&mut registry, &catalog);
    let id = registry
        .get("dwarfs")
        .unwrap()
        .buildings()
        .next()
        .unwrap()
        .id()
        .to_string();

    let script = format!("FACTION dwarfs\nBUILDING_DEMOLISH {id}\n");
    let report = apply_script(&script, &mut registry, &catalog, &mut rng);
    assert_eq!(report.applied, 1);

    let dwarfs = registry.get("dwarfs").unwrap();
    assert_eq!(dwarfs.buildings().count(), 0);
    // 15% of wood 50 and stone 25, floored
    assert_eq!(dwarfs.resources().get("wood"), 957);
    assert_eq!(dwarfs.resources().get("stone"), 978);
}

#[test]
fn postpone_command_sends_entry_to_the_back() {
    let (mut registry, catalog) = two_faction_registry();
    let mut rng = SmallRng::seed_from_u64(3);

    apply_script(
        "FACTION dwarfs\nBUILDING_CONSTRUCT Farm\nBUILDING_CONSTRUCT Lumbermill\n",
        &mut registry,
        &catalog,
        &mut rng,
    );
    let first = registry
        .get("dwarfs")
        .unwrap()
        .queue()
        .next()
        .unwrap()
        .id()
        .to_string();

    let script = format!("FACTION dwarfs\nBUILDING_POSTPONE {first}\n");
    let report = apply_script(&script, &mut registry, &catalog, &mut rng);
    assert_eq!(report.failed, 0);

    let order: Vec<String> = registry
        .get("dwarfs")
        .unwrap()
        .queue()
        .map(|c| c.building_type().to_string())
        .collect();
    assert_eq!(order, vec!["Lumbermill".to_string(), "Farm".to_string()]);
}

#[test]
fn queue_capacity_raised_by_trait() {
    let (mut registry, catalog) = two_faction_registry();
    let mut rng = SmallRng::seed_from_u64(3);
    registry
        .get_mut("dwarfs")
        .unwrap()
        .traits_mut()
        .add_trait("maxConcurrentBuildings", 2);

    let script = "FACTION dwarfs\n".to_string() + &"BUILDING_CONSTRUCT Farm\n".repeat(6);
    let report = apply_script(&script, &mut registry, &catalog, &mut rng);
    assert_eq!(report.applied, 5);
    assert_eq!(report.failed, 1);
    assert_eq!(registry.get("dwarfs").unwrap().queue_len(), 5);
}

#[test]
fn type_cap_spans_queue_and_completed() {
    let (mut registry, catalog) = two_faction_registry();
    let mut rng = SmallRng::seed_from_u64(3);
    registry
        .get_mut("dwarfs")
        .unwrap()
        .traits_mut()
        .add_trait("maxBuildingType_Farm", -8);

    let script = "FACTION dwarfs\n".to_string() + &"BUILDING_CONSTRUCT Farm\n".repeat(3);
    let report = apply_script(&script, &mut registry, &catalog, &mut rng);
    assert_eq!(report.applied, 2);
    assert_eq!(report.failed, 1);

    // completion does not free headroom: the cap counts finished farms too
    resolve_all(&mut registry, &catalog);
    resolve_all(&mut registry, &catalog);
    assert_eq!(registry.get("dwarfs").unwrap().building_type_count("Farm"), 2);
    let report = apply_script(
        "FACTION dwarfs\nBUILDING_CONSTRUCT Farm\n",
        &mut registry,
        &catalog,
        &mut rng,
    );
    assert_eq!(report.failed, 1);
}
