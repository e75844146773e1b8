//! Integration test: Load content -> Outfit characters -> Trade abilities -> Level up
//!
//! This test validates the full flow from bundled content to a resolved duel.

use moba_core::attribute::Attribute;
use moba_core::config::ContentPack;
use moba_core::effect::{EffectContext, Modifier};
use moba_core::events;
use moba_core::inventory::{InventoryError, SlotType};
use moba_core::task::{Projectile, TaskEvent, TaskSet};
use moba_core::types::CharacterId;
use moba_core::Character;
use moba_sim::{default_roster, Combatant, DuelSimulation};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Helper to print a separator
fn separator(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

/// Helper to print a character summary
fn print_character(character: &Character) {
    println!("  {} ({})", character.name, character.id);
    println!(
        "    Health: {:.0}/{:.0}",
        character.get(Attribute::Health),
        character.get(Attribute::MaxHealth)
    );
    println!(
        "    Mana: {:.0}/{:.0}",
        character.get(Attribute::Mana),
        character.get(Attribute::MaxMana)
    );
    println!(
        "    Armor: {:.0} (PDR {:.3})",
        character.get(Attribute::Armor),
        character.get(Attribute::PhysicalDamageReduction)
    );
    println!(
        "    Main hand: {:.0}-{:.0}",
        character.get(Attribute::MainHandMinDamage),
        character.get(Attribute::MainHandMaxDamage)
    );
    for (slot, item) in character.loadout.equipped_items() {
        println!("    [{}] {} (+{} modules)", slot, item.class, item.modules.len());
    }
}

#[test]
fn test_full_duel_flow() {
    separator("Loading content");
    let content = ContentPack::defaults();
    println!(
        "  {} abilities, {} effects, {} items",
        content.abilities.len(),
        content.effects.len(),
        content.items.len()
    );
    assert!(content.validate().is_ok());

    separator("Building roster");
    let roster = default_roster().unwrap();
    let (vanguard, vanguard_abilities) = roster.characters[0]
        .build(CharacterId(1), &content)
        .unwrap();
    let (arcanist, arcanist_abilities) = roster.characters[1]
        .build(CharacterId(2), &content)
        .unwrap();
    print_character(&vanguard);
    print_character(&arcanist);
    assert!(vanguard.get(Attribute::PhysicalDamageReduction) > 0.0);
    assert!(arcanist.get(Attribute::EnvironmentalDamageReduction) > 0.0);

    separator("Fighting");
    let sim = DuelSimulation::new(
        Combatant::new(vanguard, vanguard_abilities),
        Combatant::new(arcanist, arcanist_abilities),
        &content,
        ChaCha8Rng::seed_from_u64(12345),
    );
    let report = sim.run(300.0, 0.1);
    println!("{}", serde_json::to_string_pretty(&report).unwrap());

    assert!(report.duration > 0.0);
    let total: f64 = report.combatants.iter().map(|c| c.damage_dealt).sum();
    assert!(total > 0.0);
    if report.winner.is_some() {
        let dead = report
            .combatants
            .iter()
            .filter(|c| c.health_remaining <= 0.0)
            .count();
        assert_eq!(dead, 1);
    }
}

#[test]
fn test_swap_weapons_mid_fight() {
    let content = ContentPack::defaults();
    let mut hero = Character::new(CharacterId(1), "Hero", &content);
    let blade = hero.give_and_equip("short_blade", SlotType::MainHand).unwrap();
    let knife = hero.give_and_equip("combat_knife", SlotType::OffHand).unwrap();
    let hammer = hero.add_item("warhammer", 1).unwrap()[0];
    print_character(&hero);

    // Hammer into main hand pushes the knife out of the off hand too
    hero.swap_equipment(blade, hammer).unwrap();
    assert!(hero.loadout.equipped(SlotType::OffHand).is_none());
    assert!(hero.loadout.inventory().find(knife).is_some());
    assert!(hero.get(Attribute::OffHandMinDamage).abs() < f64::EPSILON);
    assert!((hero.get(Attribute::MainHandMinDamage) - 34.0).abs() < f64::EPSILON);

    // Knife back into the off hand unseats the hammer
    hero.equip(SlotType::OffHand, knife).unwrap();
    assert!(hero.loadout.equipped(SlotType::MainHand).is_none());
    assert!(hero.get(Attribute::MainHandMinDamage).abs() < f64::EPSILON);
    assert_eq!(
        hero.equip(SlotType::OffHand, hammer),
        Err(InventoryError::WrongSlot)
    );
    print_character(&hero);
}

#[test]
fn test_experience_levels_character() {
    let content = ContentPack::defaults();
    let mut hero = Character::new(CharacterId(1), "Hero", &content);
    let ctx = EffectContext::own(hero.id);
    let mut changes = hero.attributes.subscribe();

    hero.attributes
        .apply_modifier(&Modifier::add(Attribute::Experience, 300.0), &ctx);
    assert_eq!(hero.attributes.level(), 2);
    assert!((hero.get(Attribute::Experience) - 20.0).abs() < f64::EPSILON);
    assert!((hero.get(Attribute::MaxExperience) - 380.0).abs() < f64::EPSILON);

    let seen: Vec<_> = events::drain(&mut changes)
        .into_iter()
        .map(|c| c.attribute)
        .collect();
    assert!(seen.contains(&Attribute::Level));
    assert!(seen.contains(&Attribute::Experience));
}

#[test]
fn test_projectile_lands_after_flight() {
    let content = ContentPack::defaults();
    let mut rng = ChaCha8Rng::seed_from_u64(12345);
    let caster = Character::new(CharacterId(1), "Caster", &content);
    let mut target = Character::new(CharacterId(2), "Target", &content);
    target.position = glam::DVec3::new(600.0, 0.0, 0.0);

    let bolt = content.abilities.get("searing_bolt").unwrap();
    let spec = caster.create_spec(bolt, target.id, &mut rng);
    let speed = bolt.projectile_speed.unwrap();
    let mut projectile = Projectile::launch(caster.position, target.id, speed);
    let mut tasks = TaskSet::new(bolt.id.clone());
    tasks.wait_for_projectile_hit(projectile.id);

    let mut ticks = 0;
    while !projectile.advance(target.position, 0.1) {
        ticks += 1;
    }
    // 600 units at 1200/s
    assert_eq!(ticks, 4);

    let fired = tasks.on_projectile_destroyed(projectile.id);
    assert!(matches!(fired[0], TaskEvent::ProjectileHit { .. }));
    let before = target.get(Attribute::Health);
    target.receive(&spec);
    // 90 + 0.8 × SpellPower 0
    assert!((before - target.get(Attribute::Health) - 90.0).abs() < 1e-9);
}
