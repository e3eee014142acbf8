use glam::{Vec2, Vec3};
use ocean_scene::asset::{LoadedNode, ModelSummary};
use ocean_scene::motion::{MotionController, MotionSystem, OscillatoryParams};
use ocean_scene::ocean::{MINI_BOAT, PIRATE_BOAT, PIRATE_ORBIT, WHALE, WHALE_SWIM};
use ocean_scene::scene::{NodeId, SceneNode, SceneRegistry, Transform};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn insert(registry: &mut SceneRegistry, id: NodeId, at: Vec3) -> LoadedNode {
    let transform = Transform::from_translation(at);
    registry
        .insert(
            id,
            SceneNode {
                name: format!("node {}", id),
                transform,
                model: ModelSummary::default(),
            },
        )
        .unwrap();
    LoadedNode { id, transform }
}

#[test]
fn orbit_keeps_radius_and_captured_height() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut registry = SceneRegistry::new();
    let mut motion = MotionSystem::new();
    motion.bind(PIRATE_BOAT, MotionController::Orbital(PIRATE_ORBIT));

    let center = Vec3::new(0.0, 20.0, 0.0);
    insert(&mut registry, MINI_BOAT, center);
    let pirate = insert(&mut registry, PIRATE_BOAT, Vec3::new(1500.0, 20.0, 500.0));
    motion.on_node_loaded(&pirate);

    for _ in 0..100 {
        let t: f64 = rng.gen_range(0.0..10_000.0);
        motion.step(&mut registry, t);
        let position = registry.transform(PIRATE_BOAT).unwrap().translation;

        let planar = Vec2::new(position.x - center.x, position.z - center.z).length();
        assert!((planar - 1500.0).abs() < 1e-2, "t={} planar={}", t, planar);
        assert_eq!(position.y, 20.0);
    }
}

#[test]
fn orbit_follows_a_moving_reference() {
    let mut registry = SceneRegistry::new();
    let mut motion = MotionSystem::new();
    motion.bind(PIRATE_BOAT, MotionController::Orbital(PIRATE_ORBIT));

    insert(&mut registry, MINI_BOAT, Vec3::new(0.0, 20.0, 0.0));
    let pirate = insert(&mut registry, PIRATE_BOAT, Vec3::new(1500.0, 20.0, 500.0));
    motion.on_node_loaded(&pirate);

    let moved = Vec3::new(300.0, 20.0, -200.0);
    registry.set_transform(MINI_BOAT, Transform::from_translation(moved));
    motion.step(&mut registry, 0.0);

    let position = registry.transform(PIRATE_BOAT).unwrap().translation;
    assert!((position - Vec3::new(1800.0, 20.0, -200.0)).length() < 1e-3);
}

#[test]
fn whale_stays_inside_its_amplitude_box() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut registry = SceneRegistry::new();
    let mut motion = MotionSystem::new();
    motion.bind(WHALE, MotionController::Oscillatory(WHALE_SWIM));
    insert(&mut registry, WHALE, Vec3::new(400.0, -60.0, 150.0));

    let OscillatoryParams {
        base, amplitude, ..
    } = WHALE_SWIM;
    let lo = base - amplitude.abs();
    let hi = base + amplitude.abs();

    for _ in 0..200 {
        let t: f64 = rng.gen_range(0.0..100_000.0);
        motion.step(&mut registry, t);
        let p = registry.transform(WHALE).unwrap().translation;
        assert!(p.cmpge(lo - 1e-3).all() && p.cmple(hi + 1e-3).all(), "{:?}", p);
        assert_eq!(p.x, 500.0);
    }
}

#[test]
fn controllers_only_touch_their_targets() {
    let mut registry = SceneRegistry::new();
    let mut motion = MotionSystem::new();
    motion.bind(WHALE, MotionController::Oscillatory(WHALE_SWIM));

    let boat_at = Vec3::new(0.0, 20.0, 0.0);
    insert(&mut registry, MINI_BOAT, boat_at);
    insert(&mut registry, WHALE, Vec3::ZERO);

    assert_eq!(motion.step(&mut registry, 12.5), 1);
    assert_eq!(registry.transform(MINI_BOAT).unwrap().translation, boat_at);
}
