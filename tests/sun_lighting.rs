mod common;

use std::sync::Arc;

use common::{RecordingBackend, StubSource};
use glam::Vec3;
use ocean_scene::config::ConfigEvent;
use ocean_scene::environment::EnvironmentLighting;
use ocean_scene::scheduler::OceanScene;
use ocean_scene::settings::OceanSettings;
use ocean_scene::sky::SkyParameters;
use ocean_scene::water::WaterSurfaceState;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const EPSILON: f32 = 1e-5;

fn assert_vec3_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).abs().max_element() < EPSILON,
        "{:?} != {:?}",
        actual,
        expected
    );
}

#[test]
fn sampled_sun_directions_are_unit_and_shared() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut lighting = EnvironmentLighting::new(SkyParameters::default(), 2.0, 180.0);
    let mut water = WaterSurfaceState::default();
    let mut backend = RecordingBackend::default();

    for _ in 0..200 {
        let elevation = rng.gen_range(0.0..=90.0);
        let azimuth = rng.gen_range(-180.0..=180.0);
        let sun = lighting.update_sun(elevation, azimuth, &mut water, &mut backend);

        assert!((sun.direction().length() - 1.0).abs() < EPSILON);
        assert_eq!(lighting.sky_uniform().sun_position(), sun.direction());
        assert!((water.sun_direction().length() - 1.0).abs() < EPSILON);
        assert_vec3_near(water.sun_direction(), sun.direction());
    }
}

#[test]
fn each_update_replaces_exactly_one_map() {
    let mut lighting = EnvironmentLighting::new(SkyParameters::default(), 2.0, 180.0);
    let mut water = WaterSurfaceState::default();
    let mut backend = RecordingBackend::default();

    let updates = 12;
    for i in 0..updates {
        lighting.update_sun(i as f32 * 7.0, -90.0 + i as f32 * 15.0, &mut water, &mut backend);
        assert_eq!(backend.live.len(), 1);
    }

    assert_eq!(backend.baked, updates);
    assert_eq!(backend.released, updates - 1);
    assert_eq!(lighting.regenerations(), updates as u64);

    lighting.release(&mut backend);
    assert!(backend.live.is_empty());
    assert!(lighting.reflection_map().is_none());
}

#[test]
fn out_of_range_angles_are_clamped() {
    let mut lighting = EnvironmentLighting::new(SkyParameters::default(), 2.0, 180.0);
    let mut water = WaterSurfaceState::default();
    let mut backend = RecordingBackend::default();

    let sun = lighting.update_sun(135.0, 270.0, &mut water, &mut backend);
    assert_eq!(sun.elevation(), 90.0);
    assert_eq!(sun.azimuth(), 180.0);
    assert_vec3_near(sun.direction(), Vec3::Y);

    let sun = lighting.update_sun(f32::NAN, -500.0, &mut water, &mut backend);
    assert_eq!(sun.elevation(), 90.0);
    assert_eq!(sun.azimuth(), -180.0);
}

#[test]
fn golden_startup_snapshot() {
    let settings = OceanSettings::default();
    let mut scene = OceanScene::new(&settings, Arc::new(StubSource));
    let mut backend = RecordingBackend::default();

    let sun = scene.startup(&mut backend);
    assert_vec3_near(sun.direction(), Vec3::new(0.0, 0.0348995, -0.9993908));

    let water = scene.water().uniform();
    assert_vec3_near(
        Vec3::from(water.sun_direction),
        Vec3::new(0.0, 0.0348995, -0.9993908),
    );
    assert!((water.distortion_scale - 3.7).abs() < EPSILON);
    assert_eq!(water.size, 1.0);
    assert_eq!(water.time, 0.0);
    assert_eq!(water.alpha, 1.0);
    assert_vec3_near(Vec3::from(water.sun_color), Vec3::ONE);
    assert_vec3_near(
        Vec3::from(water.water_color),
        Vec3::new(0.1946178, 0.5583404, 0.6866853),
    );

    let sky = scene.lighting().sky_uniform();
    assert_eq!(sky.turbidity, 10.0);
    assert_eq!(sky.rayleigh, 2.0);
    assert_eq!(sky.mie_coefficient, 0.005);
    assert_eq!(sky.mie_directional_g, 0.8);
}

#[test]
fn water_settings_do_not_touch_lighting() {
    let mut scene = OceanScene::new(&OceanSettings::default(), Arc::new(StubSource));
    let mut backend = RecordingBackend::default();
    scene.startup(&mut backend);

    scene.apply_config(ConfigEvent::DistortionScale(12.0), &mut backend);
    scene.apply_config(ConfigEvent::Size(0.5), &mut backend);
    assert_eq!(scene.water().distortion_scale(), 8.0);
    assert_eq!(scene.water().size(), 0.5);
    assert_eq!(backend.baked, 1);

    scene.apply_config(ConfigEvent::Elevation(45.0), &mut backend);
    assert_eq!(backend.baked, 2);
    assert_eq!(backend.released, 1);
    assert_eq!(scene.lighting().sun().azimuth(), 180.0);
}
