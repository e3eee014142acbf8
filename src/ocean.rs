//! The concrete ocean scene: two boats and a whale.

use std::path::Path;

use glam::Vec3;

use crate::asset::LoadRequest;
use crate::motion::{MotionController, OrbitalParams, OscillatoryParams};
use crate::scene::{NodeId, Transform};
use crate::scheduler::OceanScene;

pub const MINI_BOAT: NodeId = NodeId(0);
pub const PIRATE_BOAT: NodeId = NodeId(1);
pub const WHALE: NodeId = NodeId(2);

pub const PIRATE_ORBIT: OrbitalParams = OrbitalParams {
    reference: MINI_BOAT,
    radius: 1500.0,
    speed: 0.1,
};

pub const WHALE_SWIM: OscillatoryParams = OscillatoryParams {
    base: Vec3::new(500.0, 0.0, 0.0),
    amplitude: Vec3::new(0.0, -50.0, 800.0),
    speed: Vec3::new(0.0, 1.0, 0.15),
};

/// Load requests for every node, with paths under `asset_root`.
pub fn load_requests(asset_root: &Path) -> Vec<LoadRequest> {
    vec![
        LoadRequest::new(asset_root.join("MiniBoat/scene.gltf"), MINI_BOAT, "MiniBoat")
            .at(Transform::from_translation(Vec3::new(0.0, 20.0, 0.0))),
        LoadRequest::new(
            asset_root.join("PirateBoat/scene.gltf"),
            PIRATE_BOAT,
            "PirateBoat",
        )
        .at(Transform::from_translation(Vec3::new(1500.0, 20.0, 500.0)).with_uniform_scale(200.0)),
        LoadRequest::new(asset_root.join("Whale1/scene.gltf"), WHALE, "Whale1")
            .at(Transform::from_translation(Vec3::new(400.0, -60.0, 150.0))),
    ]
}

/// Binds the motion controllers and issues every load.
pub fn populate(scene: &mut OceanScene, asset_root: &Path) {
    scene.bind_motion(PIRATE_BOAT, MotionController::Orbital(PIRATE_ORBIT));
    scene.bind_motion(WHALE, MotionController::Oscillatory(WHALE_SWIM));

    for request in load_requests(asset_root) {
        scene.load(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_target_distinct_nodes() {
        let requests = load_requests(Path::new("model"));
        assert_eq!(requests.len(), 3);
        let mut ids: Vec<_> = requests.iter().map(|r| r.target).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(requests[1].path.ends_with("PirateBoat/scene.gltf"));
        assert_eq!(requests[1].initial_transform.scale, Vec3::splat(200.0));
    }

    #[test]
    fn pirate_orbits_the_mini_boat() {
        assert_eq!(PIRATE_ORBIT.reference, MINI_BOAT);
    }
}
