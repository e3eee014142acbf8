mod common;

use std::sync::Arc;

use common::StubSource;
use glam::Vec3;
use ocean_scene::asset::{AssetLoader, LoadRequest, LoadStatus};
use ocean_scene::scene::{NodeId, SceneRegistry, Transform};

#[test]
fn k_of_n_loads_succeed() {
    let mut loader = AssetLoader::new(Arc::new(StubSource));
    let mut registry = SceneRegistry::new();

    let n = 16u32;
    let tickets: Vec<_> = (0..n)
        .map(|i| {
            let path = if i % 3 == 0 {
                format!("model/broken_{}.gltf", i)
            } else {
                format!("model/ok_{}.gltf", i)
            };
            let at = Transform::from_translation(Vec3::new(i as f32, 0.0, 0.0));
            loader.load(LoadRequest::new(path, NodeId(i), format!("node {}", i)).at(at))
        })
        .collect();

    let loaded = loader.finish_pending(&mut registry);
    let failures = (0..n).filter(|i| i % 3 == 0).count();
    let successes = n as usize - failures;

    assert_eq!(loaded.len(), successes);
    assert_eq!(registry.len(), successes);
    assert_eq!(loader.pending(), 0);

    for (i, ticket) in tickets.iter().enumerate() {
        let status = loader.status(*ticket).unwrap();
        let id = NodeId(i as u32);
        if i % 3 == 0 {
            assert!(matches!(status, LoadStatus::Failed(_)));
            assert!(!registry.contains(id));
        } else {
            assert_eq!(status, &LoadStatus::Loaded);
            assert_eq!(
                registry.transform(id).unwrap().translation,
                Vec3::new(i as f32, 0.0, 0.0)
            );
        }
    }
}

#[test]
fn status_is_pending_until_drained() {
    let mut loader = AssetLoader::new(Arc::new(StubSource));
    let mut registry = SceneRegistry::new();

    let ticket = loader.load(LoadRequest::new("model/ok.gltf", NodeId(4), "ok"));
    assert_eq!(loader.status(ticket), Some(&LoadStatus::Pending));
    assert_eq!(loader.pending(), 1);
    assert!(registry.is_empty());

    loader.finish_pending(&mut registry);
    assert_eq!(loader.status(ticket), Some(&LoadStatus::Loaded));
    assert_eq!(registry.name(NodeId(4)).as_deref(), Some("ok"));
}
