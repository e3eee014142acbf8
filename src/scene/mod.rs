// scene/mod.rs

pub mod camera;
pub mod components;
pub mod controls;
pub mod registry;
pub mod transform;

pub use camera::Camera;
pub use controls::{OrbitControls, OrbitSettings};
pub use registry::{NodeId, NodeSnapshot, SceneNode, SceneRegistry};
pub use transform::Transform;
