// scene/components.rs
// hecs components stored per registered node

use crate::asset::ModelSummary;
use crate::scene::{NodeId, Transform};

/// Stable identity of the node, mirrored from the registry index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKey(pub NodeId);

/// Transform component (position, rotation, scale)
#[derive(Debug, Clone, Copy)]
pub struct TransformComponent(pub Transform);

/// Summary of the loaded model subtree
#[derive(Debug, Clone)]
pub struct ModelComponent(pub ModelSummary);

/// Name component for logging
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
