use std::collections::HashMap;
use std::fmt;

use hecs::{Entity, World};

use super::components::{ModelComponent, Name, NodeKey, TransformComponent};
use crate::asset::ModelSummary;
use crate::error::RegistryError;
use crate::scene::Transform;

/// Typed identity of a scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node ready to be placed into the registry.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub model: ModelSummary,
}

/// Render-facing view of one registered node.
#[derive(Clone, Debug)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub transform: Transform,
    pub model: ModelSummary,
}

/// Identity-keyed store of scene nodes.
///
/// Nodes live as entities in a `hecs::World`; `index` maps each `NodeId` to its
/// entity so lookups are O(1) and absence is an ordinary `None`.
pub struct SceneRegistry {
    world: World,
    index: HashMap<NodeId, Entity>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            index: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: NodeId, node: SceneNode) -> Result<(), RegistryError> {
        if self.index.contains_key(&id) {
            return Err(RegistryError::Duplicate(id));
        }

        let entity = self.world.spawn((
            NodeKey(id),
            Name::new(node.name),
            TransformComponent(node.transform),
            ModelComponent(node.model),
        ));
        self.index.insert(id, entity);
        Ok(())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn transform(&self, id: NodeId) -> Option<Transform> {
        let entity = *self.index.get(&id)?;
        self.world
            .get::<&TransformComponent>(entity)
            .ok()
            .map(|t| t.0)
    }

    /// Overwrites the node's transform. Returns `false` when the node is absent.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> bool {
        let Some(&entity) = self.index.get(&id) else {
            return false;
        };
        match self.world.get::<&mut TransformComponent>(entity) {
            Ok(mut component) => {
                component.0 = transform;
                true
            }
            Err(_) => false,
        }
    }

    pub fn name(&self, id: NodeId) -> Option<String> {
        let entity = *self.index.get(&id)?;
        self.world.get::<&Name>(entity).ok().map(|n| n.0.clone())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Snapshot of every node, ordered by id.
    pub fn nodes(&self) -> Vec<NodeSnapshot> {
        let mut nodes: Vec<_> = self
            .world
            .query::<(&NodeKey, &TransformComponent, &ModelComponent)>()
            .iter()
            .map(|(_, (key, transform, model))| NodeSnapshot {
                id: key.0,
                transform: transform.0,
                model: model.0.clone(),
            })
            .collect();
        nodes.sort_by_key(|node| node.id);
        nodes
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new()
    }
}
