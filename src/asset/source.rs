use std::path::Path;

use glam::{Mat4, Vec3};

use super::model::ModelSummary;
use crate::error::AssetError;

/// Turns an asset path into a model summary. Called from loader worker threads.
pub trait AssetSource: Send + Sync + 'static {
    fn load(&self, path: &Path) -> Result<ModelSummary, AssetError>;
}

/// Reads `.gltf`/`.glb` files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct GltfSource;

impl AssetSource for GltfSource {
    fn load(&self, path: &Path) -> Result<ModelSummary, AssetError> {
        let (document, _buffers, _images) =
            gltf::import(path).map_err(|err| AssetError::from_gltf(path.to_path_buf(), err))?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| AssetError::EmptyScene {
                path: path.to_path_buf(),
            })?;

        let mut summary = ModelSummary::default();
        for node in scene.nodes() {
            summarize_node(&node, Mat4::IDENTITY, &mut summary);
        }

        log::debug!(
            "Summarized {:?}: {} nodes, {} meshes",
            path,
            summary.node_count,
            summary.mesh_count
        );
        Ok(summary)
    }
}

fn summarize_node(node: &gltf::Node<'_>, parent: Mat4, summary: &mut ModelSummary) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    summary.node_count += 1;

    if let Some(mesh) = node.mesh() {
        summary.mesh_count += 1;
        for primitive in mesh.primitives() {
            let bb = primitive.bounding_box();
            summary
                .bounds
                .include_transformed(Vec3::from(bb.min), Vec3::from(bb.max), world);
        }
    }

    for child in node.children() {
        summarize_node(&child, world, summary);
    }
}
