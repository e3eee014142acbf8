use std::path::PathBuf;

use thiserror::Error;

use crate::scene::NodeId;

/// Failure to turn an asset path into a scene node.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset {path:?} is unreachable: {source}")]
    Unreachable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset {path:?} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("asset {path:?} contains no scene")]
    EmptyScene { path: PathBuf },
}

impl AssetError {
    pub fn from_gltf(path: PathBuf, err: gltf::Error) -> Self {
        match err {
            gltf::Error::Io(source) => Self::Unreachable { path, source },
            other => Self::Malformed {
                path,
                reason: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("node {0} is already registered")]
    Duplicate(NodeId),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
