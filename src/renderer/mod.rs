pub mod depth;
pub mod environment_map;
pub mod gpu;
pub mod primitives;
pub mod texture;
pub mod uniforms;
pub mod vertex;

pub use depth::Depth;
pub use gpu::Renderer;
pub use texture::Texture;
pub use uniforms::{CameraUniform, ProxyInstance, SkyUniform, WaterUniform};
pub use vertex::Vertex;

use crate::error::RenderError;
use crate::scene::{Camera, NodeSnapshot};

/// Handle to a baked ambient reflection map.
///
/// Not `Clone`: whoever holds it is responsible for giving it back through
/// [`EnvironmentBaker::release_environment`].
#[derive(Debug, PartialEq, Eq)]
pub struct ReflectionMap {
    id: u64,
    resolution: u32,
    mip_levels: u32,
}

impl ReflectionMap {
    pub fn new(id: u64, resolution: u32, mip_levels: u32) -> Self {
        Self {
            id,
            resolution,
            mip_levels,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }
}

/// Produces prefiltered environment maps from the sky.
pub trait EnvironmentBaker {
    fn bake_environment(&mut self, sky: &SkyUniform) -> ReflectionMap;
    fn release_environment(&mut self, map: ReflectionMap);
}

/// Everything a backend needs to draw one frame.
pub struct FrameInputs<'a> {
    pub camera: &'a Camera,
    pub sky: &'a SkyUniform,
    pub water: WaterUniform,
    pub environment: Option<&'a ReflectionMap>,
    pub nodes: &'a [NodeSnapshot],
}

/// Whether a submission reached the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// The surface was unavailable this frame; nothing was drawn.
    Skipped,
}

pub trait RenderBackend: EnvironmentBaker {
    fn submit(&mut self, frame: &FrameInputs<'_>) -> Result<FrameOutcome, RenderError>;
    fn resize(&mut self, width: u32, height: u32);
}
