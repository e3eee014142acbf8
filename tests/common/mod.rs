#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::Path;
use std::thread;
use std::time::Duration;

use ocean_scene::asset::{AssetSource, ModelSummary};
use ocean_scene::error::{AssetError, RenderError};
use ocean_scene::renderer::{
    EnvironmentBaker, FrameInputs, FrameOutcome, ReflectionMap, RenderBackend, SkyUniform, WaterUniform,
};
use ocean_scene::scene::NodeSnapshot;

/// What the backend saw for one submitted frame.
pub struct SubmittedFrame {
    pub water: WaterUniform,
    pub sky: SkyUniform,
    pub environment: Option<u64>,
    pub nodes: Vec<NodeSnapshot>,
}

/// In-memory backend that records bakes, releases and submitted frames.
#[derive(Default)]
pub struct RecordingBackend {
    next_id: u64,
    pub live: BTreeSet<u64>,
    pub baked: usize,
    pub released: usize,
    pub frames: Vec<SubmittedFrame>,
    pub resized: Option<(u32, u32)>,
    pub fail_submissions: bool,
    /// Report every submission as skipped, like a lost surface.
    pub skip_submissions: bool,
}

impl EnvironmentBaker for RecordingBackend {
    fn bake_environment(&mut self, _sky: &SkyUniform) -> ReflectionMap {
        self.next_id += 1;
        self.baked += 1;
        self.live.insert(self.next_id);
        ReflectionMap::new(self.next_id, 16, 5)
    }

    fn release_environment(&mut self, map: ReflectionMap) {
        assert!(self.live.remove(&map.id()), "map {} released twice", map.id());
        self.released += 1;
    }
}

impl RenderBackend for RecordingBackend {
    fn submit(&mut self, frame: &FrameInputs<'_>) -> Result<FrameOutcome, RenderError> {
        if self.fail_submissions {
            return Err(RenderError::Surface(wgpu::SurfaceError::Timeout));
        }
        if self.skip_submissions {
            return Ok(FrameOutcome::Skipped);
        }
        self.frames.push(SubmittedFrame {
            water: frame.water,
            sky: *frame.sky,
            environment: frame.environment.map(ReflectionMap::id),
            nodes: frame.nodes.to_vec(),
        });
        Ok(FrameOutcome::Presented)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resized = Some((width, height));
    }
}

/// Asset source that fails any path containing `broken`.
pub struct StubSource;

impl AssetSource for StubSource {
    fn load(&self, path: &Path) -> Result<ModelSummary, AssetError> {
        if path.to_string_lossy().contains("broken") {
            Err(AssetError::Malformed {
                path: path.to_path_buf(),
                reason: "truncated buffer".into(),
            })
        } else {
            Ok(ModelSummary {
                node_count: 1,
                mesh_count: 1,
                ..ModelSummary::default()
            })
        }
    }
}

/// Asset source that takes the given delay for any path containing `slow`.
pub struct SlowSource(pub Duration);

impl AssetSource for SlowSource {
    fn load(&self, path: &Path) -> Result<ModelSummary, AssetError> {
        if path.to_string_lossy().contains("slow") {
            thread::sleep(self.0);
        }
        StubSource.load(path)
    }
}
