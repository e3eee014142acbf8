use std::sync::Arc;

use crate::asset::{AssetLoader, AssetSource, LoadRequest, LoadTicket, LoadedNode};
use crate::config::{ConfigEvent, ConfigParameter};
use crate::diagnostics::FrameStatsHistory;
use crate::environment::{EnvironmentLighting, SunState};
use crate::motion::{MotionController, MotionSystem};
use crate::renderer::{EnvironmentBaker, FrameInputs, FrameOutcome, RenderBackend};
use crate::scene::{NodeId, OrbitControls, SceneRegistry};
use crate::settings::OceanSettings;
use crate::time::FrameTime;
use crate::water::WaterSurfaceState;

/// What happened during one tick.
#[derive(Debug, Default)]
pub struct TickReport {
    pub loaded: Vec<LoadedNode>,
    pub moved: usize,
    pub rendered: bool,
}

/// Owns every piece of per-session scene state, from startup to shutdown.
pub struct OceanScene {
    registry: SceneRegistry,
    loader: AssetLoader,
    motion: MotionSystem,
    lighting: EnvironmentLighting,
    water: WaterSurfaceState,
    controls: OrbitControls,
    stats: FrameStatsHistory,
}

impl OceanScene {
    pub fn new(settings: &OceanSettings, source: Arc<dyn AssetSource>) -> Self {
        let mut controls = OrbitControls::new(Default::default(), settings.camera);
        controls.set_viewport(
            settings.render.resolution.width,
            settings.render.resolution.height,
        );

        Self {
            registry: SceneRegistry::new(),
            loader: AssetLoader::new(source),
            motion: MotionSystem::new(),
            lighting: EnvironmentLighting::new(
                settings.sky,
                settings.sun.elevation,
                settings.sun.azimuth,
            ),
            water: WaterSurfaceState::new(&settings.water),
            controls,
            stats: FrameStatsHistory::new(),
        }
    }

    /// Derives the sun from the configured angles and bakes the first environment map.
    pub fn startup<B>(&mut self, baker: &mut B) -> SunState
    where
        B: EnvironmentBaker + ?Sized,
    {
        let sun = *self.lighting.sun();
        let sun = self
            .lighting
            .update_sun(sun.elevation(), sun.azimuth(), &mut self.water, baker);
        log::info!(
            "Sun at elevation {:.1}, azimuth {:.1} -> {:?}",
            sun.elevation(),
            sun.azimuth(),
            sun.direction()
        );
        sun
    }

    pub fn load(&mut self, request: LoadRequest) -> LoadTicket {
        self.loader.load(request)
    }

    pub fn bind_motion(&mut self, target: NodeId, controller: MotionController) {
        self.motion.bind(target, controller);
    }

    /// Blocks until every issued load has resolved.
    pub fn finish_loading(&mut self) -> Vec<LoadedNode> {
        let loaded = self.loader.finish_pending(&mut self.registry);
        self.capture_loaded(&loaded);
        loaded
    }

    pub fn apply_config<B>(&mut self, event: ConfigEvent, baker: &mut B)
    where
        B: EnvironmentBaker + ?Sized,
    {
        let sun = *self.lighting.sun();
        match event {
            ConfigEvent::Elevation(elevation) => {
                self.lighting
                    .update_sun(elevation, sun.azimuth(), &mut self.water, baker);
            }
            ConfigEvent::Azimuth(azimuth) => {
                self.lighting
                    .update_sun(sun.elevation(), azimuth, &mut self.water, baker);
            }
            ConfigEvent::DistortionScale(value) => {
                self.water.set_distortion_scale(value);
            }
            ConfigEvent::Size(value) => {
                self.water.set_size(value);
            }
        }
        let parameter = event.parameter();
        if event.affects_lighting() {
            log::info!(
                "{:?} set to {:.1}; environment regenerated",
                parameter,
                self.config_value(parameter)
            );
        } else {
            log::debug!("{:?} set to {:.2}", parameter, self.config_value(parameter));
        }
    }

    /// Current value of a configurable parameter.
    pub fn config_value(&self, parameter: ConfigParameter) -> f32 {
        match parameter {
            ConfigParameter::Elevation => self.lighting.sun().elevation(),
            ConfigParameter::Azimuth => self.lighting.sun().azimuth(),
            ConfigParameter::DistortionScale => self.water.distortion_scale(),
            ConfigParameter::Size => self.water.size(),
        }
    }

    pub fn resize<B>(&mut self, width: u32, height: u32, backend: &mut B)
    where
        B: RenderBackend + ?Sized,
    {
        if width == 0 || height == 0 {
            return;
        }
        self.controls.set_viewport(width, height);
        backend.resize(width, height);
    }

    /// One frame: loads, motion, camera, water time, render, diagnostics.
    ///
    /// Water time advances only when the backend presents the frame.
    pub fn tick<B>(&mut self, backend: &mut B, time: FrameTime) -> TickReport
    where
        B: RenderBackend + ?Sized,
    {
        let loaded = self.loader.drain_completed(&mut self.registry);
        self.capture_loaded(&loaded);

        let moved = self.motion.step(&mut self.registry, time.elapsed);

        self.controls.update();

        // the advanced time only sticks once a frame reaches the screen
        let mut water = self.water.clone();
        water.advance(time.delta);

        let nodes = self.registry.nodes();
        let frame = FrameInputs {
            camera: self.controls.camera(),
            sky: self.lighting.sky_uniform(),
            water: water.uniform(),
            environment: self.lighting.reflection_map(),
            nodes: &nodes,
        };
        let rendered = match backend.submit(&frame) {
            Ok(FrameOutcome::Presented) => true,
            Ok(FrameOutcome::Skipped) => {
                log::debug!("Frame skipped by the backend");
                false
            }
            Err(err) => {
                log::error!("Render failed: {}", err);
                false
            }
        };
        if rendered {
            self.water = water;
        }

        self.stats.record(time.delta as f32, nodes.len());

        TickReport {
            loaded,
            moved,
            rendered,
        }
    }

    /// Releases the reflection map. The scene is inert afterwards.
    pub fn shutdown<B>(&mut self, baker: &mut B)
    where
        B: EnvironmentBaker + ?Sized,
    {
        self.lighting.release(baker);
        log::info!(
            "Shutting down after {} environment regenerations",
            self.lighting.regenerations()
        );
    }

    fn capture_loaded(&mut self, loaded: &[LoadedNode]) {
        for node in loaded {
            self.motion.on_node_loaded(node);
        }
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn lighting(&self) -> &EnvironmentLighting {
        &self.lighting
    }

    pub fn water(&self) -> &WaterSurfaceState {
        &self.water
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn stats(&self) -> &FrameStatsHistory {
        &self.stats
    }
}
