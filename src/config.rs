/// A user-facing parameter change, applied through `OceanScene::apply_config`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigEvent {
    Elevation(f32),
    Azimuth(f32),
    DistortionScale(f32),
    Size(f32),
}

/// The adjustable parameters, for input bindings that nudge a current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigParameter {
    Elevation,
    Azimuth,
    DistortionScale,
    Size,
}

impl ConfigParameter {
    /// Increment applied per key press.
    pub fn step(self) -> f32 {
        match self {
            ConfigParameter::Elevation | ConfigParameter::Azimuth => 1.0,
            ConfigParameter::DistortionScale | ConfigParameter::Size => 0.1,
        }
    }

    pub fn event(self, value: f32) -> ConfigEvent {
        match self {
            ConfigParameter::Elevation => ConfigEvent::Elevation(value),
            ConfigParameter::Azimuth => ConfigEvent::Azimuth(value),
            ConfigParameter::DistortionScale => ConfigEvent::DistortionScale(value),
            ConfigParameter::Size => ConfigEvent::Size(value),
        }
    }

    /// Event moving `current` by `direction` steps.
    pub fn nudge(self, current: f32, direction: f32) -> ConfigEvent {
        self.event(current + self.step() * direction)
    }
}

impl ConfigEvent {
    pub fn parameter(&self) -> ConfigParameter {
        match self {
            ConfigEvent::Elevation(_) => ConfigParameter::Elevation,
            ConfigEvent::Azimuth(_) => ConfigParameter::Azimuth,
            ConfigEvent::DistortionScale(_) => ConfigParameter::DistortionScale,
            ConfigEvent::Size(_) => ConfigParameter::Size,
        }
    }

    /// Whether applying this event regenerates the environment map.
    pub fn affects_lighting(&self) -> bool {
        matches!(self, ConfigEvent::Elevation(_) | ConfigEvent::Azimuth(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_moves_by_one_step() {
        assert_eq!(
            ConfigParameter::Elevation.nudge(2.0, 1.0),
            ConfigEvent::Elevation(3.0)
        );
        match ConfigParameter::DistortionScale.nudge(3.7, -1.0) {
            ConfigEvent::DistortionScale(v) => assert!((v - 3.6).abs() < 1e-6),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn only_sun_angles_touch_lighting() {
        assert!(ConfigEvent::Azimuth(0.0).affects_lighting());
        assert!(!ConfigEvent::Size(1.0).affects_lighting());
        assert_eq!(ConfigEvent::Size(1.0).parameter(), ConfigParameter::Size);
    }
}
