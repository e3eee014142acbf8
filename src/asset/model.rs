use glam::{Mat4, Vec3};

/// Axis-aligned bounds in the model's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub const UNIT: Self = Self {
        min: Vec3::splat(-0.5),
        max: Vec3::splat(0.5),
    };

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grows the bounds by the eight corners of `[min, max]` after `matrix`.
    pub fn include_transformed(&mut self, min: Vec3, max: Vec3, matrix: Mat4) {
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            );
            self.include_point(matrix.transform_point3(corner));
        }
    }

    /// Matrix mapping the unit cube centered at the origin onto these bounds.
    pub fn unit_cube_matrix(&self) -> Mat4 {
        let bounds = if self.is_empty() { Self::UNIT } else { *self };
        let size = bounds.size().max(Vec3::splat(1e-3));
        Mat4::from_scale_rotation_translation(size, glam::Quat::IDENTITY, bounds.center())
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// What the asset source produced for one loaded model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelSummary {
    pub node_count: usize,
    pub mesh_count: usize,
    pub bounds: Aabb,
}
