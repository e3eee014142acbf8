use super::vertex::{v, Vertex};

/// Unit cube centered at the origin, four vertices per face so normals stay flat.
pub fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    // (normal, u axis, v axis) with u x v == normal so faces wind CCW from outside
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    ];

    let mut verts = Vec::with_capacity(24);
    for (n, a, b) in faces {
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let pos = [
                n[0] * 0.5 + a[0] * su + b[0] * sv,
                n[1] * 0.5 + a[1] * su + b[1] * sv,
                n[2] * 0.5 + a[2] * su + b[2] * sv,
            ];
            verts.push(v(pos, n));
        }
    }

    let idx = (0..6u16)
        .flat_map(|f| {
            let o = f * 4;
            [o, o + 1, o + 2, o, o + 2, o + 3]
        })
        .collect::<Vec<_>>();

    (verts, idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn cube_counts_look_right() {
        let (v, i) = cube_mesh();
        assert_eq!(v.len(), 24);
        assert_eq!(i.len(), 36);
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        let (verts, idx) = cube_mesh();
        for tri in idx.chunks(3) {
            let a = Vec3::from(verts[tri[0] as usize].pos);
            let b = Vec3::from(verts[tri[1] as usize].pos);
            let c = Vec3::from(verts[tri[2] as usize].pos);
            let n = Vec3::from(verts[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }
}
