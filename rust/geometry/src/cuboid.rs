// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned box meshes
//!
//! Every level volume is rendered and exported as a closed box. Faces get
//! their own four vertices so normals stay flat across the hard edges.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};

/// Vertices per box: 4 per face, no sharing across faces
pub const CUBOID_VERTEX_COUNT: usize = 24;
/// Triangles per box: 2 per face
pub const CUBOID_TRIANGLE_COUNT: usize = 12;

/// (outward normal, u, v) with `u × v == normal` so quads wind counter-clockwise
const FACES: [([f64; 3], [f64; 3], [f64; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
];

/// Build a closed box of the given full extent, centered at the origin
#[inline]
pub fn cuboid_mesh(extent: Vector3<f64>) -> Result<Mesh> {
    if !extent.iter().all(|e| e.is_finite() && *e > 0.0) {
        return Err(Error::InvalidExtent(format!(
            "{} x {} x {}",
            extent.x, extent.y, extent.z
        )));
    }

    let half = extent / 2.0;
    let mut mesh = Mesh::with_capacity(CUBOID_VERTEX_COUNT, CUBOID_TRIANGLE_COUNT * 3);

    for (normal, u, v) in FACES {
        let normal = Vector3::from(normal);
        let u = Vector3::from(u).component_mul(&half);
        let v = Vector3::from(v).component_mul(&half);
        let center = normal.component_mul(&half);

        let corners = [center - u - v, center + u - v, center + u + v, center - u + v];
        let first = mesh.vertex_count() as u32;
        for corner in corners {
            mesh.add_vertex(Point3::from(corner), normal);
        }
        mesh.add_triangle(first, first + 1, first + 2);
        mesh.add_triangle(first, first + 2, first + 3);
    }

    Ok(mesh)
}
