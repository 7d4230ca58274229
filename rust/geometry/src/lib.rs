// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Massing Geometry
//!
//! Expands massing blocks into level volumes, box meshes and a block/level
//! scene hierarchy, using nalgebra for vectors and transforms.

pub mod cuboid;
pub mod error;
pub mod mesh;
pub mod scene;
pub mod volume;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use cuboid::{cuboid_mesh, CUBOID_TRIANGLE_COUNT, CUBOID_VERTEX_COUNT};
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use scene::{build_scene, BlockGroup, LevelNode, Scene, SceneOptions};
pub use volume::{level_volumes, LevelVolume, UpAxis};
