// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene assembly for massing blocks
//!
//! Produces a two-level hierarchy mirroring the live view: one group per
//! block placed at the block base, with one child node per level placed
//! at that level's elevation. Levels of a block share a single box mesh.
//! Only model data ends up here - no ground plane, grid or lights.

use massing_core::{Block, BlockId, Program};
use nalgebra::{Point3, Vector3};

use crate::cuboid::cuboid_mesh;
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::volume::{level_volumes, UpAxis};

/// Scene build options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub up: UpAxis,
    /// Fraction of the level height used for the box (0, 1]. Visual only:
    /// node placement always follows the full level height.
    pub level_height_ratio: f64,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            up: UpAxis::Y,
            level_height_ratio: 1.0,
        }
    }
}

/// One level inside a block group
#[derive(Debug, Clone, PartialEq)]
pub struct LevelNode {
    pub name: String,
    pub level: u32,
    /// Offset from the block group origin
    pub translation: Vector3<f64>,
}

/// All levels of one block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGroup {
    pub block_id: BlockId,
    pub name: String,
    pub program: Program,
    /// Block base offset
    pub translation: Vector3<f64>,
    /// Index into [`Scene::meshes`]
    pub mesh: usize,
    pub levels: Vec<LevelNode>,
}

/// Assembled scene ready for rendering or export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub groups: Vec<BlockGroup>,
    pub meshes: Vec<Mesh>,
}

impl Scene {
    /// Number of level nodes across all groups
    pub fn level_count(&self) -> usize {
        self.groups.iter().map(|g| g.levels.len()).sum()
    }

    /// Programs in use, in catalog order
    pub fn programs(&self) -> Vec<Program> {
        Program::ALL
            .into_iter()
            .filter(|p| self.groups.iter().any(|g| g.program == *p))
            .collect()
    }

    /// World-space bounds over every level box
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut bounds: Option<(Point3<f64>, Point3<f64>)> = None;
        for group in &self.groups {
            let (mesh_min, mesh_max) = self.meshes[group.mesh].bounds();
            for level in &group.levels {
                let offset = group.translation + level.translation;
                let lo = mesh_min.cast::<f64>() + offset;
                let hi = mesh_max.cast::<f64>() + offset;
                bounds = Some(match bounds {
                    None => (lo, hi),
                    Some((min, max)) => (min.inf(&lo), max.sup(&hi)),
                });
            }
        }
        bounds
    }
}

/// Build the scene for a block collection
pub fn build_scene(blocks: &[Block], options: &SceneOptions) -> Result<Scene> {
    let ratio = options.level_height_ratio;
    if !(ratio.is_finite() && ratio > 0.0 && ratio <= 1.0) {
        return Err(Error::InvalidExtent(format!(
            "level height ratio {ratio} outside (0, 1]"
        )));
    }

    let up = options.up;
    let mut scene = Scene {
        groups: Vec::with_capacity(blocks.len()),
        meshes: Vec::with_capacity(blocks.len()),
    };

    for block in blocks {
        let volumes = level_volumes(block);
        if volumes.is_empty() {
            return Err(Error::EmptyMesh(format!("{} has no levels", block.name)));
        }

        let extent = up.map(block.x_size, block.y_size, block.level_height * ratio);
        scene.meshes.push(cuboid_mesh(extent)?);

        let levels = volumes
            .iter()
            .map(|v| LevelNode {
                name: format!("{} / Level {}", block.name, v.level + 1),
                level: v.level,
                translation: v.local_center(up),
            })
            .collect();

        scene.groups.push(BlockGroup {
            block_id: block.id,
            name: block.name.clone(),
            program: block.default_function,
            translation: volumes[0].base_offset(up),
            mesh: scene.meshes.len() - 1,
            levels,
        });
    }

    Ok(scene)
}
