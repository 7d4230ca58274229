// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stacking and placement of level boxes for whole block collections.

use approx::assert_relative_eq;
use massing_core::{BlockPatch, BlockStore};
use massing_geometry::{build_scene, level_volumes, SceneOptions, UpAxis, Vector3};

#[test]
fn level_boxes_touch_without_overlap() {
    let mut store = BlockStore::new();
    let id = store.blocks()[0].id;
    store.update_block(
        id,
        BlockPatch {
            levels: Some(30),
            level_height: Some(3.15),
            ..Default::default()
        },
    );

    let volumes = level_volumes(&store.blocks()[0]);
    assert_eq!(volumes.len(), 30);
    for pair in volumes.windows(2) {
        let top = pair[0].elevation + pair[0].height / 2.0;
        let bottom = pair[1].elevation - pair[1].height / 2.0;
        assert_relative_eq!(top, bottom, epsilon = 1e-9);
    }
    let last = volumes.last().unwrap();
    assert_relative_eq!(
        last.elevation + last.height / 2.0,
        store.blocks()[0].total_height(),
        epsilon = 1e-9
    );
}

#[test]
fn scene_matches_block_collection() {
    let mut store = BlockStore::new();
    for _ in 0..3 {
        store.add_block();
    }
    let scene = build_scene(store.blocks(), &SceneOptions::default()).unwrap();

    assert_eq!(scene.groups.len(), 4);
    assert_eq!(scene.level_count(), 32);
    let xs: Vec<f64> = scene.groups.iter().map(|g| g.translation.x).collect();
    assert_eq!(xs, vec![0.0, 8.0, 16.0, 24.0]);
    assert!(scene.groups.iter().all(|g| g.levels.len() == 8));
}

#[test]
fn z_up_keeps_model_axes() {
    let mut store = BlockStore::new();
    let id = store.blocks()[0].id;
    store.update_block(
        id,
        BlockPatch {
            pos_y: Some(5.0),
            pos_z: Some(2.0),
            ..Default::default()
        },
    );
    let options = SceneOptions {
        up: UpAxis::Z,
        ..Default::default()
    };
    let scene = build_scene(store.blocks(), &options).unwrap();
    let group = &scene.groups[0];

    assert_eq!(group.translation, Vector3::new(0.0, 5.0, 2.0));
    assert_relative_eq!(group.levels[0].translation.z, 1.8, epsilon = 1e-12);
    assert_eq!(group.levels[0].translation.y, 0.0);
}
