// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary glTF (GLB) scene export
//!
//! Layout written by [`encode_glb`]:
//!
//! ```text
//! header   magic "glTF" | version 2 | total length        (12 bytes)
//! chunk 0  length | "JSON" | document, space padded        (4-byte aligned)
//! chunk 1  length | "BIN\0" | positions, normals, indices  (4-byte aligned)
//! ```
//!
//! Node tree: one root node, one group per block at the block base, one
//! child per level. Levels of a block share the block's box mesh.

use std::collections::BTreeMap;

use bytes::{Buf, BufMut, BytesMut};
use massing_core::{Program, StoreSnapshot};
use massing_geometry::{build_scene, Mesh, Scene};
use rustc_hash::FxHashMap;
use serde_json::json;

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::gltf::*;

pub const GLB_MAGIC: u32 = 0x4654_6C67; // "glTF"
pub const GLB_VERSION: u32 = 2;
pub const CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"
pub const CHUNK_BIN: u32 = 0x004E_4942; // "BIN\0"

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Roughness and metalness of the exported program materials
const MATERIAL_ROUGHNESS: f32 = 0.45;
const MATERIAL_METALLIC: f32 = 0.05;

/// Encode every level of every block into a GLB container
pub fn encode_glb(snapshot: &StoreSnapshot, config: &ExportConfig) -> Result<Vec<u8>> {
    let scene = build_scene(&snapshot.blocks, &config.scene_options())?;
    let (document, bin) = build_document(&scene, config.include_materials);

    let json = serde_json::to_vec(&document)?;
    let json_padded = pad4(json.len());
    let bin_padded = pad4(bin.len());
    let total = HEADER_LEN + CHUNK_HEADER_LEN + json_padded + CHUNK_HEADER_LEN + bin_padded;

    let mut out = BytesMut::with_capacity(total);
    out.put_u32_le(GLB_MAGIC);
    out.put_u32_le(GLB_VERSION);
    out.put_u32_le(total as u32);

    out.put_u32_le(json_padded as u32);
    out.put_u32_le(CHUNK_JSON);
    out.put_slice(&json);
    out.put_bytes(b' ', json_padded - json.len());

    out.put_u32_le(bin_padded as u32);
    out.put_u32_le(CHUNK_BIN);
    out.put_slice(&bin);
    out.put_bytes(0, bin_padded - bin.len());

    debug_assert_eq!(out.len(), total);
    Ok(out.to_vec())
}

#[inline]
fn pad4(len: usize) -> usize {
    (len + 3) & !3
}

/// Appends typed arrays to the binary chunk and records views/accessors
struct BinWriter {
    bin: BytesMut,
    views: Vec<BufferView>,
    accessors: Vec<Accessor>,
}

impl BinWriter {
    fn new() -> Self {
        Self {
            bin: BytesMut::new(),
            views: Vec::new(),
            accessors: Vec::new(),
        }
    }

    fn push_view(&mut self, start: usize, target: u32) -> usize {
        self.views.push(BufferView {
            buffer: 0,
            byte_offset: start,
            byte_length: self.bin.len() - start,
            target: Some(target),
        });
        self.views.len() - 1
    }

    fn push_vec3(&mut self, data: &[f32], bounds: Option<([f32; 3], [f32; 3])>) -> usize {
        let start = self.bin.len();
        for v in data {
            self.bin.put_f32_le(*v);
        }
        let view = self.push_view(start, TARGET_ARRAY_BUFFER);
        let (min, max) = match bounds {
            Some((min, max)) => (Some(min.to_vec()), Some(max.to_vec())),
            None => (None, None),
        };

        self.accessors.push(Accessor {
            buffer_view: view,
            byte_offset: 0,
            component_type: COMPONENT_FLOAT,
            count: data.len() / 3,
            kind: "VEC3".into(),
            min,
            max,
        });
        self.accessors.len() - 1
    }

    fn push_indices(&mut self, indices: &[u32]) -> usize {
        let start = self.bin.len();
        for i in indices {
            self.bin.put_u32_le(*i);
        }
        let view = self.push_view(start, TARGET_ELEMENT_ARRAY_BUFFER);
        self.accessors.push(Accessor {
            buffer_view: view,
            byte_offset: 0,
            component_type: COMPONENT_UNSIGNED_INT,
            count: indices.len(),
            kind: "SCALAR".into(),
            min: None,
            max: None,
        });
        self.accessors.len() - 1
    }

    fn push_mesh(&mut self, mesh: &Mesh) -> Primitive {
        // POSITION accessors must carry min/max
        let (min, max) = mesh.bounds();
        let bounds = ([min.x, min.y, min.z], [max.x, max.y, max.z]);
        let position = self.push_vec3(&mesh.positions, Some(bounds));
        let normal = self.push_vec3(&mesh.normals, None);
        let indices = self.push_indices(&mesh.indices);
        Primitive {
            attributes: BTreeMap::from([
                ("POSITION".to_string(), position),
                ("NORMAL".to_string(), normal),
            ]),
            indices: Some(indices),
            material: None,
            mode: Some(MODE_TRIANGLES),
        }
    }
}

fn program_material(program: Program) -> Material {
    let [r, g, b] = program.color_rgb();
    Material {
        name: Some(program.as_str().to_string()),
        pbr_metallic_roughness: PbrMetallicRoughness {
            base_color_factor: [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0],
            metallic_factor: MATERIAL_METALLIC,
            roughness_factor: MATERIAL_ROUGHNESS,
        },
    }
}

#[inline]
fn to_array(v: &massing_geometry::Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

fn build_document(scene: &Scene, include_materials: bool) -> (GltfDocument, BytesMut) {
    let mut materials = Vec::new();
    let mut material_index: FxHashMap<Program, usize> = FxHashMap::default();
    if include_materials {
        for program in scene.programs() {
            material_index.insert(program, materials.len());
            materials.push(program_material(program));
        }
    }

    let mut writer = BinWriter::new();
    let mut meshes = Vec::with_capacity(scene.meshes.len());
    let mut nodes = vec![Node {
        name: Some("Massing Blocks".into()),
        extras: scene.bounds().map(|(min, max)| {
            json!({ "bounds": { "min": [min.x, min.y, min.z], "max": [max.x, max.y, max.z] } })
        }),
        ..Default::default()
    }];

    for group in &scene.groups {
        let mut primitive = writer.push_mesh(&scene.meshes[group.mesh]);
        primitive.material = material_index.get(&group.program).copied();
        meshes.push(GltfMesh {
            name: Some(group.name.clone()),
            primitives: vec![primitive],
        });
        let mesh_index = meshes.len() - 1;

        let group_index = nodes.len();
        nodes.push(Node {
            name: Some(group.name.clone()),
            translation: Some(to_array(&group.translation)),
            extras: Some(json!({
                "blockId": group.block_id.to_string(),
                "program": group.program.as_str(),
            })),
            ..Default::default()
        });
        nodes[0].children.push(group_index);

        for level in &group.levels {
            let level_index = nodes.len();
            nodes.push(Node {
                name: Some(level.name.clone()),
                mesh: Some(mesh_index),
                translation: Some(to_array(&level.translation)),
                extras: Some(json!({
                    "blockId": group.block_id.to_string(),
                    "program": group.program.as_str(),
                    "level": level.level,
                })),
                ..Default::default()
            });
            nodes[group_index].children.push(level_index);
        }
    }

    let document = GltfDocument {
        asset: Asset {
            version: "2.0".into(),
            generator: Some(concat!("massing-export ", env!("CARGO_PKG_VERSION")).into()),
        },
        scene: Some(0),
        scenes: vec![GltfScene {
            name: Some("Scene".into()),
            nodes: vec![0],
        }],
        nodes,
        meshes,
        materials,
        accessors: writer.accessors,
        buffer_views: writer.views,
        buffers: vec![Buffer {
            byte_length: writer.bin.len(),
            uri: None,
        }],
    };

    (document, writer.bin)
}

/// A parsed GLB container
#[derive(Debug, Clone)]
pub struct GlbContents {
    pub document: GltfDocument,
    pub bin: Vec<u8>,
}

impl GlbContents {
    fn accessor_bytes(&self, index: usize, component_type: u32) -> Result<(&Accessor, &[u8])> {
        let accessor = self
            .document
            .accessors
            .get(index)
            .ok_or_else(|| ExportError::Container(format!("accessor {index} missing")))?;
        if accessor.component_type != component_type {
            return Err(ExportError::Container(format!(
                "accessor {index} has component type {}",
                accessor.component_type
            )));
        }
        let view = self
            .document
            .buffer_views
            .get(accessor.buffer_view)
            .ok_or_else(|| ExportError::Container(format!("buffer view {} missing", accessor.buffer_view)))?;
        let start = view.byte_offset + accessor.byte_offset;
        let end = view.byte_offset + view.byte_length;
        self.bin
            .get(start..end)
            .map(|bytes| (accessor, bytes))
            .ok_or_else(|| ExportError::Container(format!("accessor {index} out of bounds")))
    }

    /// Read a float accessor as a flat array
    pub fn read_f32(&self, index: usize) -> Result<Vec<f32>> {
        let (accessor, mut bytes) = self.accessor_bytes(index, COMPONENT_FLOAT)?;
        let len = accessor.count * components(&accessor.kind);
        if bytes.remaining() < len * 4 {
            return Err(ExportError::Container(format!("accessor {index} truncated")));
        }
        Ok((0..len).map(|_| bytes.get_f32_le()).collect())
    }

    /// Read an unsigned int accessor
    pub fn read_u32(&self, index: usize) -> Result<Vec<u32>> {
        let (accessor, mut bytes) = self.accessor_bytes(index, COMPONENT_UNSIGNED_INT)?;
        let len = accessor.count * components(&accessor.kind);
        if bytes.remaining() < len * 4 {
            return Err(ExportError::Container(format!("accessor {index} truncated")));
        }
        Ok((0..len).map(|_| bytes.get_u32_le()).collect())
    }
}

fn components(kind: &str) -> usize {
    match kind {
        "VEC2" => 2,
        "VEC3" => 3,
        "VEC4" | "MAT2" => 4,
        "MAT3" => 9,
        "MAT4" => 16,
        _ => 1,
    }
}

/// Validate and split a GLB container
pub fn decode_glb(data: &[u8]) -> Result<GlbContents> {
    let invalid = |msg: &str| ExportError::Container(msg.to_string());

    let mut buf = data;
    if buf.remaining() < HEADER_LEN {
        return Err(invalid("shorter than header"));
    }
    if buf.get_u32_le() != GLB_MAGIC {
        return Err(invalid("bad magic"));
    }
    let version = buf.get_u32_le();
    if version != GLB_VERSION {
        return Err(ExportError::Container(format!("unsupported version {version}")));
    }
    if buf.get_u32_le() as usize != data.len() {
        return Err(invalid("declared length does not match data"));
    }

    let mut document = None;
    let mut bin = None;
    while buf.has_remaining() {
        if buf.remaining() < CHUNK_HEADER_LEN {
            return Err(invalid("truncated chunk header"));
        }
        let length = buf.get_u32_le() as usize;
        let kind = buf.get_u32_le();
        if length % 4 != 0 {
            return Err(invalid("chunk not 4-byte aligned"));
        }
        if buf.remaining() < length {
            return Err(invalid("truncated chunk"));
        }
        let (payload, rest) = buf.split_at(length);
        buf = rest;

        match kind {
            CHUNK_JSON if document.is_none() => {
                document = Some(serde_json::from_slice::<GltfDocument>(payload)?);
            }
            CHUNK_BIN if document.is_some() && bin.is_none() => bin = Some(payload.to_vec()),
            CHUNK_JSON | CHUNK_BIN => return Err(invalid("unexpected chunk order")),
            // Unknown chunk types must be ignored
            _ => {}
        }
    }

    let document = document.ok_or_else(|| invalid("missing JSON chunk"))?;
    Ok(GlbContents {
        document,
        bin: bin.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use massing_core::{BlockStore, UnitSystem};

    fn encode(store: &BlockStore) -> Vec<u8> {
        encode_glb(&store.snapshot(), &ExportConfig::default()).unwrap()
    }

    #[test]
    fn test_header_and_alignment() {
        let bytes = encode(&BlockStore::new());
        assert_eq!(&bytes[0..4], b"glTF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 2);
        assert_eq!(
            u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize,
            bytes.len()
        );
        assert_eq!(bytes.len() % 4, 0);
        assert_eq!(&bytes[16..20], b"JSON");
    }

    #[test]
    fn test_default_store_has_eight_level_nodes() {
        let contents = decode_glb(&encode(&BlockStore::new())).unwrap();
        let doc = &contents.document;

        let level_nodes = doc.nodes.iter().filter(|n| n.mesh.is_some()).count();
        assert_eq!(level_nodes, 8);
        assert_eq!(doc.meshes.len(), 1);
        assert_eq!(doc.materials.len(), 1);
        assert_eq!(doc.materials[0].name.as_deref(), Some("Office"));
        assert_eq!(doc.buffers[0].byte_length, contents.bin.len());
    }

    #[test]
    fn test_level_translations_stack() {
        let contents = decode_glb(&encode(&BlockStore::new())).unwrap();
        let ys: Vec<f64> = contents
            .document
            .nodes
            .iter()
            .filter(|n| n.mesh.is_some())
            .map(|n| n.translation.unwrap()[1])
            .collect();
        let expected: Vec<f64> = (0..8).map(|i| 3.6 * i as f64 + 1.8).collect();
        assert_eq!(ys, expected);
    }

    #[test]
    fn test_positions_round_trip_through_accessors() {
        let contents = decode_glb(&encode(&BlockStore::new())).unwrap();
        let primitive = &contents.document.meshes[0].primitives[0];
        let positions = contents.read_f32(primitive.attributes["POSITION"]).unwrap();
        let indices = contents.read_u32(primitive.indices.unwrap()).unwrap();

        assert_eq!(positions.len(), 24 * 3);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|i| (*i as usize) < 24));

        let accessor = &contents.document.accessors[primitive.attributes["POSITION"]];
        assert_eq!(accessor.min.as_deref(), Some(&[-12.0, -1.8, -12.0][..]));
        assert_eq!(accessor.max.as_deref(), Some(&[12.0, 1.8, 12.0][..]));
    }

    #[test]
    fn test_root_node_carries_scene_bounds() {
        let contents = decode_glb(&encode(&BlockStore::new())).unwrap();
        let extras = contents.document.nodes[0].extras.as_ref().unwrap();
        let corner = |key: &str| -> Vec<f64> {
            extras["bounds"][key]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_f64().unwrap())
                .collect()
        };
        // eight 3.6 m levels stacked on the ground, Y-up
        for (got, want) in corner("min").into_iter().zip([-12.0, 0.0, -12.0]) {
            assert!((got - want).abs() < 1e-5, "{got} != {want}");
        }
        for (got, want) in corner("max").into_iter().zip([12.0, 28.8, 12.0]) {
            assert!((got - want).abs() < 1e-5, "{got} != {want}");
        }
    }

    #[test]
    fn test_materials_can_be_disabled() {
        let config = ExportConfig {
            include_materials: false,
            ..Default::default()
        };
        let bytes = encode_glb(&BlockStore::new().snapshot(), &config).unwrap();
        let contents = decode_glb(&bytes).unwrap();
        assert!(contents.document.materials.is_empty());
        assert!(contents.document.meshes[0].primitives[0].material.is_none());
    }

    #[test]
    fn test_units_do_not_change_geometry() {
        let mut store = BlockStore::new();
        let metric = encode(&store);
        store.set_units(UnitSystem::Imperial);
        assert_eq!(metric, encode(&store));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_glb(b"").is_err());
        assert!(decode_glb(b"not a glb file at all").is_err());

        let mut bytes = encode(&BlockStore::new());
        bytes[0] = b'X';
        assert!(decode_glb(&bytes).is_err());

        let mut bytes = encode(&BlockStore::new());
        bytes.truncate(bytes.len() - 4);
        assert!(decode_glb(&bytes).is_err());
    }
}
