//! Background glTF model loading.
//!
//! The loader runs `gltf::import` on its own thread and hands back a flattened
//! triangle mesh through a channel. The render loop polls it once per tick;
//! dropping the loader abandons the load.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use glam::{Mat3, Mat4, Vec3};

use crate::error::AssetLoadFailure;
use crate::surface::Vertex;

/// Triangle mesh flattened from every node of a glTF scene
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub path: PathBuf,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl LoadedModel {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Handle to an in-flight model load
pub struct ModelLoader {
    receiver: Option<Receiver<Result<LoadedModel, AssetLoadFailure>>>,
}

impl ModelLoader {
    /// Start loading `path` on a background thread
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        log::info!("Loading model {:?} in background", path);

        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let result = load_model(&path);
            // Receiver gone means the load was abandoned
            let _ = sender.send(result);
        });

        Self {
            receiver: Some(receiver),
        }
    }

    /// Non-blocking check for completion; yields the result exactly once
    pub fn poll(&mut self) -> Option<Result<LoadedModel, AssetLoadFailure>> {
        let receiver = self.receiver.as_ref()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(AssetLoadFailure::Disconnected),
        };
        self.receiver = None;
        Some(result)
    }

    /// Block until the load completes
    pub fn wait(mut self) -> Result<LoadedModel, AssetLoadFailure> {
        match self.receiver.take() {
            Some(receiver) => receiver
                .recv()
                .unwrap_or(Err(AssetLoadFailure::Disconnected)),
            None => Err(AssetLoadFailure::Disconnected),
        }
    }
}

/// Import a glTF/GLB file and flatten its default scene into one mesh
pub fn load_model(path: &Path) -> Result<LoadedModel, AssetLoadFailure> {
    let (document, buffers, _images) =
        gltf::import(path).map_err(|source| AssetLoadFailure::Import {
            path: path.to_path_buf(),
            source,
        })?;

    let mut model = LoadedModel {
        path: path.to_path_buf(),
        vertices: Vec::new(),
        indices: Vec::new(),
    };

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());
    if let Some(scene) = scene {
        for node in scene.nodes() {
            process_node(&node, &buffers, Mat4::IDENTITY, &mut model);
        }
    }

    if model.indices.is_empty() {
        return Err(AssetLoadFailure::NoGeometry {
            path: path.to_path_buf(),
        });
    }

    log::info!(
        "Model {:?} loaded: {} vertices, {} triangles",
        path,
        model.vertices.len(),
        model.triangle_count()
    );
    Ok(model)
}

/// Recursively processes glTF nodes
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: Mat4,
    model: &mut LoadedModel,
) {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            process_primitive(&primitive, buffers, global_transform, model);
        }
    }

    for child in node.children() {
        process_node(&child, buffers, global_transform, model);
    }
}

fn process_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    transform: Mat4,
    model: &mut LoadedModel,
) {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::debug!("Skipping non-triangle primitive ({:?})", primitive.mode());
        return;
    }

    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
    let Some(positions) = reader.read_positions() else {
        return;
    };
    let positions: Vec<Vec3> = positions
        .map(|p| transform.transform_point3(Vec3::from_array(p)))
        .collect();
    if positions.is_empty() {
        return;
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    // Drop a trailing partial triangle and any out-of-range reference
    let indices: Vec<u32> = indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|&i| (i as usize) < positions.len()))
        .flatten()
        .copied()
        .collect();

    let normals: Vec<Vec3> = match reader.read_normals() {
        Some(normals) => {
            let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
            normals
                .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero())
                .collect()
        }
        None => smooth_normals(&positions, &indices),
    };

    let base_color = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();
    let color = [base_color[0], base_color[1], base_color[2]];

    let base_index = model.vertices.len() as u32;
    model
        .vertices
        .extend(positions.iter().enumerate().map(|(i, p)| Vertex {
            position: p.to_array(),
            normal: normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
            color,
        }));
    model
        .indices
        .extend(indices.iter().map(|&i| base_index + i));
}

/// Area-weighted vertex normals for meshes that ship without them
pub fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One triangle in the XY plane, node translated 5m along +Z
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0, "translation": [0.0, 0.0, 5.0] }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
        "buffers": [{
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    fn write_triangle(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("triangle.gltf");
        std::fs::write(&path, TRIANGLE_GLTF).unwrap();
        path
    }

    #[test]
    fn test_load_triangle_applies_node_transform() {
        let dir = tempfile::tempdir().unwrap();
        let model = load_model(&write_triangle(&dir)).unwrap();

        assert_eq!(model.vertices.len(), 3);
        assert_eq!(model.indices, vec![0, 1, 2]);
        assert_eq!(model.triangle_count(), 1);
        assert!(model.vertices.iter().all(|v| v.position[2] == 5.0));

        // No NORMAL attribute: derived from winding
        for v in &model.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.color, [1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn test_background_load_completes() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ModelLoader::spawn(write_triangle(&dir));

        let model = loader.wait().unwrap();
        assert_eq!(model.vertices.len(), 3);
    }

    #[test]
    fn test_missing_file_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = ModelLoader::spawn(dir.path().join("missing.glb"));

        let result = loop {
            if let Some(result) = loader.poll() {
                break result;
            }
            thread::yield_now();
        };

        assert!(matches!(result, Err(AssetLoadFailure::Import { .. })));
        // Result is handed out once
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_smooth_normals_shared_vertex() {
        // Two triangles folded along the X axis
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        ];
        let indices = [0, 1, 2, 0, 1, 3];
        let normals = smooth_normals(&positions, &indices);

        assert_eq!(normals[2], Vec3::Z);
        assert_eq!(normals[3], Vec3::Y);
        let shared = normals[0];
        assert!((shared - Vec3::new(0.0, 1.0, 1.0).normalize()).length() < 1e-6);
    }
}
