use anyhow::{bail, Context, Result};
use glam::{Mat4, Vec3};
use std::path::Path;

use crate::types::{MeshVertex, AABB};

/// A station model flattened to a single lit triangle list, ready for upload.
#[derive(Debug, Clone)]
pub struct StationModel {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub bounds: AABB,
}

impl StationModel {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Loads a glTF station model and flattens the node tree into one mesh.
///
/// The model is shifted so its horizontal bounding-box center sits on the
/// origin, matching the waypoint coordinate frame. Heights are untouched.
pub fn load_station_model(path: impl AsRef<Path>) -> Result<StationModel> {
    let path = path.as_ref();
    println!("Loading station model: {:?}", path);

    let (document, buffers, _images) = gltf::import(path)
        .context(format!("Failed to load glTF file: {:?}", path))?;

    println!("glTF loaded successfully:");
    println!("  Scenes: {}", document.scenes().count());
    println!("  Nodes: {}", document.nodes().count());
    println!("  Meshes: {}", document.meshes().count());

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for scene in document.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut vertices, &mut indices)?;
        }
    }

    if vertices.is_empty() {
        bail!("No triangle geometry found in {:?}", path);
    }

    recenter_horizontal(&mut vertices);
    let bounds = compute_bounds(&vertices);
    let model = StationModel {
        vertices,
        indices,
        bounds,
    };

    println!(
        "Station model: {} vertices, {} triangles, extent {:?}",
        model.vertices.len(),
        model.triangle_count(),
        model.bounds.size()
    );

    Ok(model)
}

/// Recursively walks glTF nodes, accumulating transforms.
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    vertices: &mut Vec<MeshVertex>,
    indices: &mut Vec<u32>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, vertices, indices)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, vertices, indices)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    vertices: &mut Vec<MeshVertex>,
    indices: &mut Vec<u32>,
) -> Result<()> {
    // Directions transform differently from points under scaling.
    let normal_matrix = transform.inverse().transpose();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<Vec3> = match reader.read_positions() {
            Some(read) => read
                .map(|pos| transform.transform_point3(Vec3::from_array(pos)))
                .collect(),
            None => continue,
        };

        if positions.is_empty() {
            continue;
        }

        let primitive_indices: Vec<u32> = match reader.read_indices() {
            Some(read) => read.into_u32().collect(),
            // Unindexed primitives are a plain triangle list.
            None => (0..positions.len() as u32).collect(),
        };

        let normals: Vec<Vec3> = match reader.read_normals() {
            Some(read) => read
                .map(|n| {
                    normal_matrix
                        .transform_vector3(Vec3::from_array(n))
                        .normalize_or_zero()
                })
                .collect(),
            None => smooth_normals(&positions, &primitive_indices),
        };

        let material = primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor();
        let material_color = [material[0], material[1], material[2]];

        let colors: Vec<[f32; 3]> = match reader.read_colors(0) {
            Some(read) => read.into_rgb_f32().collect(),
            None => vec![material_color; positions.len()],
        };

        let base = vertices.len() as u32;
        for ((position, normal), color) in positions.iter().zip(&normals).zip(&colors) {
            vertices.push(MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                color: *color,
            });
        }
        indices.extend(primitive_indices.iter().map(|i| base + i));
    }

    Ok(())
}

/// Area-weighted vertex normals for primitives that ship without them.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let (a, b, c) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

/// Shifts vertices so the horizontal bounding-box center lands on the
/// origin, leaving heights alone. Returns the applied offset.
pub fn recenter_horizontal(vertices: &mut [MeshVertex]) -> Vec3 {
    if vertices.is_empty() {
        return Vec3::ZERO;
    }

    let center = compute_bounds(vertices).center();
    let offset = Vec3::new(-center.x, 0.0, -center.z);
    for vertex in vertices.iter_mut() {
        vertex.position = (Vec3::from_array(vertex.position) + offset).to_array();
    }
    offset
}

/// Computes the overall bounding box for a vertex list.
pub fn compute_bounds(vertices: &[MeshVertex]) -> AABB {
    let mut bounds = AABB {
        min: Vec3::from_array(vertices[0].position),
        max: Vec3::from_array(vertices[0].position),
    };
    for vertex in vertices.iter().skip(1) {
        bounds.grow(Vec3::from_array(vertex.position));
    }
    bounds
}
