//! Scene preparation: polygon faces to immutable triangles
//!
//! Faces are fan-triangulated around their first corner. Missing normals are
//! synthesized from the face plane, missing texture coordinates become zero.
//! Each distinct diffuse image is converted to a [`Texture`] once and shared.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, warn};

use super::obj::{Face, FaceVertex, Object};
use crate::rasterizer::{Color, Texture, TextureBinding, Triangle, Vec2, Vec3, Vertex};

/// Flat normal of the plane through three points, counter-clockwise front
pub fn face_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    (p1 - p0).cross(p2 - p0).normalize()
}

/// Append a face's fan triangles to `out`. Returns false if the face has
/// fewer than three corners.
pub fn triangulate(face: &Face, texture: &TextureBinding, out: &mut Vec<Triangle>) -> bool {
    let corners = &face.vertices;
    if corners.len() < 3 {
        return false;
    }

    let flat = if face.has_normals() {
        None
    } else {
        Some(face_normal(corners[0].pos, corners[1].pos, corners[2].pos))
    };

    let vertex = |c: &FaceVertex| Vertex {
        pos: c.pos,
        uv: c.uv.unwrap_or(Vec2::ZERO),
        normal: c.normal.or(flat).unwrap_or(Vec3::ZERO),
    };

    for i in 1..corners.len() - 1 {
        out.push(Triangle::new(
            [vertex(&corners[0]), vertex(&corners[i]), vertex(&corners[i + 1])],
            texture.clone(),
        ));
    }
    true
}

/// Flatten loaded objects into triangles
pub fn prepare_triangles(objects: &[Object]) -> Vec<Triangle> {
    let mut textures: HashMap<PathBuf, Arc<Texture>> = HashMap::new();
    let mut triangles = Vec::new();
    let mut dropped = 0;

    for object in objects {
        let binding = match &object.material.map_kd {
            Some(map) => {
                let tex = textures.entry(map.path.clone()).or_insert_with(|| {
                    debug!("converting texture {}", map.path.display());
                    Arc::new(Texture::from_image(&map.image, map.path.display().to_string()))
                });
                TextureBinding::Bound(tex.clone())
            }
            None => TextureBinding::None,
        };

        for face in &object.faces {
            if !triangulate(face, &binding, &mut triangles) {
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!("dropped {} faces with fewer than three vertices", dropped);
    }

    triangles
}

/// Built-in textured cube, used when no scene file is configured
pub fn test_cube() -> Vec<Triangle> {
    let corners = [
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
    ];
    let quads = [
        [0, 1, 2, 3], // front
        [5, 4, 7, 6], // back
        [3, 2, 6, 7], // top
        [4, 5, 1, 0], // bottom
        [1, 5, 6, 2], // right
        [4, 0, 3, 7], // left
    ];
    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let texture = TextureBinding::bound(Texture::checkerboard(32, 32, Color::WHITE, Color::new(60, 60, 200)));
    let mut triangles = Vec::with_capacity(12);
    for quad in quads {
        let face = Face {
            vertices: quad
                .iter()
                .zip(uvs)
                .map(|(&i, uv)| FaceVertex { pos: corners[i], uv: Some(uv), normal: None })
                .collect(),
        };
        triangulate(&face, &texture, &mut triangles);
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, TextureMap};

    fn corner(x: f32, y: f32, z: f32) -> FaceVertex {
        FaceVertex { pos: Vec3::new(x, y, z), uv: None, normal: None }
    }

    fn polygon(n: usize) -> Face {
        let vertices = (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                corner(a.cos(), a.sin(), 0.0)
            })
            .collect();
        Face { vertices }
    }

    #[test]
    fn test_fan_triangulation() {
        let mut out = Vec::new();
        assert!(triangulate(&polygon(5), &TextureBinding::None, &mut out));
        assert_eq!(out.len(), 3);

        let face = polygon(5);
        for (k, tri) in out.iter().enumerate() {
            assert_eq!(tri.vertices[0].pos, face.vertices[0].pos);
            assert_eq!(tri.vertices[1].pos, face.vertices[k + 1].pos);
            assert_eq!(tri.vertices[2].pos, face.vertices[k + 2].pos);
        }
    }

    #[test]
    fn test_short_faces_dropped() {
        let object = Object {
            name: "broken".to_string(),
            faces: vec![polygon(2), polygon(3), Face::default()],
            material: Material::default(),
        };
        let tris = prepare_triangles(&[object]);
        assert_eq!(tris.len(), 1);
    }

    #[test]
    fn test_synthesized_normal_and_zero_uvs() {
        let face = Face {
            vertices: vec![corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 0.0), corner(0.0, 1.0, 0.0)],
        };
        let mut out = Vec::new();
        triangulate(&face, &TextureBinding::None, &mut out);
        for v in &out[0].vertices {
            assert_eq!(v.normal, Vec3::Z);
            assert_eq!(v.uv, Vec2::ZERO);
        }
    }

    #[test]
    fn test_given_normals_are_kept() {
        let n = Vec3::new(0.0, 1.0, 0.0);
        let mut face = polygon(3);
        for v in &mut face.vertices {
            v.normal = Some(n);
        }
        let mut out = Vec::new();
        triangulate(&face, &TextureBinding::None, &mut out);
        assert!(out[0].vertices.iter().all(|v| v.normal == n));
    }

    #[test]
    fn test_texture_converted_once_and_shared() {
        let img = image::RgbaImage::from_pixel(2, 1, image::Rgba([1, 2, 3, 255]));
        let map = TextureMap {
            path: PathBuf::from("skin.png"),
            image: Arc::new(image::DynamicImage::ImageRgba8(img)),
        };
        let material = Material { map_kd: Some(map), ..Material::default() };
        let objects = vec![
            Object { name: "a".to_string(), faces: vec![polygon(3)], material: material.clone() },
            Object { name: "b".to_string(), faces: vec![polygon(4)], material },
            Object { name: "c".to_string(), faces: vec![polygon(3)], material: Material::default() },
        ];

        let tris = prepare_triangles(&objects);
        assert_eq!(tris.len(), 4);

        let (TextureBinding::Bound(a), TextureBinding::Bound(b)) = (&tris[0].texture, &tris[2].texture) else {
            panic!("expected bound textures");
        };
        assert!(Arc::ptr_eq(a, b));
        assert_eq!(a.pixels[0], Color::new(1, 2, 3));
        assert!(!tris[3].texture.is_bound());
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let cube = test_cube();
        assert_eq!(cube.len(), 12);
        for tri in &cube {
            let centroid = (tri.vertices[0].pos + tri.vertices[1].pos + tri.vertices[2].pos) * (1.0 / 3.0);
            assert!(tri.vertices[0].normal.dot(centroid) > 0.0);
            assert!(tri.texture.is_bound());
        }
    }
}
