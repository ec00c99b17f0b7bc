//! Wavefront OBJ / MTL loading
//!
//! Produces polygon faces grouped into objects, each with its material.
//! Only `map_Kd` images are decoded; the other maps are kept as paths.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use super::SceneError;
use crate::rasterizer::{Vec2, Vec3};

/// One corner of a polygon face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceVertex {
    pub pos: Vec3,
    pub uv: Option<Vec2>,
    pub normal: Option<Vec3>,
}

/// A polygon with any number of corners
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Face {
    pub vertices: Vec<FaceVertex>,
}

impl Face {
    pub fn has_normals(&self) -> bool {
        self.vertices.iter().any(|v| v.normal.is_some())
    }
}

/// Decoded image plus the path it came from
#[derive(Debug, Clone)]
pub struct TextureMap {
    pub path: PathBuf,
    pub image: Arc<image::DynamicImage>,
}

/// MTL material
#[derive(Debug, Clone, Default)]
pub struct Material {
    pub name: String,
    pub ns: f32,
    pub ni: f32,
    pub d: f32,
    pub tr: f32,
    pub tf: Vec3,
    pub illum: i32,
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub ke: Vec3,
    pub map_kd: Option<TextureMap>,
    pub map_ka: Option<PathBuf>,
    pub map_bump: Option<PathBuf>,
    pub bump: Option<PathBuf>,
}

/// Group of faces sharing one material
#[derive(Debug, Clone, Default)]
pub struct Object {
    pub name: String,
    pub faces: Vec<Face>,
    pub material: Material,
}

fn parse_err(line: usize, message: impl Into<String>) -> SceneError {
    SceneError::Parse { line, message: message.into() }
}

fn parse_f32(s: &str, line: usize) -> Result<f32, SceneError> {
    s.parse::<f32>()
        .map_err(|_| parse_err(line, format!("invalid number '{}'", s)))
}

/// Parse up to three floats; missing components are zero
fn parse_vec3(args: &[&str], line: usize) -> Result<Vec3, SceneError> {
    let mut v = [0.0f32; 3];
    for (slot, s) in v.iter_mut().zip(args) {
        *slot = parse_f32(s, line)?;
    }
    Ok(Vec3::new(v[0], v[1], v[2]))
}

fn parse_vec2(args: &[&str], line: usize) -> Result<Vec2, SceneError> {
    let v = parse_vec3(args, line)?;
    Ok(Vec2::new(v.x, v.y))
}

/// Resolve a 1-based (or negative, relative) OBJ index
fn resolve_index(token: &str, count: usize, kind: &'static str, line: usize) -> Result<usize, SceneError> {
    let raw: i64 = token
        .parse()
        .map_err(|_| parse_err(line, format!("invalid {} index '{}'", kind, token)))?;

    let idx = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        count as i64 + raw
    } else {
        -1
    };

    if idx < 0 || idx as usize >= count {
        return Err(SceneError::IndexOutOfRange { line, kind, index: raw });
    }
    Ok(idx as usize)
}

/// Resolves `mtllib` and texture paths
struct Resolver<'a> {
    dir: &'a Path,
    images: HashMap<PathBuf, Arc<image::DynamicImage>>,
}

impl<'a> Resolver<'a> {
    fn new(dir: &'a Path) -> Self {
        Self { dir, images: HashMap::new() }
    }

    fn texture(&mut self, name: &str) -> Result<TextureMap, SceneError> {
        let path = self.dir.join(name);
        if let Some(image) = self.images.get(&path) {
            return Ok(TextureMap { path, image: image.clone() });
        }
        let image = image::open(&path).map_err(|source| SceneError::Image {
            path: path.clone(),
            source,
        })?;
        let image = Arc::new(image);
        self.images.insert(path.clone(), image.clone());
        Ok(TextureMap { path, image })
    }
}

/// Parse MTL source. Texture paths resolve against `dir`.
pub fn parse_mtl(src: &str, dir: &Path) -> Result<HashMap<String, Material>, SceneError> {
    parse_mtl_with(src, &mut Resolver::new(dir))
}

fn parse_mtl_with(src: &str, resolver: &mut Resolver) -> Result<HashMap<String, Material>, SceneError> {
    let mut materials = HashMap::new();
    let mut current: Option<Material> = None;

    for (i, raw) in src.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let (cmd, args) = (parts[0], &parts[1..]);

        if cmd == "newmtl" {
            if let Some(m) = current.take() {
                materials.insert(m.name.clone(), m);
            }
            let name = args.first().ok_or_else(|| parse_err(line_no, "newmtl without a name"))?;
            current = Some(Material { name: name.to_string(), ..Material::default() });
            continue;
        }

        let Some(m) = current.as_mut() else {
            warn!("mtl line {}: '{}' before any newmtl, ignored", line_no, line);
            continue;
        };

        let first = || args.first().copied().ok_or_else(|| parse_err(line_no, format!("{} needs an argument", cmd)));
        // Map statements may carry options (-s, -o, ...); the file name comes last
        let last = || args.last().copied().ok_or_else(|| parse_err(line_no, format!("{} needs a file name", cmd)));

        match cmd {
            "Ka" => m.ka = parse_vec3(args, line_no)?,
            "Kd" => m.kd = parse_vec3(args, line_no)?,
            "Ks" => m.ks = parse_vec3(args, line_no)?,
            "Ke" => m.ke = parse_vec3(args, line_no)?,
            "Tf" => m.tf = parse_vec3(args, line_no)?,
            "Ns" => m.ns = parse_f32(first()?, line_no)?,
            "Ni" => m.ni = parse_f32(first()?, line_no)?,
            "d" => m.d = parse_f32(first()?, line_no)?,
            "Tr" => m.tr = parse_f32(first()?, line_no)?,
            "illum" => {
                let s = first()?;
                m.illum = s
                    .parse()
                    .map_err(|_| parse_err(line_no, format!("invalid illum '{}'", s)))?;
            }
            "map_Kd" => m.map_kd = Some(resolver.texture(last()?)?),
            "map_Ka" => m.map_ka = Some(resolver.dir.join(last()?)),
            "map_bump" => m.map_bump = Some(resolver.dir.join(last()?)),
            "bump" => m.bump = Some(resolver.dir.join(last()?)),
            _ => debug!("mtl line {}: unrecognized '{}'", line_no, line),
        }
    }

    if let Some(m) = current {
        materials.insert(m.name.clone(), m);
    }

    Ok(materials)
}

/// Parse OBJ source. `mtllib` and texture paths resolve against `dir`.
pub fn parse_obj(src: &str, dir: &Path) -> Result<Vec<Object>, SceneError> {
    let mut resolver = Resolver::new(dir);

    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut materials: HashMap<String, Material> = HashMap::new();

    let mut objects = Vec::new();
    let mut current = Object::default();

    // Close the current object (if it has faces) and start a fresh one
    fn flush(objects: &mut Vec<Object>, current: &mut Object, name: String, material: Material) {
        let next = Object { name, faces: Vec::new(), material };
        let done = std::mem::replace(current, next);
        if !done.faces.is_empty() {
            objects.push(done);
        }
    }

    for (i, raw) in src.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let (cmd, args) = (parts[0], &parts[1..]);

        match cmd {
            "v" => positions.push(parse_vec3(args, line_no)?),
            "vt" => uvs.push(parse_vec2(args, line_no)?),
            "vn" => normals.push(parse_vec3(args, line_no)?),
            "f" => {
                let mut face = Face::default();
                for token in args {
                    let mut refs = token.split('/');
                    let pos_ref = refs.next().unwrap_or("");
                    let uv_ref = refs.next().filter(|s| !s.is_empty());
                    let normal_ref = refs.next().filter(|s| !s.is_empty());

                    let pos = positions[resolve_index(pos_ref, positions.len(), "vertex", line_no)?];
                    let uv = match uv_ref {
                        Some(r) => Some(uvs[resolve_index(r, uvs.len(), "texture coordinate", line_no)?]),
                        None => None,
                    };
                    let normal = match normal_ref {
                        Some(r) => Some(normals[resolve_index(r, normals.len(), "normal", line_no)?]),
                        None => None,
                    };

                    face.vertices.push(FaceVertex { pos, uv, normal });
                }
                current.faces.push(face);
            }
            "g" | "o" => {
                let name = args.join(" ");
                flush(&mut objects, &mut current, name, Material::default());
            }
            "mtllib" => {
                for lib in args {
                    let path = resolver.dir.join(lib);
                    let src = fs::read_to_string(&path).map_err(|source| SceneError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    materials.extend(parse_mtl_with(&src, &mut resolver)?);
                }
            }
            "usemtl" => {
                let name = args.first().copied().unwrap_or("");
                let material = match materials.get(name) {
                    Some(m) => m.clone(),
                    None => {
                        warn!("obj line {}: unknown material '{}'", line_no, name);
                        Material::default()
                    }
                };
                if current.faces.is_empty() {
                    current.material = material;
                } else {
                    // Material switch mid-group: faces so far keep the old one
                    let name = current.name.clone();
                    flush(&mut objects, &mut current, name, material);
                }
            }
            _ => debug!("obj line {}: unrecognized '{}'", line_no, line),
        }
    }

    if !current.faces.is_empty() {
        objects.push(current);
    }

    Ok(objects)
}

/// Load an OBJ file; `mtllib` paths are relative to the file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Vec<Object>, SceneError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_obj(&src, dir)
}
