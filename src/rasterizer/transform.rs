//! Transform stage: camera/model poses to clip space, per-vertex lighting

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::math::{Mat4, Vec3, Vec4};
use super::types::{Triangle, TransformedTriangle, Varyings, Vertex};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    #[error("non-invertible transform: model-view matrix is singular")]
    NonInvertible,
}

/// Free-look camera. Yaw turns around +Y, pitch around +X.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

/// Per-frame camera change coming from input
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraDelta {
    /// Movement direction in camera-local axes (x right, z backward)
    pub movement: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraPose {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self { position, yaw, pitch: pitch.clamp(-FRAC_PI_2, FRAC_PI_2) }
    }

    /// Apply rotation first, then move along the updated orientation.
    /// `speed` is in units per second.
    pub fn apply(&mut self, delta: &CameraDelta, elapsed: f32, speed: f32) {
        self.yaw += delta.yaw;
        self.pitch = (self.pitch + delta.pitch).clamp(-FRAC_PI_2, FRAC_PI_2);

        if delta.movement != Vec3::ZERO {
            let world = self.orientation() * (delta.movement * (speed * elapsed)).extend(0.0);
            self.position = self.position + world.xyz();
        }
    }

    /// Camera-to-world rotation
    pub fn orientation(&self) -> Mat4 {
        Mat4::IDENTITY.rotate_y(-self.yaw).rotate_x(-self.pitch)
    }

    /// World-to-camera matrix
    pub fn view(&self) -> Mat4 {
        Mat4::IDENTITY
            .rotate_x(self.pitch)
            .rotate_y(self.yaw)
            .translate(-self.position)
    }
}

/// Model placement, composed as scale -> rotate Y -> rotate X -> translate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPose {
    pub scale: Vec3,
    pub rotation_y: f32,
    pub rotation_x: f32,
    pub translation: Vec3,
}

impl Default for ModelPose {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation_y: 0.0,
            rotation_x: 0.0,
            translation: Vec3::ZERO,
        }
    }
}

impl ModelPose {
    pub fn matrix(&self) -> Mat4 {
        Mat4::IDENTITY
            .scale(self.scale)
            .rotate_y(self.rotation_y)
            .rotate_x(self.rotation_x)
            .translate(self.translation)
    }
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self { fov_degrees: 70.0, near: 1.0, far: 150.0 }
    }
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::IDENTITY.perspective(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// Directional diffuse lighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    /// Direction towards the light, in world space
    pub direction: Vec3,
    /// Base diffuse color, 0.0-1.0 per channel
    pub diffuse: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            direction: Vec3::new(1.0, 1.0, 1.0),
            diffuse: Vec3::new(0.4, 0.4, 1.0),
        }
    }
}

/// Matrices for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameTransforms {
    pub view: Mat4,
    pub model_view: Mat4,
    pub model_view_projection: Mat4,
    /// Inverse-transpose of the model-view matrix. `None` when the model-view
    /// matrix is singular; vertices are then left unlit (white).
    pub normal_transform: Option<Mat4>,
    /// Normalized light direction in view space
    pub light_dir: Vec3,
}

impl FrameTransforms {
    /// Compose `projection * view * model` and the normal transform
    pub fn new(
        camera: &CameraPose,
        model: &ModelPose,
        projection: &Mat4,
        lighting: &Lighting,
    ) -> Result<Self, TransformError> {
        let xf = Self::without_normals(camera, model, projection, lighting);
        let normal_transform = xf
            .model_view
            .inverse_transpose()
            .ok_or(TransformError::NonInvertible)?;
        Ok(Self { normal_transform: Some(normal_transform), ..xf })
    }

    /// Positions only; used when the normal transform cannot be built
    pub fn without_normals(
        camera: &CameraPose,
        model: &ModelPose,
        projection: &Mat4,
        lighting: &Lighting,
    ) -> Self {
        let view = camera.view();
        let model_view = view.multiply(&model.matrix());
        let model_view_projection = projection.multiply(&model_view);
        let light_dir = (view * lighting.direction.extend(0.0)).xyz().normalize();

        Self {
            view,
            model_view,
            model_view_projection,
            normal_transform: None,
            light_dir,
        }
    }

    /// Diffuse color for one vertex normal: `max(0, N.L) * diffuse`
    pub fn shade_normal(&self, normal: Vec3, diffuse: Vec3) -> Vec3 {
        match self.normal_transform {
            Some(nt) => {
                let eye = (nt * normal.extend(0.0)).xyz().normalize();
                diffuse * eye.dot(self.light_dir).max(0.0)
            }
            None => Vec3::ONE,
        }
    }

    pub fn to_clip(&self, pos: Vec3) -> Vec4 {
        self.model_view_projection * pos.extend(1.0)
    }

    fn transform_vertex(&self, v: &Vertex, diffuse: Vec3) -> (Vec4, Varyings) {
        let clip = self.to_clip(v.pos);
        let color = self.shade_normal(v.normal, diffuse);
        (clip, Varyings::new(color, v.uv))
    }

    /// Derive the per-frame triangle; the source is left untouched
    pub fn transform_triangle(&self, tri: &Triangle, lighting: &Lighting) -> TransformedTriangle {
        let (c0, v0) = self.transform_vertex(&tri.vertices[0], lighting.diffuse);
        let (c1, v1) = self.transform_vertex(&tri.vertices[1], lighting.diffuse);
        let (c2, v2) = self.transform_vertex(&tri.vertices[2], lighting.diffuse);

        TransformedTriangle {
            clip: [c0, c1, c2],
            varyings: [v0, v1, v2],
            texture: tri.texture.clone(),
        }
    }

    pub fn transform_triangles(&self, triangles: &[Triangle], lighting: &Lighting) -> Vec<TransformedTriangle> {
        triangles
            .iter()
            .map(|tri| self.transform_triangle(tri, lighting))
            .collect()
    }
}
