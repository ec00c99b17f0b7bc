//! Viewer state: everything that changes from one frame to the next
//!
//! Kept free of any windowing code so frames can be driven headless.

use log::info;

use crate::config::RenderConfig;
use crate::rasterizer::{
    render_frame, CameraDelta, CameraPose, FrameStats, Framebuffer, ModelPose, RasterSettings,
    Triangle,
};
use crate::record::Recorder;

/// Input gathered for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub camera: CameraDelta,
    /// Model spin change (radians)
    pub model_rotation: f32,
    /// Seconds since the previous frame
    pub elapsed: f32,
}

/// Main application state
pub struct AppState {
    pub config: RenderConfig,
    pub triangles: Vec<Triangle>,
    pub framebuffer: Framebuffer,
    pub camera: CameraPose,
    /// Spin applied around both Y and X on top of the configured model pose
    pub model_rotation: f32,
    /// Frames rendered so far
    pub frame: usize,
    pub recorder: Option<Recorder>,
    settings: RasterSettings,
}

impl AppState {
    pub fn new(config: RenderConfig, triangles: Vec<Triangle>) -> Self {
        let recorder = config
            .record
            .enabled
            .then(|| Recorder::new(config.record.frames, config.record.frame_delay_ms));
        if recorder.is_some() {
            info!(
                "recording {} frames to {}",
                config.record.frames,
                config.record.output.display()
            );
        }

        Self {
            framebuffer: Framebuffer::new(config.width, config.height),
            camera: config.camera,
            model_rotation: 0.0,
            frame: 0,
            recorder,
            settings: config.raster_settings(),
            triangles,
            config,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Apply input. While recording the spin follows the frame counter so
    /// the animation is independent of frame timing.
    pub fn advance(&mut self, input: &FrameInput) {
        self.camera.apply(&input.camera, input.elapsed, self.config.move_speed);

        if self.is_recording() {
            self.model_rotation = self.frame as f32 * self.config.record.spin_per_frame;
        } else {
            self.model_rotation += input.model_rotation;
        }
    }

    pub fn model_pose(&self) -> ModelPose {
        let base = self.config.model;
        ModelPose {
            rotation_y: base.rotation_y + self.model_rotation,
            rotation_x: base.rotation_x + self.model_rotation,
            ..base
        }
    }

    /// Render into the framebuffer and capture it if recording
    pub fn render(&mut self) -> FrameStats {
        let model = self.model_pose();
        let stats = render_frame(
            &mut self.framebuffer,
            &self.triangles,
            &self.camera,
            &model,
            &self.settings,
        );

        if let Some(rec) = self.recorder.as_mut() {
            rec.push(&self.framebuffer);
        }
        self.frame += 1;
        stats
    }

    /// Advance and render one frame
    pub fn step(&mut self, input: &FrameInput) -> FrameStats {
        self.advance(input);
        self.render()
    }

    /// True once the recorder holds every requested frame
    pub fn recording_finished(&self) -> bool {
        self.recorder.as_ref().is_some_and(Recorder::is_full)
    }

    pub fn take_recorder(&mut self) -> Option<Recorder> {
        self.recorder.take()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::rasterizer::{Color, Vec3};
    use crate::scene::test_cube;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 32,
            height: 32,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_model_rotation_accumulates() {
        let mut app = AppState::new(small_config(), Vec::new());
        let input = FrameInput { model_rotation: 0.1, ..FrameInput::default() };
        app.advance(&input);
        app.advance(&input);
        assert!((app.model_rotation - 0.2).abs() < 1e-6);

        let pose = app.model_pose();
        assert!((pose.rotation_y - 0.2).abs() < 1e-6);
        assert!((pose.rotation_x - 0.2).abs() < 1e-6);
        assert_eq!(pose.scale, Vec3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_camera_moves_with_elapsed_time() {
        let mut app = AppState::new(small_config(), Vec::new());
        let input = FrameInput {
            camera: CameraDelta { movement: Vec3::new(0.0, 0.0, -1.0), ..CameraDelta::default() },
            elapsed: 0.1,
            ..FrameInput::default()
        };
        app.advance(&input);
        // 10 units/s for 0.1 s, starting at z = 5
        assert!((app.camera.position.z - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_recording_spin_follows_frame_counter() {
        let mut config = small_config();
        config.record.enabled = true;
        config.record.frames = 3;
        let mut app = AppState::new(config, test_cube());

        // Manual spin is ignored while recording
        let input = FrameInput { model_rotation: 5.0, ..FrameInput::default() };
        app.step(&input);
        assert_eq!(app.model_rotation, 0.0);
        app.step(&input);
        assert!((app.model_rotation - PI / 100.0).abs() < 1e-6);
        assert!(!app.recording_finished());
        app.step(&input);
        assert!(app.recording_finished());
        assert_eq!(app.take_recorder().map(|r| r.len()), Some(3));
    }

    #[test]
    fn test_step_renders_cube() {
        let mut app = AppState::new(small_config(), test_cube());
        let stats = app.step(&FrameInput::default());
        assert_eq!(stats.submitted, 12);
        assert!(stats.pixels_written > 0);
        assert!(!stats.lighting_fallback);
        // Cube sits in front of the camera, covering the centre
        assert_ne!(app.framebuffer.pixel(16, 16), Some(Color::BACKGROUND));
        assert_eq!(app.frame, 1);
    }

    #[test]
    fn test_empty_scene_is_background() {
        let mut app = AppState::new(small_config(), Vec::new());
        let stats = app.step(&FrameInput::default());
        assert_eq!(stats.submitted, 0);
        assert_eq!(app.framebuffer.pixel(0, 0), Some(Color::BACKGROUND));
        assert_eq!(app.framebuffer.pixel(31, 31), Some(Color::BACKGROUND));
    }
}
