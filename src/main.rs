//! Softraster viewer
//!
//! Usage: `softraster [config.ron]`
//!
//! Controls:
//! - WASD: move
//! - Right mouse drag: look around
//! - Q/E: spin the model
//! - F12: save the current frame to frame.png
//! - Escape: quit

use log::{error, info, warn};
use macroquad::prelude::*;

use softraster::app::{AppState, FrameInput};
use softraster::config::{load_config, RenderConfig};
use softraster::rasterizer::{self, CameraDelta, HEIGHT, WIDTH};
use softraster::record::save_frame;
use softraster::scene::{load_scene, test_cube};
use softraster::VERSION;

const SCREENSHOT_PATH: &str = "frame.png";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Softraster v{}", VERSION),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Mouse state carried between frames
struct MouseLook {
    last: (f32, f32),
    captured: bool,
}

impl MouseLook {
    fn new() -> Self {
        Self { last: mouse_position(), captured: false }
    }

    /// Yaw/pitch change from a right-button drag
    fn delta(&mut self, sensitivity: f32) -> (f32, f32) {
        let pos = mouse_position();
        let mut turn = (0.0, 0.0);
        if is_mouse_button_down(MouseButton::Right) {
            if self.captured {
                turn = (
                    (pos.0 - self.last.0) * sensitivity,
                    (pos.1 - self.last.1) * sensitivity,
                );
            }
            self.captured = true;
        } else {
            self.captured = false;
        }
        self.last = pos;
        turn
    }
}

fn read_input(mouse: &mut MouseLook, config: &RenderConfig) -> FrameInput {
    let mut movement = rasterizer::Vec3::ZERO;
    if is_key_down(KeyCode::D) {
        movement.x += 1.0;
    }
    if is_key_down(KeyCode::A) {
        movement.x -= 1.0;
    }
    if is_key_down(KeyCode::W) {
        movement.z -= 1.0;
    }
    if is_key_down(KeyCode::S) {
        movement.z += 1.0;
    }

    let mut model_rotation = 0.0;
    if is_key_down(KeyCode::E) {
        model_rotation += config.rotation_step;
    }
    if is_key_down(KeyCode::Q) {
        model_rotation -= config.rotation_step;
    }

    let (yaw, pitch) = mouse.delta(config.mouse_sensitivity);

    FrameInput {
        camera: CameraDelta { movement, yaw, pitch },
        model_rotation,
        elapsed: get_frame_time(),
    }
}

/// Scale the framebuffer to fit the window, keeping its aspect ratio
fn present(fb: &rasterizer::Framebuffer) {
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Nearest);

    let (screen_w, screen_h) = (screen_width(), screen_height());
    let scale = (screen_w / fb.width as f32).min(screen_h / fb.height as f32);
    let (draw_w, draw_h) = (fb.width as f32 * scale, fb.height as f32 * scale);

    draw_texture_ex(
        &texture,
        ((screen_w - draw_w) * 0.5).floor(),
        ((screen_h - draw_h) * 0.5).floor(),
        WHITE,
        DrawTextureParams {
            dest_size: Some(Vec2::new(draw_w, draw_h)),
            ..Default::default()
        },
    );
}

fn startup_config() -> Option<RenderConfig> {
    match std::env::args().nth(1) {
        Some(path) => match load_config(&path) {
            Ok(config) => {
                info!("loaded config {}", path);
                Some(config)
            }
            Err(e) => {
                error!("failed to load config {}: {}", path, e);
                None
            }
        },
        None => Some(RenderConfig::default()),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(config) = startup_config() else {
        return;
    };

    let triangles = match &config.scene {
        Some(path) => match load_scene(path) {
            Ok(triangles) => triangles,
            Err(e) => {
                error!("failed to load scene {}: {}", path.display(), e);
                return;
            }
        },
        None => {
            info!("no scene configured, showing the test cube");
            test_cube()
        }
    };

    let mut app = AppState::new(config, triangles);
    let mut mouse = MouseLook::new();

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        let input = read_input(&mut mouse, &app.config);
        let start = get_time();
        let stats = app.step(&input);
        let render_ms = (get_time() - start) * 1000.0;

        if is_key_pressed(KeyCode::F12) {
            if let Err(e) = save_frame(&app.framebuffer, SCREENSHOT_PATH) {
                warn!("{}", e);
            }
        }

        clear_background(Color::from_rgba(0, 0, 0, 255));
        present(&app.framebuffer);

        draw_text(
            &format!(
                "{:.1} ms | {} tris, {} drawn, {} culled, {} clipped",
                render_ms,
                stats.submitted,
                stats.rasterized,
                stats.back_facing + stats.degenerate,
                stats.clipped
            ),
            5.0,
            16.0,
            16.0,
            Color::from_rgba(200, 200, 200, 255),
        );

        if app.recording_finished() {
            break;
        }

        next_frame().await;
    }

    if let Some(recorder) = app.take_recorder() {
        let output = app.config.record.output.clone();
        if let Err(e) = recorder.write_gif(&output) {
            error!("{}", e);
        }
    }
}
