use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{error, info};

use mandelgl_core::{mandelbrot_uniforms, Canvas, ViewSettings, ViewportState};
use mandelgl_render::{export_png, render_frame, ProgramSet, ScreenshotMetadata};

/// How long the flash stays fully white before fading.
const FLASH_HOLD: Duration = Duration::from_millis(100);
const FLASH_FADE: Duration = Duration::from_millis(300);

/// Render the current Mandelbrot view at full canvas resolution on a
/// background thread and save it as a PNG in the user's pictures folder.
///
/// Returns false when the canvas has nothing to capture.
pub(crate) fn capture(state: &ViewportState, canvas: &Canvas, settings: &ViewSettings) -> bool {
    let Some(uniforms) = mandelbrot_uniforms(state, canvas, settings) else {
        return false;
    };
    let (width, height) = canvas.pixel_size();
    let metadata = ScreenshotMetadata {
        center: uniforms.center,
        zoom: state.zoom,
        max_iterations: uniforms.max_iterations,
        theme: uniforms.theme,
        color_compression: uniforms.color_compression,
        julia_constant: state.julia_constant,
    };
    let path = unique_path(&screenshot_dir(), "mandelbrot_screenshot", "png");

    thread::spawn(move || {
        let programs = ProgramSet::build();
        let saved = render_frame(&programs.mandelbrot(&uniforms), width, height)
            .and_then(|result| export_png(&result.buffer, &path, &metadata));
        match saved {
            Ok(()) => info!("Saved screenshot to {}", path.display()),
            Err(e) => error!("Screenshot failed: {e}"),
        }
    });
    true
}

/// Opacity of the white capture flash `elapsed` after it started, or `None`
/// once it is over.
pub(crate) fn flash_alpha(elapsed: Duration) -> Option<u8> {
    if elapsed <= FLASH_HOLD {
        return Some(255);
    }
    let fade = (elapsed - FLASH_HOLD).as_secs_f32() / FLASH_FADE.as_secs_f32();
    if fade >= 1.0 {
        return None;
    }
    Some(((1.0 - fade) * 255.0).round() as u8)
}

/// Paint the capture flash over `rect`. Clears `started` when it is done.
pub(crate) fn paint_flash(ui: &egui::Ui, rect: egui::Rect, started: &mut Option<Instant>) {
    let Some(start) = *started else {
        return;
    };
    match flash_alpha(start.elapsed()) {
        Some(alpha) => {
            ui.painter()
                .rect_filled(rect, 0.0, egui::Color32::from_white_alpha(alpha));
            ui.ctx().request_repaint();
        }
        None => *started = None,
    }
}

fn screenshot_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|d| d.picture_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn unique_path(dir: &Path, name: &str, ext: &str) -> PathBuf {
    let base = dir.join(format!("{name}.{ext}"));
    if !base.exists() {
        return base;
    }
    for i in 1..10000 {
        let candidate = dir.join(format!("{name}_{i:03}.{ext}"));
        if !candidate.exists() {
            return candidate;
        }
    }
    dir.join(format!("{name}_latest.{ext}"))
}
