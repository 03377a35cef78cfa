use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{debug, info, warn};

use mandelgl_core::{animation, frame_uniforms, Canvas, Gestures, Theme, ViewportState};
use mandelgl_render::RenderResult;

use crate::input::EventTranslator;
use crate::julia_panel::{self, JuliaPanelParams};
use crate::preferences::AppPreferences;
use crate::render_bridge::{FrameJob, RenderBridge, View, ViewUniforms};
use crate::screenshot;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// While the view is easing, the Mandelbrot frame renders at
/// 1/PREVIEW_DOWNSCALE of the full resolution.
pub(crate) const PREVIEW_DOWNSCALE: u32 = 2;
/// Highest exponent the iteration slider offers (`2^14`).
pub(crate) const MAX_UI_EXPONENT: i32 = 14;
pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;
const SIDE_PANEL_PADDING: f32 = 16.0;

/// Size and timing of the last Mandelbrot frame shown, for the HUD.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameStats {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) elapsed: Duration,
    pub(crate) preview: bool,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub(crate) struct MandelGlApp {
    pub(crate) state: ViewportState,
    pub(crate) gestures: Gestures,
    pub(crate) preferences: AppPreferences,
    translator: EventTranslator,
    bridge: RenderBridge,

    mandelbrot_texture: Option<egui::TextureHandle>,
    julia_texture: Option<egui::TextureHandle>,
    mandelbrot_canvas: Canvas,
    julia_canvas: Canvas,

    pub(crate) iteration_exponent: i32,
    pub(crate) frame_stats: Option<FrameStats>,
    pub(crate) animating: bool,
    pub(crate) show_help: bool,
    /// Gradient previews per theme id, baked once.
    pub(crate) theme_strips: [Vec<[u8; 4]>; 4],
    flash_started: Option<Instant>,
}

impl MandelGlApp {
    pub(crate) fn new(ctx: &egui::Context, preferences: AppPreferences) -> Self {
        let settings = preferences.view.clone();
        let state = ViewportState::new(&settings);
        let iteration_exponent = (state.max_iterations.max(1).ilog2() as i32).min(MAX_UI_EXPONENT);
        info!(
            max_iterations = state.max_iterations,
            theme = state.theme.label(),
            "Starting at the initial view"
        );

        Self {
            state,
            gestures: Gestures::new(settings),
            preferences,
            translator: EventTranslator::new(),
            bridge: RenderBridge::spawn(ctx),
            mandelbrot_texture: None,
            julia_texture: None,
            mandelbrot_canvas: Canvas::new(0.0, 0.0, 1.0),
            julia_canvas: Canvas::new(0.0, 0.0, 1.0),
            iteration_exponent,
            frame_stats: None,
            animating: false,
            show_help: false,
            theme_strips: crate::ui::controls::theme_strips(),
            flash_started: None,
        }
    }

    pub(crate) fn renderer_ready(&self) -> bool {
        self.bridge.is_ready()
    }

    // -- UI setters ---------------------------------------------------------

    pub(crate) fn set_iteration_exponent(&mut self, exponent: i32) {
        match self.state.set_max_iterations_from_slider(exponent) {
            Ok(_) => self.iteration_exponent = exponent,
            Err(e) => warn!("Keeping iteration cap: {e}"),
        }
    }

    pub(crate) fn set_theme(&mut self, theme: Theme) {
        if let Err(e) = self.state.set_theme(theme.id()) {
            warn!("Keeping theme: {e}");
        }
    }

    pub(crate) fn set_color_compression(&mut self, value: f64) {
        if let Err(e) = self.state.set_color_compression(value) {
            warn!("Keeping color compression: {e}");
        }
    }

    pub(crate) fn take_screenshot(&mut self) {
        if screenshot::capture(
            &self.state,
            &self.mandelbrot_canvas,
            self.gestures.settings(),
        ) {
            self.flash_started = Some(Instant::now());
        }
    }

    // -- Input --------------------------------------------------------------

    /// Feed this frame's events for the Mandelbrot canvas to the handlers.
    fn handle_canvas_input(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        let (events, modifiers) = ctx.input(|i| (i.events.clone(), i.modifiers));
        let keyboard_free = !ctx.wants_keyboard_input();
        let translated = self.translator.translate(
            &events,
            modifiers,
            rect,
            ctx.pixels_per_point(),
            keyboard_free,
        );

        for event in &translated {
            let outcome = self
                .gestures
                .handle(&mut self.state, &self.mandelbrot_canvas, event);
            if outcome.julia_changed {
                // The Julia view follows the pointer without waiting for the
                // regular submission at the end of the tick.
                self.submit_julia();
            }
        }
    }

    // -- Rendering ----------------------------------------------------------

    fn submit(&mut self, job: FrameJob) {
        if let Err(e) = self.bridge.submit(job) {
            debug!("Skipping frame: {e}");
        }
    }

    fn submit_julia(&mut self) {
        let frame = frame_uniforms(
            &self.state,
            &self.mandelbrot_canvas,
            &self.julia_canvas,
            self.gestures.settings(),
        );
        if let Some(u) = frame.julia {
            let (width, height) = self.julia_canvas.pixel_size();
            self.submit(FrameJob {
                uniforms: ViewUniforms::Julia(u),
                width,
                height,
            });
        }
    }

    /// Hand both views' uniforms for this tick to the render worker.
    ///
    /// While easing, a Mandelbrot frame is only submitted when the previous
    /// one has come back, so slow frames are never cancelled forever.
    fn submit_frames(&mut self) {
        let frame = frame_uniforms(
            &self.state,
            &self.mandelbrot_canvas,
            &self.julia_canvas,
            self.gestures.settings(),
        );

        if let Some(u) = frame.mandelbrot {
            let (width, height) = self.mandelbrot_canvas.pixel_size();
            let (width, height) = if self.animating {
                (
                    (width / PREVIEW_DOWNSCALE).max(1),
                    (height / PREVIEW_DOWNSCALE).max(1),
                )
            } else {
                (width, height)
            };
            if !(self.animating && self.bridge.is_busy(View::Mandelbrot)) {
                self.submit(FrameJob {
                    uniforms: ViewUniforms::Mandelbrot(u),
                    width,
                    height,
                });
            }
        }
        if frame.julia.is_some() {
            self.submit_julia();
        }
    }

    fn poll_frames(&mut self, ctx: &egui::Context) {
        for frame in self.bridge.poll() {
            match frame.view {
                View::Mandelbrot => {
                    self.frame_stats = Some(FrameStats {
                        width: frame.result.buffer.width,
                        height: frame.result.buffer.height,
                        elapsed: frame.result.elapsed,
                        preview: frame.result.buffer.width < self.mandelbrot_canvas.pixel_size().0,
                    });
                    self.mandelbrot_texture = Some(upload(ctx, "mandelbrot", &frame.result));
                }
                View::Julia => {
                    self.julia_texture = Some(upload(ctx, "julia", &frame.result));
                }
            }
        }
    }

    // -- Drawing ------------------------------------------------------------

    fn show_side_panel(&mut self, ctx: &egui::Context) {
        let side = self.preferences.julia_panel_size.max(64.0);
        egui::SidePanel::right("side_panel")
            .resizable(false)
            .exact_width(side + SIDE_PANEL_PADDING)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                let rect = julia_panel::draw_julia_panel(
                    ui,
                    JuliaPanelParams {
                        side,
                        texture: self.julia_texture.as_ref(),
                        julia_constant: self.state.julia_constant,
                        renderer_ready: self.bridge.is_ready(),
                    },
                );
                self.julia_canvas = canvas_for(rect, ctx.pixels_per_point());
                ui.separator();
                self.show_controls(ui);
            });
    }

    fn show_mandelbrot_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let (rect, _) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
                // Read fresh every tick so a resize applies to this frame's
                // mapping.
                self.mandelbrot_canvas = canvas_for(rect, ctx.pixels_per_point());
                self.handle_canvas_input(ctx, rect);

                if let Some(tex) = &self.mandelbrot_texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter().image(tex.id(), rect, uv, egui::Color32::WHITE);
                } else {
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "Preparing renderer…",
                        egui::FontId::proportional(16.0),
                        egui::Color32::GRAY,
                    );
                }
                screenshot::paint_flash(ui, rect, &mut self.flash_started);
            });
    }
}

fn canvas_for(rect: egui::Rect, pixels_per_point: f32) -> Canvas {
    let ppp = pixels_per_point as f64;
    Canvas::new(rect.width() as f64 * ppp, rect.height() as f64 * ppp, ppp)
}

fn upload(ctx: &egui::Context, name: &str, result: &RenderResult) -> egui::TextureHandle {
    let buffer = &result.buffer;
    let image = egui::ColorImage::from_rgba_unmultiplied(
        [buffer.width as usize, buffer.height as usize],
        &buffer.pixels,
    );
    ctx.load_texture(name, image, egui::TextureOptions::LINEAR)
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for MandelGlApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.poll_frames(ctx);

        self.show_side_panel(ctx);
        self.show_mandelbrot_canvas(ctx);

        let step = animation::step(&mut self.state, self.gestures.settings());
        self.animating = step.animating;
        self.submit_frames();

        self.show_hud(ctx);
        self.show_help_window(ctx);

        if self.animating || !self.bridge.is_ready() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.preferences.save();
        info!("Saved preferences on exit");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting MandelGL");

    let prefs = AppPreferences::load();

    let viewport = egui::ViewportBuilder::default()
        .with_title("MandelGL")
        .with_inner_size([prefs.window_width, prefs.window_height]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "MandelGL",
        options,
        Box::new(move |cc| Ok(Box::new(MandelGlApp::new(&cc.egui_ctx, prefs)))),
    )
}
