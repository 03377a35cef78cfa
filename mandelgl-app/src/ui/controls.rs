use eframe::egui;

use mandelgl_core::Theme;
use mandelgl_render::theme_palettes;

use crate::app::{MandelGlApp, MAX_UI_EXPONENT};

const THEME_STRIP_STEPS: usize = 48;
const THEME_STRIP_HEIGHT: f32 = 10.0;

/// Text for an iteration exponent: the cap it selects, `2^n`.
pub(crate) fn iterations_label(exponent: f64) -> String {
    format!("{}", 1u64 << (exponent.round().clamp(0.0, 63.0) as u32))
}

/// Preview colors for every theme, indexed by theme id.
pub(crate) fn theme_strips() -> [Vec<[u8; 4]>; 4] {
    theme_palettes().map(|p| p.preview_colors(THEME_STRIP_STEPS))
}

/// A theme's gradient, left (fast escape) to right.
fn theme_strip(ui: &mut egui::Ui, colors: &[[u8; 4]]) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), THEME_STRIP_HEIGHT),
        egui::Sense::hover(),
    );
    let step = rect.width() / colors.len().max(1) as f32;
    for (i, c) in colors.iter().enumerate() {
        let cell = egui::Rect::from_min_size(
            egui::pos2(rect.min.x + i as f32 * step, rect.min.y),
            egui::vec2(step.ceil(), rect.height()),
        );
        ui.painter()
            .rect_filled(cell, 0.0, egui::Color32::from_rgb(c[0], c[1], c[2]));
    }
}

impl MandelGlApp {
    /// Iteration, theme and color controls under the Julia panel.
    pub(crate) fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("View");
        ui.add_space(4.0);

        let mut exponent = self.iteration_exponent;
        let response = ui.add(
            egui::Slider::new(&mut exponent, 1..=MAX_UI_EXPONENT)
                .text("Max iterations")
                .custom_formatter(|n, _| iterations_label(n)),
        );
        if response.changed() {
            self.set_iteration_exponent(exponent);
        }

        let mut theme = self.state.theme;
        egui::ComboBox::from_label("Theme")
            .selected_text(theme.label())
            .show_ui(ui, |ui| {
                for t in Theme::ALL {
                    ui.selectable_value(&mut theme, t, t.label());
                }
            });
        if theme != self.state.theme {
            self.set_theme(theme);
        }
        theme_strip(ui, &self.theme_strips[self.state.theme.id() as usize]);

        let mut compression = self.state.color_compression;
        let response = ui.add(
            egui::Slider::new(&mut compression, 0.1..=4.0)
                .text("Color compression")
                .fixed_decimals(1),
        );
        if response.changed() {
            self.set_color_compression(compression);
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Reset view").clicked() {
                self.state.reset_view();
            }
            if ui.button("Help").clicked() {
                self.show_help = !self.show_help;
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Screenshot").clicked() {
                self.take_screenshot();
            }
            let fullscreen = ui.ctx().input(|i| i.viewport().fullscreen.unwrap_or(false));
            let label = if fullscreen { "Exit fullscreen" } else { "Fullscreen" };
            if ui.button(label).clicked() {
                ui.ctx()
                    .send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
            }
        });
        if ui.checkbox(&mut self.preferences.show_hud, "Show HUD").changed() {
            self.preferences.save();
        }
    }
}
