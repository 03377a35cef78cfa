use eframe::egui;

use crate::app::{MandelGlApp, HUD_CORNER_RADIUS, HUD_MARGIN};

impl MandelGlApp {
    pub(crate) fn show_hud(&mut self, ctx: &egui::Context) {
        if !self.preferences.show_hud {
            return;
        }

        let hud_alpha =
            (self.preferences.hud_panel_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;

        // -- Top-left: zoom and pointer readout --
        egui::Area::new(egui::Id::new("hud_params"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(hud_alpha))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));

                        ui.label(format!("Zoom: {}", self.state.zoom_label()));
                        match self.state.pointer {
                            Some(p) => {
                                ui.monospace(format!("Re: {:.8}", p.re));
                                ui.monospace(format!("Im: {:.8}", p.im));
                            }
                            None => {
                                ui.monospace("Re: -");
                                ui.monospace("Im: -");
                            }
                        }
                        ui.label(format!("Iterations: {}", self.state.max_iterations));
                    });
            });

        // -- Bottom-left: render stats --
        egui::Area::new(egui::Id::new("hud_render"))
            .anchor(egui::Align2::LEFT_BOTTOM, [HUD_MARGIN, -HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(hud_alpha))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(200, 200, 200));
                        ui.style_mut().spacing.item_spacing.y = 2.0;

                        if !self.renderer_ready() {
                            ui.colored_label(egui::Color32::YELLOW, "Preparing renderer…");
                            return;
                        }
                        let phase_color = if self.animating {
                            egui::Color32::YELLOW
                        } else {
                            egui::Color32::from_rgb(100, 255, 100)
                        };
                        ui.colored_label(
                            phase_color,
                            if self.animating { "Moving…" } else { "Settled" },
                        );
                        if let Some(stats) = self.frame_stats {
                            ui.label(format!(
                                "{}x{}{} in {:.1} ms",
                                stats.width,
                                stats.height,
                                if stats.preview { " (preview)" } else { "" },
                                stats.elapsed.as_secs_f64() * 1000.0,
                            ));
                        }
                    });
            });
    }
}
