use eframe::egui;

use mandelgl_core::RecenterModifier;

use crate::app::MandelGlApp;

const SOURCE_URL: &str = "https://github.com/VyvaHart/MandelbrotGL";

fn binding_grid(ui: &mut egui::Ui, id: &str, rows: &[(&str, &str)]) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([12.0, 2.0])
        .show(ui, |ui| {
            for &(k, d) in rows {
                ui.label(egui::RichText::new(k).strong().color(egui::Color32::WHITE));
                ui.label(d);
                ui.end_row();
            }
        });
}

impl MandelGlApp {
    pub(crate) fn show_help_window(&mut self, ctx: &egui::Context) {
        if !self.show_help {
            return;
        }

        let recenter = match self.gestures.settings().recenter_modifier {
            RecenterModifier::Ctrl => "Ctrl+Click",
            RecenterModifier::Alt => "Alt+Click",
            RecenterModifier::Either => "Ctrl/Alt+Click",
        };

        let mut open = true;
        egui::Window::new("Controls")
            .open(&mut open)
            .resizable(false)
            .default_width(320.0)
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(egui::Color32::from_rgba_unmultiplied(10, 10, 10, 210)),
            )
            .show(ctx, |ui| {
                ui.style_mut().visuals.override_text_color =
                    Some(egui::Color32::from_rgb(220, 220, 220));

                ui.heading("Keyboard");
                ui.add_space(2.0);
                binding_grid(
                    ui,
                    "help_kb",
                    &[("Q", "Zoom in"), ("E", "Zoom out"), ("R", "Reset view")],
                );

                ui.add_space(8.0);
                ui.heading("Mouse");
                ui.add_space(2.0);
                binding_grid(
                    ui,
                    "help_mouse",
                    &[
                        ("Left drag", "Pan"),
                        ("Scroll wheel", "Zoom at cursor"),
                        (recenter, "Center view on point"),
                        ("Move", "Julia constant follows the cursor"),
                    ],
                );

                ui.add_space(8.0);
                ui.heading("Touch");
                ui.add_space(2.0);
                binding_grid(
                    ui,
                    "help_touch",
                    &[("One finger", "Pan"), ("Two fingers", "Pinch zoom and pan")],
                );

                ui.add_space(8.0);
                ui.hyperlink_to("Source code", SOURCE_URL);
            });

        if !open {
            self.show_help = false;
        }
    }
}
