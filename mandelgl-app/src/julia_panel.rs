//! Julia view panel: the live Julia set for the constant under the pointer.
//!
//! The crosshair marking the constant is part of the rendered frame, so this
//! panel only places the texture and its border.

use eframe::egui;

use mandelgl_core::Complex;

/// 1px white border at 75% opacity.
const BORDER_ALPHA: u8 = 191;

/// Parameters needed to draw the Julia panel.
pub(crate) struct JuliaPanelParams<'a> {
    pub(crate) side: f32,
    pub(crate) texture: Option<&'a egui::TextureHandle>,
    pub(crate) julia_constant: Complex,
    pub(crate) renderer_ready: bool,
}

/// Draw the square Julia panel at the top of `ui`. Returns the image
/// rectangle, which is the Julia canvas for this frame.
pub(crate) fn draw_julia_panel(ui: &mut egui::Ui, params: JuliaPanelParams<'_>) -> egui::Rect {
    let (rect, _) =
        ui.allocate_exact_size(egui::vec2(params.side, params.side), egui::Sense::hover());
    let painter = ui.painter();

    if let Some(tex) = params.texture {
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(tex.id(), rect, uv, egui::Color32::WHITE);
    } else {
        painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(120));
        let text = if params.renderer_ready {
            "Updating…"
        } else {
            "Preparing renderer…"
        };
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(12.0),
            egui::Color32::GRAY,
        );
    }

    let border_stroke = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(BORDER_ALPHA));
    painter.rect_stroke(rect, 0.0, border_stroke, egui::StrokeKind::Outside);

    ui.label(
        egui::RichText::new(format!("c = {:.6}", params.julia_constant))
            .monospace()
            .color(egui::Color32::from_rgb(200, 200, 200)),
    );
    rect
}
