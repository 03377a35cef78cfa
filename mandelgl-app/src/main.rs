mod app;
mod input;
mod julia_panel;
mod preferences;
mod render_bridge;
mod screenshot;
mod ui;

fn main() -> eframe::Result {
    app::run()
}
