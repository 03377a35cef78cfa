//! Screenshot export: PNG with the view embedded as tEXt chunks.

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use mandelgl_core::{Complex, Theme};

use crate::buffer::RenderBuffer;

/// The view a screenshot was taken of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenshotMetadata {
    pub center: Complex,
    pub zoom: f64,
    pub max_iterations: u32,
    pub theme: Theme,
    pub color_compression: f64,
    pub julia_constant: Complex,
}

/// Write `buffer` to `path` as an RGBA PNG.
///
/// Uses the `png` crate directly so the view parameters can ride along as
/// text chunks.
pub fn export_png(
    buffer: &RenderBuffer,
    path: &Path,
    metadata: &ScreenshotMetadata,
) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "MandelGL".to_string())?;
    for (key, value) in metadata_pairs(metadata, buffer) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;

    debug!(
        "Exported PNG {}x{} to {}",
        buffer.width,
        buffer.height,
        path.display()
    );
    Ok(())
}

fn metadata_pairs(meta: &ScreenshotMetadata, buffer: &RenderBuffer) -> Vec<(String, String)> {
    vec![
        ("MandelGL.CenterRe".into(), format!("{}", meta.center.re)),
        ("MandelGL.CenterIm".into(), format!("{}", meta.center.im)),
        ("MandelGL.Zoom".into(), format!("{}", meta.zoom)),
        ("MandelGL.MaxIterations".into(), meta.max_iterations.to_string()),
        ("MandelGL.Theme".into(), meta.theme.label().to_string()),
        ("MandelGL.ColorCompression".into(), format!("{:.1}", meta.color_compression)),
        ("MandelGL.JuliaC_Re".into(), format!("{}", meta.julia_constant.re)),
        ("MandelGL.JuliaC_Im".into(), format!("{}", meta.julia_constant.im)),
        ("MandelGL.Resolution".into(), format!("{}x{}", buffer.width, buffer.height)),
    ]
}
