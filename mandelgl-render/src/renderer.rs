use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::trace;

use mandelgl_core::pixel_to_plane;

use crate::buffer::RenderBuffer;
use crate::error::RenderError;
use crate::program::FragmentProgram;

/// Render generation counter shared between the submitter and the worker.
///
/// Bumping the generation makes any frame still in flight stop at its next
/// row boundary.
#[derive(Debug, Default)]
pub struct RenderCancel {
    generation: AtomicU64,
}

impl RenderCancel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abandon whatever is rendering now.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// A finished frame.
pub struct RenderResult {
    pub buffer: RenderBuffer,
    pub elapsed: Duration,
}

/// Shade every pixel of a `width × height` frame, rows in parallel.
pub fn render_frame<P: FragmentProgram + Sync>(
    program: &P,
    width: u32,
    height: u32,
) -> crate::Result<RenderResult> {
    render_with(program, width, height, || false)
}

/// Like [`render_frame`] but gives up once `cancel` moves past
/// `generation`.
pub fn render_frame_cancellable<P: FragmentProgram + Sync>(
    program: &P,
    width: u32,
    height: u32,
    cancel: &RenderCancel,
    generation: u64,
) -> crate::Result<RenderResult> {
    render_with(program, width, height, || cancel.generation() != generation)
}

fn render_with<P, C>(
    program: &P,
    width: u32,
    height: u32,
    cancelled: C,
) -> crate::Result<RenderResult>
where
    P: FragmentProgram + Sync,
    C: Fn() -> bool + Sync,
{
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    let start = Instant::now();
    let center = program.center();
    let half = program.half_extents();
    let pixel_size = 2.0 * half.im / height as f64;

    let (w, h) = (width as f64, height as f64);

    let mut buffer = RenderBuffer::new(width, height);
    let stride = buffer.stride();
    let aborted = buffer
        .pixels
        .par_chunks_mut(stride)
        .enumerate()
        .map(|(y, row)| {
            if cancelled() {
                return true;
            }
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let (px_x, px_y) = (x as f64 + 0.5, y as f64 + 0.5);
                let point = pixel_to_plane(center, half, px_x, px_y, w, h);
                px.copy_from_slice(&program.shade(point, pixel_size));
            }
            false
        })
        .reduce(|| false, |a, b| a || b);

    if aborted {
        return Err(RenderError::Cancelled);
    }
    let elapsed = start.elapsed();
    trace!(width, height, ?elapsed, "frame rendered");
    Ok(RenderResult { buffer, elapsed })
}
