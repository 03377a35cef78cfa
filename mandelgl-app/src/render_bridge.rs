use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use eframe::egui;
use tracing::{debug, info, warn};

use mandelgl_core::{JuliaUniforms, MandelbrotUniforms};
use mandelgl_render::{
    render_frame_cancellable, ProgramSet, RenderCancel, RenderError, RenderResult,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which canvas a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Mandelbrot,
    Julia,
}

impl View {
    fn index(self) -> usize {
        match self {
            Self::Mandelbrot => 0,
            Self::Julia => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ViewUniforms {
    Mandelbrot(MandelbrotUniforms),
    Julia(JuliaUniforms),
}

impl ViewUniforms {
    fn view(&self) -> View {
        match self {
            Self::Mandelbrot(_) => View::Mandelbrot,
            Self::Julia(_) => View::Julia,
        }
    }
}

/// One frame to draw: the uniforms plus the pixel size of the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FrameJob {
    pub(crate) uniforms: ViewUniforms,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

pub(crate) struct RenderRequest {
    pub(crate) id: u64,
    pub(crate) job: FrameJob,
    pub(crate) generation: u64,
}

pub(crate) enum RenderResponse {
    /// Palettes are built; frames can be submitted from now on.
    Ready,
    Frame {
        id: u64,
        view: View,
        result: RenderResult,
    },
    /// The request was superseded mid-render or failed.
    Skipped { id: u64, view: View },
}

/// A finished frame handed back to the UI thread.
pub(crate) struct FinishedFrame {
    pub(crate) view: View,
    pub(crate) result: RenderResult,
}

// ---------------------------------------------------------------------------
// Bridge (UI side)
// ---------------------------------------------------------------------------

/// Owns the channels to the render worker and remembers what each canvas
/// last asked for, so an unchanged frame is never rendered twice.
pub(crate) struct RenderBridge {
    tx_request: mpsc::Sender<RenderRequest>,
    rx_response: mpsc::Receiver<RenderResponse>,
    cancels: Arc<[RenderCancel; 2]>,
    ready: bool,
    next_id: u64,
    pending: [u64; 2],
    in_flight: [bool; 2],
    submitted: [Option<FrameJob>; 2],
}

impl RenderBridge {
    pub(crate) fn spawn(ctx: &egui::Context) -> Self {
        let (tx_request, rx_request) = mpsc::channel::<RenderRequest>();
        let (tx_response, rx_response) = mpsc::channel::<RenderResponse>();
        let cancels = Arc::new([RenderCancel::new(), RenderCancel::new()]);

        let worker_ctx = ctx.clone();
        let worker_cancels = Arc::clone(&cancels);
        thread::spawn(move || render_worker(worker_ctx, rx_request, tx_response, worker_cancels));

        Self {
            tx_request,
            rx_response,
            cancels,
            ready: false,
            next_id: 0,
            pending: [0; 2],
            in_flight: [false; 2],
            submitted: [None, None],
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether a frame for `view` has been submitted and not yet returned.
    pub(crate) fn is_busy(&self, view: View) -> bool {
        self.in_flight[view.index()]
    }

    /// Queue `job` unless the same job was already submitted for its view.
    ///
    /// Any in-flight frame for the same view is cancelled. Before the worker
    /// reports ready this returns [`RenderError::ProgramNotReady`].
    pub(crate) fn submit(&mut self, job: FrameJob) -> mandelgl_render::Result<bool> {
        if !self.ready {
            return Err(RenderError::ProgramNotReady);
        }
        let view = job.uniforms.view();
        let slot = view.index();
        if self.submitted[slot] == Some(job) {
            return Ok(false);
        }

        let cancel = &self.cancels[slot];
        cancel.cancel();
        self.next_id += 1;
        let req = RenderRequest {
            id: self.next_id,
            job,
            generation: cancel.generation(),
        };
        debug!(id = req.id, ?view, width = job.width, height = job.height, "Requesting frame");
        if self.tx_request.send(req).is_err() {
            warn!("Render worker is gone; dropping frame request");
            return Ok(false);
        }
        self.pending[slot] = self.next_id;
        self.in_flight[slot] = true;
        self.submitted[slot] = Some(job);
        Ok(true)
    }

    /// Drain worker responses. Only the newest frame per view survives;
    /// frames for superseded requests are dropped.
    pub(crate) fn poll(&mut self) -> Vec<FinishedFrame> {
        let mut frames = Vec::new();
        while let Ok(resp) = self.rx_response.try_recv() {
            match resp {
                RenderResponse::Ready => {
                    info!("Renderer ready");
                    self.ready = true;
                }
                RenderResponse::Frame { id, view, result } => {
                    if id == self.pending[view.index()] {
                        self.in_flight[view.index()] = false;
                        frames.retain(|f: &FinishedFrame| f.view != view);
                        frames.push(FinishedFrame { view, result });
                    }
                }
                RenderResponse::Skipped { id, view } => {
                    if id == self.pending[view.index()] {
                        self.in_flight[view.index()] = false;
                    }
                }
            }
        }
        frames
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Keep only the newest pending request for each view.
fn drain_latest(
    initial: RenderRequest,
    rx: &mpsc::Receiver<RenderRequest>,
) -> [Option<RenderRequest>; 2] {
    let mut latest: [Option<RenderRequest>; 2] = [None, None];
    let slot = initial.job.uniforms.view().index();
    latest[slot] = Some(initial);
    while let Ok(newer) = rx.try_recv() {
        let slot = newer.job.uniforms.view().index();
        latest[slot] = Some(newer);
    }
    latest
}

fn render_job(
    programs: &ProgramSet,
    req: &RenderRequest,
    cancel: &RenderCancel,
) -> mandelgl_render::Result<RenderResult> {
    let FrameJob {
        uniforms,
        width,
        height,
    } = req.job;
    match uniforms {
        ViewUniforms::Mandelbrot(u) => render_frame_cancellable(
            &programs.mandelbrot(&u),
            width,
            height,
            cancel,
            req.generation,
        ),
        ViewUniforms::Julia(u) => {
            render_frame_cancellable(&programs.julia(&u), width, height, cancel, req.generation)
        }
    }
}

pub(crate) fn render_worker(
    ctx: egui::Context,
    rx: mpsc::Receiver<RenderRequest>,
    tx: mpsc::Sender<RenderResponse>,
    cancels: Arc<[RenderCancel; 2]>,
) {
    let programs = ProgramSet::build();
    if tx.send(RenderResponse::Ready).is_err() {
        return;
    }
    ctx.request_repaint();

    while let Ok(initial) = rx.recv() {
        // Julia first: it is small and tracks the pointer.
        let [mandelbrot, julia] = drain_latest(initial, &rx);
        for req in [julia, mandelbrot].into_iter().flatten() {
            let view = req.job.uniforms.view();
            let resp = match render_job(&programs, &req, &cancels[view.index()]) {
                Ok(result) => RenderResponse::Frame {
                    id: req.id,
                    view,
                    result,
                },
                Err(RenderError::Cancelled) => {
                    debug!(id = req.id, ?view, "Frame superseded");
                    RenderResponse::Skipped { id: req.id, view }
                }
                Err(e) => {
                    warn!(id = req.id, ?view, "Frame failed: {e}");
                    RenderResponse::Skipped { id: req.id, view }
                }
            };
            if tx.send(resp).is_err() {
                return;
            }
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelgl_core::{frame_uniforms, Canvas, ViewSettings, ViewportState};

    fn jobs() -> (FrameJob, FrameJob) {
        let settings = ViewSettings::default();
        let state = ViewportState::new(&settings);
        let canvas = Canvas::new(32.0, 24.0, 1.0);
        let frame = frame_uniforms(&state, &canvas, &canvas, &settings);
        (
            FrameJob {
                uniforms: ViewUniforms::Mandelbrot(frame.mandelbrot.unwrap()),
                width: 32,
                height: 24,
            },
            FrameJob {
                uniforms: ViewUniforms::Julia(frame.julia.unwrap()),
                width: 32,
                height: 24,
            },
        )
    }

    #[test]
    fn drain_latest_keeps_newest_per_view() {
        let (mandel, julia) = jobs();
        let (tx, rx) = mpsc::channel();
        let req = |id, job| RenderRequest {
            id,
            job,
            generation: 0,
        };
        tx.send(req(2, julia)).unwrap();
        tx.send(req(3, mandel)).unwrap();
        tx.send(req(4, julia)).unwrap();

        let [m, j] = drain_latest(req(1, mandel), &rx);
        assert_eq!(m.unwrap().id, 3);
        assert_eq!(j.unwrap().id, 4);
    }

    #[test]
    fn worker_reports_ready_then_renders() {
        let (mandel, _) = jobs();
        let (tx_req, rx_req) = mpsc::channel();
        let (tx_resp, rx_resp) = mpsc::channel();
        let cancels = Arc::new([RenderCancel::new(), RenderCancel::new()]);
        let worker_cancels = Arc::clone(&cancels);
        let handle = thread::spawn(move || {
            render_worker(egui::Context::default(), rx_req, tx_resp, worker_cancels)
        });

        assert!(matches!(rx_resp.recv().unwrap(), RenderResponse::Ready));
        tx_req
            .send(RenderRequest {
                id: 7,
                job: mandel,
                generation: cancels[0].generation(),
            })
            .unwrap();
        match rx_resp.recv().unwrap() {
            RenderResponse::Frame { id, view, result } => {
                assert_eq!(id, 7);
                assert_eq!(view, View::Mandelbrot);
                assert_eq!(result.buffer.width, 32);
                assert_eq!(result.buffer.height, 24);
            }
            _ => panic!("expected a frame"),
        }
        drop(tx_req);
        handle.join().unwrap();
    }

    #[test]
    fn stale_generation_is_not_rendered() {
        let (_, julia) = jobs();
        let (tx_req, rx_req) = mpsc::channel();
        let (tx_resp, rx_resp) = mpsc::channel();
        let cancels = Arc::new([RenderCancel::new(), RenderCancel::new()]);
        cancels[1].cancel();
        let handle = thread::spawn(move || {
            render_worker(egui::Context::default(), rx_req, tx_resp, cancels)
        });
        assert!(matches!(rx_resp.recv().unwrap(), RenderResponse::Ready));
        tx_req
            .send(RenderRequest {
                id: 1,
                job: julia,
                generation: 0,
            })
            .unwrap();
        drop(tx_req);
        handle.join().unwrap();
        assert!(matches!(
            rx_resp.try_recv(),
            Ok(RenderResponse::Skipped { id: 1, view: View::Julia })
        ));
    }
}
