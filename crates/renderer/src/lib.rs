//! GPU renderer for escape-time fractals.
//!
//! The crate glues the `fractal` core (configuration, formula registry,
//! shader templates) to a `wgpu` surface. The flow per host interaction:
//!
//! ```text
//!   host UI ──▶ FractalPatch
//!                    │ FractalRenderer::set_fractal
//!                    ▼
//!           needs_recompile? ──yes──▶ template splice ──▶ FractalPipeline
//!                    │ no                                      │
//!                    ▼                                         ▼
//!           FractalRenderer::render ◀── uniform staging ◀── layout
//! ```
//!
//! `FractalRenderer` owns every GPU resource (surface, device, quad buffer,
//! the active pipeline and its uniform block). A failed recompile keeps the
//! previously linked program active, so the host keeps seeing the last good
//! fractal instead of a blank surface. All operations are single-threaded
//! and run to completion; the renderer has no internal concurrency.

mod error;
mod gpu;
mod quad;
mod renderer;

pub use error::{RendererError, ShaderStageKind};
pub use renderer::FractalRenderer;

pub use fractal::{FractalConfig, FractalKind, FractalPatch};
