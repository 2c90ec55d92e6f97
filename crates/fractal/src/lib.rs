//! GPU-independent core of the escape-time fractal renderer.
//!
//! This crate holds everything that does not need a device handle: the
//! configuration value types, the formula registry that maps a
//! [`FractalKind`] onto a GLSL snippet and its uniform block, the shader
//! template the snippets are spliced into, the per-frame view transform, and
//! the easing utilities consumed by animation code outside the core.
//!
//! The companion `renderer` crate owns the `wgpu` side and drives this one:
//!
//! ```text
//!   FractalPatch ──▶ FractalConfig::merged ──▶ needs_recompile?
//!          │                                        │ yes
//!          │                                        ▼
//!          │                      formula snippet ─▶ template::instantiate
//!          ▼                                        │
//!   push_uniforms ◀── UniformLayout::for_program ◀──┘
//! ```

pub mod config;
pub mod ease;
pub mod formula;
pub mod template;
pub mod transform;

pub use config::{ConfigField, FalloffKind, FractalConfig, FractalKind, FractalPatch};
pub use formula::{
    formula_for, needs_recompile, Formula, UniformDecl, UniformLayout, UniformType, UniformValues,
};
pub use template::{instantiate, ShaderSources, TemplateError};
pub use transform::view_transform;
