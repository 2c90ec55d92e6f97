//! Formula registry: one immutable entry per [`FractalKind`].
//!
//! Each entry supplies the GLSL body of the escape-time iteration, the
//! uniform block members it needs, the set of configuration fields that are
//! compiled into the program text (and therefore force a rebuild when they
//! change), and a writer that pushes current parameter values into the
//! resolved uniform block.
//!
//! Per-name uniform handles are byte offsets into a single std140 uniform
//! block: [`UniformLayout`] is resolved once per compiled program and
//! discarded with it, never reused across programs.

pub mod julia;
pub mod mandelbrot;

use glam::Mat4;
use tracing::warn;

use crate::config::{ConfigField, FractalConfig, FractalKind};

/// GLSL type of a single uniform block member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformType {
    Float,
    Int,
    Mat4,
}

impl UniformType {
    pub const fn glsl_name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Mat4 => "mat4",
        }
    }

    /// Size in bytes under std140.
    pub const fn size(self) -> usize {
        match self {
            Self::Float | Self::Int => 4,
            Self::Mat4 => 64,
        }
    }

    /// Alignment in bytes under std140.
    pub const fn alignment(self) -> usize {
        match self {
            Self::Float | Self::Int => 4,
            Self::Mat4 => 16,
        }
    }
}

/// One uniform block member a formula declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformDecl {
    pub name: &'static str,
    pub ty: UniformType,
}

impl UniformDecl {
    pub const fn new(name: &'static str, ty: UniformType) -> Self {
        Self { name, ty }
    }
}

/// The view transform member every program carries, ahead of the
/// formula-specific declarations.
pub const TRANSFORM_UNIFORM: UniformDecl = UniformDecl::new("uTransform", UniformType::Mat4);

/// An escape-time formula registered for one [`FractalKind`].
pub trait Formula: Sync {
    fn kind(&self) -> FractalKind;

    /// Uniform block members, in declaration order, excluding the shared
    /// transform member.
    fn uniforms(&self) -> &'static [UniformDecl];

    /// GLSL body of `float escapeIndex(float x, float y)`. May reference the
    /// `{{max_iterations}}` token, substituted with a literal loop bound at
    /// template instantiation.
    fn body(&self) -> &'static str;

    /// Configuration fields baked into the program text; a change in any of
    /// them invalidates the compiled program.
    fn structural_fields(&self) -> &'static [ConfigField];

    /// Writes the current parameter values into the staged uniform block.
    fn push_uniforms(&self, values: &mut UniformValues, config: &FractalConfig);
}

/// Looks up the registered formula for `kind`. [`FractalKind::None`] has no
/// entry; the renderer then drops its program and renders clear-only frames.
pub fn formula_for(kind: FractalKind) -> Option<&'static dyn Formula> {
    match kind {
        FractalKind::None => None,
        FractalKind::Julia => Some(&julia::Julia),
        FractalKind::Mandelbrot => Some(&mandelbrot::Mandelbrot),
    }
}

/// Whether replacing `old` with `new` invalidates the compiled program.
///
/// True when the fractal kind changes, or when any structural field of the
/// OLD kind changes. The old kind governs the comparison: it is the
/// currently compiled program whose staleness is being evaluated.
pub fn needs_recompile(old: &FractalConfig, new: &FractalConfig) -> bool {
    if old.kind != new.kind {
        return true;
    }
    let Some(formula) = formula_for(old.kind) else {
        return false;
    };
    formula
        .structural_fields()
        .iter()
        .any(|&field| old.field_changed(new, field))
}

/// Resolved std140 layout of a program's uniform block: the mapping from
/// logical uniform name to byte offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformLayout {
    members: Vec<(&'static str, UniformType, usize)>,
    size: usize,
}

impl UniformLayout {
    /// Resolves the layout of a program's block: the shared transform member
    /// followed by the formula's declarations.
    pub fn for_program(decls: &[UniformDecl]) -> Self {
        let mut members = Vec::with_capacity(decls.len() + 1);
        let mut cursor = 0usize;
        for decl in std::iter::once(&TRANSFORM_UNIFORM).chain(decls) {
            let offset = align_up(cursor, decl.ty.alignment());
            members.push((decl.name, decl.ty, offset));
            cursor = offset + decl.ty.size();
        }
        // A uniform block's size is padded to a 16-byte boundary.
        let size = align_up(cursor, 16);
        Self { members, size }
    }

    /// Byte offset of `name`, if the member exists in this program.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.members
            .iter()
            .find(|(member, _, _)| *member == name)
            .map(|&(_, _, offset)| offset)
    }

    pub fn type_of(&self, name: &str) -> Option<UniformType> {
        self.members
            .iter()
            .find(|(member, _, _)| *member == name)
            .map(|&(_, ty, _)| ty)
    }

    /// Total block size in bytes, padded for upload.
    pub fn size(&self) -> usize {
        self.size
    }
}

fn align_up(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

/// CPU-side staging for one program's uniform block. Rebuilt together with
/// the layout whenever the program is replaced.
#[derive(Clone, Debug)]
pub struct UniformValues {
    layout: UniformLayout,
    bytes: Vec<u8>,
}

impl UniformValues {
    pub fn new(layout: UniformLayout) -> Self {
        let bytes = vec![0u8; layout.size()];
        Self { layout, bytes }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    /// Staged block contents, ready for a buffer upload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set_f32(&mut self, name: &str, value: f32) {
        self.write(name, UniformType::Float, &value.to_le_bytes());
    }

    pub fn set_i32(&mut self, name: &str, value: i32) {
        self.write(name, UniformType::Int, &value.to_le_bytes());
    }

    pub fn set_mat4(&mut self, name: &str, value: &Mat4) {
        self.write(
            name,
            UniformType::Mat4,
            bytemuck::cast_slice(&value.to_cols_array()),
        );
    }

    fn write(&mut self, name: &str, ty: UniformType, data: &[u8]) {
        let Some(offset) = self.layout.offset_of(name) else {
            warn!(uniform = name, "uniform not present in current program");
            return;
        };
        if self.layout.type_of(name) != Some(ty) {
            warn!(uniform = name, expected = ?self.layout.type_of(name), "uniform type mismatch");
            return;
        }
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
    }
}

/// Smoothed escape index for an iteration that left the radius: a continuous
/// approximation of the discrete count, clamped at zero from below.
pub(crate) fn smoothed_index(iteration: u32, sqr_dst: f32) -> f32 {
    let index = iteration as f32 + 1.0 - sqr_dst.ln().ln() / std::f32::consts::LN_2;
    index.max(0.0)
}

/// Sentinel escape index for points that never leave the radius.
pub const INTERIOR: f32 = -1.0;
