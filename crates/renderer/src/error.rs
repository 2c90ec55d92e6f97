use std::fmt;

use thiserror::Error;

/// Identifies the shader stage a compile diagnostic refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStageKind {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Everything that can go wrong at the renderer boundary.
///
/// GPU diagnostics are recoverable: the renderer logs them, aborts the
/// requested operation, and preserves the last known-good program. Only
/// [`RendererError::ContextUnavailable`] is fatal to the instance.
#[derive(Debug, Error)]
pub enum RendererError {
    /// No GPU context could be obtained; the renderer cannot be constructed.
    #[error("no GPU context available: {0}")]
    ContextUnavailable(String),

    /// A shader stage was rejected by the driver, with its log attached.
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile {
        stage: ShaderStageKind,
        log: String,
    },

    /// The compiled stages could not be linked into a pipeline.
    #[error("shader program failed to link: {log}")]
    ShaderLink { log: String },

    /// A buffer or bind group allocation failed.
    #[error("GPU resource allocation failed: {0}")]
    ResourceCreation(String),

    /// The base template and a formula snippet disagree.
    #[error(transparent)]
    Template(#[from] fractal::TemplateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_names_the_stage_and_log() {
        let err = RendererError::ShaderCompile {
            stage: ShaderStageKind::Fragment,
            log: "0:12 syntax error".into(),
        };
        assert_eq!(
            err.to_string(),
            "fragment shader failed to compile: 0:12 syntax error"
        );
    }

    #[test]
    fn template_errors_pass_through() {
        let err = RendererError::from(fractal::TemplateError::UnresolvedPlaceholder(
            "{{bogus}}".into(),
        ));
        assert!(err.to_string().contains("{{bogus}}"));
    }
}
