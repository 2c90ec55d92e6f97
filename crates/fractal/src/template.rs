//! Shader-source templating.
//!
//! The base vertex and fragment sources carry named placeholder tokens; a
//! formula's uniform declarations and iteration body are spliced in before
//! compilation. Substitution is plain text over a fixed token set: tokens a
//! template does not contain are tolerated, tokens that survive substitution
//! are an error (they would never compile anyway, and catching them here
//! names the offender instead of surfacing a driver log).

use thiserror::Error;

use crate::config::FractalConfig;
use crate::formula::{Formula, UniformDecl};

pub const TOKEN_UNIFORMS: &str = "{{uniforms}}";
pub const TOKEN_FUNCTION: &str = "{{function}}";
pub const TOKEN_MAX_ITERATIONS: &str = "{{max_iterations}}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("base template is missing required placeholder {0}")]
    MissingPlaceholder(&'static str),

    #[error("unresolved placeholder {0} after substitution")]
    UnresolvedPlaceholder(String),
}

/// A spliced vertex/fragment source pair, ready for compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

/// Splices `formula` into the base templates for `config`.
///
/// The iteration cap is substituted as a literal loop bound, which is what
/// makes it a structural field.
pub fn instantiate(
    formula: &dyn Formula,
    config: &FractalConfig,
) -> Result<ShaderSources, TemplateError> {
    for token in [TOKEN_UNIFORMS, TOKEN_FUNCTION] {
        if !FRAGMENT_TEMPLATE.contains(token) {
            return Err(TemplateError::MissingPlaceholder(token));
        }
    }

    let cap = config.max_iterations.min(i32::MAX as u32);
    let substitutions = [
        (TOKEN_UNIFORMS, uniform_block(formula.uniforms())),
        (TOKEN_FUNCTION, formula.body().to_owned()),
        (TOKEN_MAX_ITERATIONS, cap.to_string()),
    ];

    Ok(ShaderSources {
        vertex: substitute(VERTEX_TEMPLATE, &substitutions)?,
        fragment: substitute(FRAGMENT_TEMPLATE, &substitutions)?,
    })
}

/// Renders uniform declarations as block member lines. An empty declaration
/// list yields an empty string, never a dangling separator.
pub fn uniform_block(decls: &[UniformDecl]) -> String {
    let mut block = String::new();
    for decl in decls {
        block.push_str("    ");
        block.push_str(decl.ty.glsl_name());
        block.push(' ');
        block.push_str(decl.name);
        block.push_str(";\n");
    }
    block
}

fn substitute(
    template: &str,
    substitutions: &[(&'static str, String)],
) -> Result<String, TemplateError> {
    let mut source = template.to_owned();
    // Token substitution is by name; a formula body may itself carry the
    // iteration-cap token, so the cap pass runs last.
    for (token, replacement) in substitutions {
        source = source.replace(token, replacement);
    }
    if let Some(start) = source.find("{{") {
        let token: String = source[start..]
            .chars()
            .take_while(|&c| !c.is_whitespace())
            .collect();
        return Err(TemplateError::UnresolvedPlaceholder(token));
    }
    Ok(source)
}

/// Fullscreen-quad vertex stage. Carries no tokens; still run through
/// substitution so both stages share one code path.
const VERTEX_TEMPLATE: &str = "\
#version 450

layout(location = 0) in vec2 aPosition;
layout(location = 0) out vec2 vPosition;

void main()
{
    vPosition = aPosition;
    gl_Position = vec4(aPosition, 0.0, 1.0);
}
";

/// Fragment stage: maps the interpolated quad position through the view
/// transform and evaluates the spliced escape-time formula.
const FRAGMENT_TEMPLATE: &str = "\
#version 450

layout(location = 0) in vec2 vPosition;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform FractalParams {
    mat4 uTransform;
{{uniforms}}};

float escapeIndex(float x, float y)
{
{{function}}}

void main()
{
    vec4 point = uTransform * vec4(vPosition, 0.0, 1.0);
    float index = escapeIndex(point.x, point.y);

    if (index < 0.0)
    {
        outColor = vec4(0.0, 0.0, 0.0, 1.0);
    }
    else
    {
        outColor = vec4(vec3(index / float({{max_iterations}})), 1.0);
    }
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FractalKind;
    use crate::formula::{formula_for, UniformType};

    #[test]
    fn julia_sources_are_fully_substituted() {
        let config = FractalConfig::default();
        let formula = formula_for(FractalKind::Julia).unwrap();
        let sources = instantiate(formula, &config).unwrap();

        assert!(!sources.fragment.contains("{{"));
        assert!(!sources.vertex.contains("{{"));
        assert!(sources.fragment.contains("float uReal;"));
        assert!(sources.fragment.contains("float uImaginary;"));
        assert!(sources.fragment.contains("mat4 uTransform;"));
    }

    #[test]
    fn iteration_cap_is_spliced_as_a_literal() {
        let config = FractalConfig {
            max_iterations: 250,
            ..FractalConfig::default()
        };
        let formula = formula_for(FractalKind::Julia).unwrap();
        let sources = instantiate(formula, &config).unwrap();
        assert!(sources.fragment.contains("iteration < 250"));
    }

    #[test]
    fn empty_uniform_list_emits_nothing() {
        assert_eq!(uniform_block(&[]), "");
    }

    #[test]
    fn uniform_block_declares_each_member() {
        let block = uniform_block(&[
            UniformDecl::new("uExponent", UniformType::Float),
            UniformDecl::new("uSteps", UniformType::Int),
        ]);
        assert_eq!(block, "    float uExponent;\n    int uSteps;\n");
    }

    #[test]
    fn leftover_tokens_are_reported() {
        let result = substitute("void main() { {{unknown}} }", &[]);
        assert_eq!(
            result,
            Err(TemplateError::UnresolvedPlaceholder("{{unknown}}".into()))
        );
    }

    #[test]
    fn mandelbrot_sources_include_the_exponent_uniform() {
        let config = FractalConfig {
            kind: FractalKind::Mandelbrot,
            ..FractalConfig::default()
        };
        let formula = formula_for(FractalKind::Mandelbrot).unwrap();
        let sources = instantiate(formula, &config).unwrap();
        assert!(sources.fragment.contains("float uExponent;"));
        assert!(!sources.fragment.contains("uReal"));
    }
}
