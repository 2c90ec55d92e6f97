//! Julia set: `z ← z² + c` with a fixed external constant `c`, the sampled
//! point supplying the starting `z`.

use crate::config::{ConfigField, FractalConfig, FractalKind};

use super::{smoothed_index, Formula, UniformDecl, UniformType, UniformValues, INTERIOR};

pub struct Julia;

const UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("uReal", UniformType::Float),
    UniformDecl::new("uImaginary", UniformType::Float),
    UniformDecl::new("uRadiusSquared", UniformType::Float),
];

// The iteration cap is a literal loop bound; some GPU targets require
// compile-time constant bounds, and a literal avoids dead iterations.
const STRUCTURAL: &[ConfigField] = &[ConfigField::MaxIterations];

const BODY: &str = "\
    float cx = uReal;
    float cy = uImaginary;

    for (int iteration = 0; iteration < {{max_iterations}}; iteration++)
    {
        float sqrDst = x * x + y * y;

        if (sqrDst >= uRadiusSquared)
        {
            float index = float(iteration) + 1.0 - log(log(sqrDst)) / log(2.0);
            return max(index, 0.0);
        }

        float nextX = x * x - y * y + cx;
        y = 2.0 * x * y + cy;
        x = nextX;
    }

    return -1.0;
";

impl Formula for Julia {
    fn kind(&self) -> FractalKind {
        FractalKind::Julia
    }

    fn uniforms(&self) -> &'static [UniformDecl] {
        UNIFORMS
    }

    fn body(&self) -> &'static str {
        BODY
    }

    fn structural_fields(&self) -> &'static [ConfigField] {
        STRUCTURAL
    }

    fn push_uniforms(&self, values: &mut UniformValues, config: &FractalConfig) {
        values.set_f32("uReal", config.real);
        values.set_f32("uImaginary", config.imaginary);
        values.set_f32("uRadiusSquared", config.radius_squared());
    }
}

/// CPU mirror of the shader iteration, shared with tests and host-side
/// previews. Escape is classified with `>=` so a point landing exactly on
/// the squared radius counts as escaped.
pub fn escape_index(x: f32, y: f32, config: &FractalConfig) -> f32 {
    let radius_squared = config.radius_squared();
    let (cx, cy) = (config.real, config.imaginary);
    let (mut x, mut y) = (x, y);
    for iteration in 0..config.max_iterations {
        let sqr_dst = x * x + y * y;
        if sqr_dst >= radius_squared {
            return smoothed_index(iteration, sqr_dst);
        }
        let next_x = x * x - y * y + cx;
        y = 2.0 * x * y + cy;
        x = next_x;
    }
    INTERIOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(real: f32, imaginary: f32) -> FractalConfig {
        FractalConfig {
            kind: FractalKind::Julia,
            real,
            imaginary,
            max_iterations: 100,
            radius: 2.0,
            ..FractalConfig::default()
        }
    }

    #[test]
    fn point_on_the_radius_counts_as_escaped() {
        // Squared magnitude is exactly radius²; `>=` must classify it as
        // escaped on the first iteration.
        let index = escape_index(2.0, 0.0, &config(0.0, 0.0));
        assert!(index >= 0.0);
        assert_ne!(index, INTERIOR);
    }

    #[test]
    fn fixed_point_never_escapes() {
        // c = 0 keeps the origin at the origin forever.
        assert_eq!(escape_index(0.0, 0.0, &config(0.0, 0.0)), INTERIOR);
    }

    #[test]
    fn escaping_point_gets_a_continuous_index() {
        let cfg = config(-0.7, 0.27015);
        let index = escape_index(1.5, 1.2, &cfg);
        assert!(index >= 0.0);
        assert!(index < cfg.max_iterations as f32);
        assert_ne!(index.fract(), 0.0);
    }

    #[test]
    fn body_compiles_the_cap_as_a_literal() {
        assert!(BODY.contains("{{max_iterations}}"));
        assert!(!BODY.contains("uMaxIterations"));
    }

    #[test]
    fn pushed_radius_is_squared() {
        let cfg = config(0.0, 0.0);
        let mut values =
            UniformValues::new(crate::formula::UniformLayout::for_program(UNIFORMS));
        Julia.push_uniforms(&mut values, &cfg);
        let offset = values.layout().offset_of("uRadiusSquared").unwrap();
        let bytes = &values.bytes()[offset..offset + 4];
        assert_eq!(f32::from_le_bytes(bytes.try_into().unwrap()), 4.0);
    }
}
