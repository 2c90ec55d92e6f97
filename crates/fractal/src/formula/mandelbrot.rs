//! Mandelbrot family: `z ← zⁿ + c` where the constant `c` is the sampled
//! point itself and the exponent `n` is runtime-tunable. The power is
//! evaluated in polar form so non-integer exponents work.

use crate::config::{ConfigField, FractalConfig, FractalKind};

use super::{smoothed_index, Formula, UniformDecl, UniformType, UniformValues, INTERIOR};

pub struct Mandelbrot;

const UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("uExponent", UniformType::Float),
    UniformDecl::new("uRadiusSquared", UniformType::Float),
];

const STRUCTURAL: &[ConfigField] = &[ConfigField::MaxIterations];

const BODY: &str = "\
    float cx = x;
    float cy = y;

    for (int iteration = 0; iteration < {{max_iterations}}; iteration++)
    {
        float sqrDst = x * x + y * y;

        if (sqrDst >= uRadiusSquared)
        {
            float index = float(iteration) + 1.0 - log(log(sqrDst)) / log(2.0);
            return max(index, 0.0);
        }

        float radiusPow = pow(sqrDst, uExponent / 2.0);
        float angle = uExponent * atan(y, x);
        float nextX = radiusPow * cos(angle) + cx;
        y = radiusPow * sin(angle) + cy;
        x = nextX;
    }

    return -1.0;
";

impl Formula for Mandelbrot {
    fn kind(&self) -> FractalKind {
        FractalKind::Mandelbrot
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
        values.set_f32("uExponent", config.exponent);
        values.set_f32("uRadiusSquared", config.radius_squared());
    }
}

/// CPU mirror of the shader iteration.
pub fn escape_index(x: f32, y: f32, config: &FractalConfig) -> f32 {
    let radius_squared = config.radius_squared();
    let exponent = config.exponent;
    let (cx, cy) = (x, y);
    let (mut x, mut y) = (x, y);
    for iteration in 0..config.max_iterations {
        let sqr_dst = x * x + y * y;
        if sqr_dst >= radius_squared {
            return smoothed_index(iteration, sqr_dst);
        }
        let radius_pow = sqr_dst.powf(exponent / 2.0);
        let angle = exponent * y.atan2(x);
        let next_x = radius_pow * angle.cos() + cx;
        y = radius_pow * angle.sin() + cy;
        x = next_x;
    }
    INTERIOR
}
