//! Per-frame view transform.
//!
//! The matrix maps the quad's normalized device coordinates into the
//! fractal plane. It is a pure function of the configuration and is
//! recomputed every frame; caching it across frames risks staleness for no
//! measurable gain.

use glam::{Mat4, Vec3};

use crate::config::FractalConfig;

/// Composes aspect correction, translation, rotation, and reciprocal zoom,
/// in that order from the point's perspective. The order is part of the
/// visual contract: reordering changes what pan and zoom mean.
pub fn view_transform(config: &FractalConfig) -> Mat4 {
    let zoom = 1.0 / config.scale;
    Mat4::from_scale(Vec3::splat(zoom))
        * Mat4::from_rotation_z(config.rotation)
        * Mat4::from_translation(Vec3::new(config.translation_x, config.translation_y, 0.0))
        * Mat4::from_scale(Vec3::new(config.aspect_ratio(), 1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < 1.0e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn translation_applies_after_aspect() {
        // Aspect 2, translation (2, 0): the NDC origin lands on (2, 0), and
        // x offsets from the origin are doubled before translating.
        let config = FractalConfig {
            width: 1080,
            height: 540,
            translation_x: 2.0,
            translation_y: 0.0,
            rotation: 0.0,
            scale: 1.0,
            ..FractalConfig::default()
        };
        let transform = view_transform(&config);
        assert_close(transform.transform_point3(Vec3::ZERO), Vec3::new(2.0, 0.0, 0.0));
        assert_close(
            transform.transform_point3(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(4.0, 0.0, 0.0),
        );
    }

    #[test]
    fn zoom_is_reciprocal() {
        let config = FractalConfig {
            width: 540,
            height: 540,
            scale: 4.0,
            ..FractalConfig::default()
        };
        let transform = view_transform(&config);
        assert_close(
            transform.transform_point3(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(0.25, 0.0, 0.0),
        );
    }

    #[test]
    fn rotation_happens_between_translation_and_zoom() {
        // Quarter turn after translating: the translated point rotates about
        // the origin.
        let config = FractalConfig {
            width: 540,
            height: 540,
            translation_x: 1.0,
            rotation: std::f32::consts::FRAC_PI_2,
            scale: 1.0,
            ..FractalConfig::default()
        };
        let transform = view_transform(&config);
        assert_close(
            transform.transform_point3(Vec3::ZERO),
            Vec3::new(0.0, 1.0, 0.0),
        );
    }

    #[test]
    fn recomputation_is_deterministic() {
        let config = FractalConfig::default();
        assert_eq!(view_transform(&config), view_transform(&config));
    }
}
