//! Configuration value types shared between the host and the renderer.
//!
//! The host hands the renderer a [`FractalPatch`] with only the fields it
//! wants to change; the renderer completes it against the last full
//! [`FractalConfig`] before use, so no component downstream ever observes a
//! missing field.

use serde::{Deserialize, Serialize};

/// Selects which escape-time formula the renderer compiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalKind {
    /// No formula; the renderer clears the frame and draws nothing.
    None,
    #[default]
    Julia,
    Mandelbrot,
}

/// Falloff shaping applied by host-side colorizers. Carried through the
/// configuration but not interpreted inside this core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FalloffKind {
    Linear,
    #[default]
    Sigmoid,
}

/// Complete renderer configuration. Every field has a total default; values
/// are immutable once handed to the renderer and replaced wholesale by
/// [`FractalConfig::merged`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalConfig {
    pub kind: FractalKind,

    /// Logical surface size driving the aspect-ratio correction. Kept in
    /// sync with the viewport by the host, not by `resize`.
    pub width: u32,
    pub height: u32,

    pub translation_x: f32,
    pub translation_y: f32,
    /// Radians, counter-clockwise.
    pub rotation: f32,
    /// Zoom factor; the view transform applies its reciprocal.
    pub scale: f32,

    /// Iteration cap, compiled into the shader as a literal loop bound.
    pub max_iterations: u32,
    /// Escape radius; squared before upload.
    pub radius: f32,

    /// Julia seed constant.
    pub real: f32,
    pub imaginary: f32,

    /// Mandelbrot-family exponent.
    pub exponent: f32,

    // Color and falloff parameters consumed by host-side post-processing.
    pub fractal_color: [f32; 4],
    pub background_color: [f32; 4],
    pub set_color: [f32; 4],
    /// Shade assigned to interior points when [`use_set_color_over_value`]
    /// is off.
    ///
    /// [`use_set_color_over_value`]: Self::use_set_color_over_value
    pub set_value: f32,
    pub use_set_color_over_value: bool,
    pub falloff: FalloffKind,
    pub falloff_strength: f32,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            kind: FractalKind::Julia,
            width: 960,
            height: 540,
            translation_x: 0.0,
            translation_y: 0.0,
            rotation: 0.0,
            scale: 1.0,
            max_iterations: 100,
            radius: 4.0,
            real: -0.872_778_7,
            imaginary: -0.259_534_46,
            exponent: 2.0,
            fractal_color: [1.0, 1.0, 1.0, 1.0],
            background_color: [0.0, 0.0, 0.0, 0.0],
            set_color: [0.0, 0.0, 0.0, 1.0],
            set_value: 0.0,
            use_set_color_over_value: false,
            falloff: FalloffKind::Sigmoid,
            falloff_strength: 5.0,
        }
    }
}

impl FractalConfig {
    /// Produces a new complete configuration with `patch` applied on top of
    /// `self`. Merging the empty patch returns `self` unchanged.
    pub fn merged(&self, patch: &FractalPatch) -> Self {
        Self {
            kind: patch.kind.unwrap_or(self.kind),
            width: patch.width.unwrap_or(self.width),
            height: patch.height.unwrap_or(self.height),
            translation_x: patch.translation_x.unwrap_or(self.translation_x),
            translation_y: patch.translation_y.unwrap_or(self.translation_y),
            rotation: patch.rotation.unwrap_or(self.rotation),
            scale: patch.scale.unwrap_or(self.scale),
            max_iterations: patch.max_iterations.unwrap_or(self.max_iterations),
            radius: patch.radius.unwrap_or(self.radius),
            real: patch.real.unwrap_or(self.real),
            imaginary: patch.imaginary.unwrap_or(self.imaginary),
            exponent: patch.exponent.unwrap_or(self.exponent),
            fractal_color: patch.fractal_color.unwrap_or(self.fractal_color),
            background_color: patch.background_color.unwrap_or(self.background_color),
            set_color: patch.set_color.unwrap_or(self.set_color),
            set_value: patch.set_value.unwrap_or(self.set_value),
            use_set_color_over_value: patch
                .use_set_color_over_value
                .unwrap_or(self.use_set_color_over_value),
            falloff: patch.falloff.unwrap_or(self.falloff),
            falloff_strength: patch.falloff_strength.unwrap_or(self.falloff_strength),
        }
    }

    /// Whether `field` differs between `self` and `other`. Used by the
    /// formula registry to evaluate its structural-field sets.
    pub fn field_changed(&self, other: &Self, field: ConfigField) -> bool {
        match field {
            ConfigField::MaxIterations => self.max_iterations != other.max_iterations,
            ConfigField::Radius => self.radius != other.radius,
            ConfigField::Real => self.real != other.real,
            ConfigField::Imaginary => self.imaginary != other.imaginary,
            ConfigField::Exponent => self.exponent != other.exponent,
        }
    }

    /// Squared escape radius, the form the shader consumes.
    pub fn radius_squared(&self) -> f32 {
        self.radius * self.radius
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Names a formula parameter field of [`FractalConfig`], so formula entries
/// can declare which of them are structural without comparing whole configs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigField {
    MaxIterations,
    Radius,
    Real,
    Imaginary,
    Exponent,
}

/// Partial configuration produced by the host UI; unset fields keep their
/// previous value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalPatch {
    pub kind: Option<FractalKind>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub translation_x: Option<f32>,
    pub translation_y: Option<f32>,
    pub rotation: Option<f32>,
    pub scale: Option<f32>,
    pub max_iterations: Option<u32>,
    pub radius: Option<f32>,
    pub real: Option<f32>,
    pub imaginary: Option<f32>,
    pub exponent: Option<f32>,
    pub fractal_color: Option<[f32; 4]>,
    pub background_color: Option<[f32; 4]>,
    pub set_color: Option<[f32; 4]>,
    pub set_value: Option<f32>,
    pub use_set_color_over_value: Option<bool>,
    pub falloff: Option<FalloffKind>,
    pub falloff_strength: Option<f32>,
}

impl FractalPatch {
    /// Convenience for the common "switch formula" host action.
    pub fn kind(kind: FractalKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_identity() {
        let config = FractalConfig::default();
        assert_eq!(config.merged(&FractalPatch::default()), config);
    }

    #[test]
    fn merge_keeps_unpatched_fields() {
        let base = FractalConfig {
            real: -0.7,
            imaginary: 0.27015,
            ..FractalConfig::default()
        };
        let merged = base.merged(&FractalPatch {
            real: Some(-0.75),
            ..FractalPatch::default()
        });
        assert_eq!(merged.real, -0.75);
        assert_eq!(merged.imaginary, 0.27015);
        assert_eq!(merged.kind, FractalKind::Julia);
    }

    #[test]
    fn merge_is_idempotent() {
        let patch = FractalPatch {
            kind: Some(FractalKind::Mandelbrot),
            exponent: Some(3.0),
            ..FractalPatch::default()
        };
        let once = FractalConfig::default().merged(&patch);
        assert_eq!(once.merged(&patch), once);
    }

    #[test]
    fn field_changed_spots_the_differing_field() {
        let a = FractalConfig::default();
        let b = FractalConfig {
            max_iterations: 200,
            ..a.clone()
        };
        assert!(a.field_changed(&b, ConfigField::MaxIterations));
        assert!(!a.field_changed(&b, ConfigField::Real));
    }

    #[test]
    fn interior_shading_fields_merge_like_the_rest() {
        let base = FractalConfig::default();
        assert_eq!(base.set_value, 0.0);
        assert!(!base.use_set_color_over_value);

        let merged = base.merged(&FractalPatch {
            set_value: Some(0.5),
            use_set_color_over_value: Some(true),
            ..FractalPatch::default()
        });
        assert_eq!(merged.set_value, 0.5);
        assert!(merged.use_set_color_over_value);
        assert_eq!(merged.set_color, base.set_color);
    }

    #[test]
    fn patch_deserializes_with_missing_fields() {
        let patch: FractalPatch = serde_json::from_str(r#"{"real": -0.75}"#).unwrap();
        assert_eq!(patch.real, Some(-0.75));
        assert_eq!(patch.kind, None);
    }
}
