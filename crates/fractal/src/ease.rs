//! Interpolation and easing curves.
//!
//! Leaf utilities for animation code layered on top of the renderer; nothing
//! in the core depends on them. All curves map `[0, 1] → [0, 1]` with
//! `f(0) = 0` and `f(1) = 1`.

use std::f32::consts::PI;

/// Linear interpolation between `a` and `b` at parameter `t`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

pub fn ease_in_sine(x: f32) -> f32 {
    1.0 - (x * PI / 2.0).cos()
}

pub fn ease_out_sine(x: f32) -> f32 {
    (x * PI / 2.0).sin()
}

pub fn ease_in_out_sine(x: f32) -> f32 {
    -((PI * x).cos() - 1.0) / 2.0
}

pub fn ease_in_expo(x: f32) -> f32 {
    if x == 0.0 {
        0.0
    } else {
        2f32.powf(10.0 * (x - 1.0))
    }
}

pub fn ease_out_expo(x: f32) -> f32 {
    if x == 1.0 {
        1.0
    } else {
        1.0 - 2f32.powf(-10.0 * x)
    }
}

pub fn ease_in_out_expo(x: f32) -> f32 {
    if x == 0.0 {
        0.0
    } else if x == 1.0 {
        1.0
    } else if x < 0.5 {
        2f32.powf(20.0 * x - 10.0) / 2.0
    } else {
        (2.0 - 2f32.powf(-20.0 * x + 10.0)) / 2.0
    }
}

/// Polynomial ease-in of degree `n`.
pub fn ease_in_poly(x: f32, n: f32) -> f32 {
    x.powf(n)
}

pub fn ease_out_poly(x: f32, n: f32) -> f32 {
    1.0 - (1.0 - x).powf(n)
}

pub fn ease_in_out_poly(x: f32, n: f32) -> f32 {
    if x < 0.5 {
        (2.0 * x).powf(n) / 2.0
    } else {
        1.0 - (-2.0 * x + 2.0).powf(n) / 2.0
    }
}
