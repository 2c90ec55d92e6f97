//! Exercises the full configuration → recompile-decision → template →
//! uniform-staging flow the renderer drives each time the host updates the
//! fractal, without touching a GPU.

use fractal::{
    formula_for, instantiate, needs_recompile, FractalConfig, FractalKind, FractalPatch,
    UniformLayout, UniformValues,
};

fn read_f32(values: &UniformValues, name: &str) -> f32 {
    let offset = values.layout().offset_of(name).expect(name);
    let bytes = &values.bytes()[offset..offset + 4];
    f32::from_le_bytes(bytes.try_into().unwrap())
}

#[test]
fn seed_change_reuses_the_program_and_updates_the_uniform() {
    // Initial compile for a Julia configuration.
    let initial = FractalConfig::default().merged(&FractalPatch {
        kind: Some(FractalKind::Julia),
        real: Some(-0.7),
        imaginary: Some(0.27015),
        max_iterations: Some(100),
        radius: Some(4.0),
        ..FractalPatch::default()
    });
    let formula = formula_for(initial.kind).unwrap();
    let sources = instantiate(formula, &initial).unwrap();
    assert!(sources.fragment.contains("iteration < 100"));

    let mut values = UniformValues::new(UniformLayout::for_program(formula.uniforms()));
    formula.push_uniforms(&mut values, &initial);
    assert_eq!(read_f32(&values, "uReal"), -0.7);

    // Changing only the seed must not invalidate the compiled program; the
    // next frame just pushes fresh uniform values.
    let updated = initial.merged(&FractalPatch {
        real: Some(-0.75),
        ..FractalPatch::default()
    });
    assert!(!needs_recompile(&initial, &updated));

    formula.push_uniforms(&mut values, &updated);
    assert_eq!(read_f32(&values, "uReal"), -0.75);
    assert_eq!(read_f32(&values, "uImaginary"), 0.27015);
    assert_eq!(read_f32(&values, "uRadiusSquared"), 16.0);
}

#[test]
fn cap_change_rebuilds_with_a_new_literal_bound() {
    let old = FractalConfig::default();
    let new = old.merged(&FractalPatch {
        max_iterations: Some(200),
        ..FractalPatch::default()
    });
    assert!(needs_recompile(&old, &new));

    let formula = formula_for(new.kind).unwrap();
    let sources = instantiate(formula, &new).unwrap();
    assert!(sources.fragment.contains("iteration < 200"));
    assert!(!sources.fragment.contains("iteration < 100"));
}

#[test]
fn kind_switch_swaps_the_uniform_set() {
    let julia = FractalConfig::default();
    let mandelbrot = julia.merged(&FractalPatch::kind(FractalKind::Mandelbrot));
    assert!(needs_recompile(&julia, &mandelbrot));

    let formula = formula_for(mandelbrot.kind).unwrap();
    let layout = UniformLayout::for_program(formula.uniforms());
    assert!(layout.offset_of("uExponent").is_some());
    assert!(layout.offset_of("uReal").is_none());
    assert_eq!(layout.offset_of("uTransform"), Some(0));
}

#[test]
fn surviving_program_keeps_its_own_uniform_state_after_a_failed_switch() {
    // A Julia program is active with radius 4.
    let active = FractalConfig::default().merged(&FractalPatch {
        kind: Some(FractalKind::Julia),
        radius: Some(4.0),
        ..FractalPatch::default()
    });
    let julia = formula_for(active.kind).unwrap();
    let mut values = UniformValues::new(UniformLayout::for_program(julia.uniforms()));
    julia.push_uniforms(&mut values, &active);
    assert_eq!(read_f32(&values, "uRadiusSquared"), 16.0);
    let last_good = values.bytes().to_vec();

    // The host requests Mandelbrot with a tighter radius, and the rebuild
    // fails. Shared uniform names resolve across kinds, so pushing the
    // requested values through the wrong formula would overwrite the
    // surviving block in place.
    let requested = active.merged(&FractalPatch {
        kind: Some(FractalKind::Mandelbrot),
        radius: Some(2.0),
        ..FractalPatch::default()
    });
    assert!(needs_recompile(&active, &requested));

    let mut corrupted = UniformValues::new(UniformLayout::for_program(julia.uniforms()));
    julia.push_uniforms(&mut corrupted, &active);
    formula_for(requested.kind)
        .unwrap()
        .push_uniforms(&mut corrupted, &requested);
    assert_eq!(read_f32(&corrupted, "uRadiusSquared"), 4.0);

    // The renderer therefore keeps the failed patch uncommitted and pushes
    // through the program's own formula with the configuration it was
    // built for; the block stays at the last good state, frame after frame.
    julia.push_uniforms(&mut values, &active);
    assert_eq!(values.bytes(), last_good.as_slice());
    assert_eq!(read_f32(&values, "uRadiusSquared"), 16.0);
}

#[test]
fn switching_to_none_has_no_formula() {
    let julia = FractalConfig::default();
    let none = julia.merged(&FractalPatch::kind(FractalKind::None));
    assert!(needs_recompile(&julia, &none));
    assert!(formula_for(none.kind).is_none());
}
