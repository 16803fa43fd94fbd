use faulty_terminal::params::{clamp_pixel_ratio, MAX_PIXEL_RATIO};
use faulty_terminal::{Dither, EffectError, ParameterSet};

#[test]
fn defaults_match_component_inputs() {
    let params = ParameterSet::default();
    assert_eq!(params.scale, 1.2);
    assert_eq!(params.grid_mul, [2.0, 1.0]);
    assert_eq!(params.digit_size, 1.5);
    assert_eq!(params.time_scale, 0.8);
    assert!(!params.pause);
    assert_eq!(params.tint, "#84bd7d");
    assert!(params.mouse_react);
    assert!(params.page_load_animation);
    assert_eq!(params.dither.amount(), 0.0);
    assert_eq!(params.style_class, None);
}

#[test]
fn json_keys_are_camel_case_and_optional() {
    let params = ParameterSet::from_json(
        r##"{ "gridMul": [3, 4], "noiseAmp": 0.5, "dpr": 1.5, "tint": "#fff", "styleClass": "hero" }"##,
    )
    .unwrap();

    assert_eq!(params.grid_mul, [3.0, 4.0]);
    assert_eq!(params.noise_amp, 0.5);
    assert_eq!(params.pixel_ratio, 1.5);
    assert_eq!(params.tint_rgb(), [1.0, 1.0, 1.0]);
    assert_eq!(params.style_class.as_deref(), Some("hero"));
    assert_eq!(params.curvature, ParameterSet::default().curvature);
}

#[test]
fn dither_accepts_numbers_and_flags() {
    let on = ParameterSet::from_json(r#"{ "dither": true }"#).unwrap();
    let off = ParameterSet::from_json(r#"{ "dither": false }"#).unwrap();
    let amount = ParameterSet::from_json(r#"{ "dither": 2.5 }"#).unwrap();

    assert_eq!(on.dither, Dither::Enabled(true));
    assert_eq!(on.dither.amount(), 1.0);
    assert_eq!(off.dither.amount(), 0.0);
    assert_eq!(amount.dither.amount(), 2.5);
}

#[test]
fn merge_only_touches_present_keys() {
    let base = ParameterSet {
        brightness: 0.7,
        ..ParameterSet::default()
    };
    let merged = base.merged(r#"{ "pause": true, "scale": 3 }"#).unwrap();

    assert!(merged.pause);
    assert_eq!(merged.scale, 3.0);
    assert_eq!(merged.brightness, 0.7);
    assert_eq!(merged.tint, base.tint);
}

#[test]
fn merge_rejects_non_objects_and_bad_types() {
    let base = ParameterSet::default();
    assert!(matches!(base.merged("[1, 2]"), Err(EffectError::ConfigShape)));
    assert!(matches!(
        base.merged(r#"{ "scale": "big" }"#),
        Err(EffectError::Config(_))
    ));
    assert!(matches!(base.merged("{"), Err(EffectError::Config(_))));
}

#[test]
fn out_of_range_values_pass_through() {
    let params = ParameterSet::from_json(r#"{ "brightness": -4, "curvature": 12 }"#).unwrap();
    assert_eq!(params.brightness, -4.0);
    assert_eq!(params.curvature, 12.0);
}

#[test]
fn pixel_ratio_is_capped() {
    assert_eq!(clamp_pixel_ratio(3.0), MAX_PIXEL_RATIO);
    assert_eq!(clamp_pixel_ratio(1.25), 1.25);
    assert_eq!(clamp_pixel_ratio(0.0), 1.0);
    assert_eq!(clamp_pixel_ratio(f64::NAN), 1.0);
    assert_eq!(ParameterSet::for_device(3.0).pixel_ratio, 2.0);

    let params = ParameterSet {
        pixel_ratio: 4.0,
        ..ParameterSet::default()
    };
    assert_eq!(params.effective_pixel_ratio(), 2.0);
}
