//! Tests for field lookup and display range resolution.

use radar_common::{DisplayRanges, RadarError, RadarField, RangeOverrides, Span};

// ============================================================================
// Default ranges
// ============================================================================

#[test]
fn test_defaults_without_overrides() {
    let ranges = DisplayRanges::resolve(&RangeOverrides::default());

    assert_eq!(ranges.get(RadarField::Reflectivity), Span::new(0.0, 64.0));
    assert_eq!(ranges.get(RadarField::Velocity), Span::new(-20.0, 20.0));
    assert_eq!(
        ranges.get(RadarField::DifferentialReflectivity),
        Span::new(-8.0, 8.0)
    );
    assert_eq!(
        ranges.get(RadarField::CrossCorrelationRatio),
        Span::new(0.5, 1.0)
    );
    assert_eq!(
        ranges.get(RadarField::DifferentialPhase),
        Span::new(0.0, 360.0)
    );
    assert_eq!(ranges.get(RadarField::SpectrumWidth), Span::new(0.0, 20.0));
}

#[test]
fn test_default_matches_field_spec() {
    let ranges = DisplayRanges::default();
    for field in RadarField::ALL {
        assert_eq!(ranges.get(field), field.spec().default_range);
    }
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_each_override_used_verbatim() {
    let overrides = RangeOverrides {
        dbz: Some(Span::new(-10.0, 75.0)),
        vel: Some(Span::new(-40.0, 40.0)),
        zdr: Some(Span::new(-2.0, 6.0)),
        cc: Some(Span::new(0.8, 1.05)),
        phidp: Some(Span::new(90.0, 180.0)),
        sw: Some(Span::new(1.0, 12.0)),
    };
    let ranges = DisplayRanges::resolve(&overrides);

    for field in RadarField::ALL {
        assert_eq!(ranges.get(field), overrides.get(field).unwrap());
    }
}

#[test]
fn test_override_only_touches_its_field() {
    let overrides = RangeOverrides {
        vel: Some(Span::new(-30.0, 30.0)),
        ..RangeOverrides::default()
    };
    let ranges = DisplayRanges::resolve(&overrides);

    assert_eq!(ranges.velocity, Span::new(-30.0, 30.0));
    assert_eq!(ranges.reflectivity, Span::new(0.0, 64.0));
}

#[test]
fn test_inverted_override_is_not_corrected() {
    let overrides = RangeOverrides {
        dbz: Some(Span::new(64.0, 0.0)),
        ..RangeOverrides::default()
    };
    assert_eq!(
        DisplayRanges::resolve(&overrides).reflectivity,
        Span::new(64.0, 0.0)
    );
}

// ============================================================================
// Field names
// ============================================================================

#[test]
fn test_unknown_field_is_declared_error() {
    let err = "reticulated_splines".parse::<RadarField>().unwrap_err();
    match err {
        RadarError::UnknownField(name) => assert_eq!(name, "reticulated_splines"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unknown_field_is_user_error() {
    let err = "zdr".parse::<RadarField>().unwrap_err();
    assert!(err.is_user_error());
}

// ============================================================================
// Span parsing
// ============================================================================

#[test]
fn test_span_parse() {
    assert_eq!("-20,20".parse::<Span>().unwrap(), Span::new(-20.0, 20.0));
    assert_eq!(" 0.5 , 1 ".parse::<Span>().unwrap(), Span::new(0.5, 1.0));
}

#[test]
fn test_span_parse_rejects_bad_input() {
    assert!(matches!(
        "1,2,3".parse::<Span>(),
        Err(RadarError::InvalidSpan(_))
    ));
    assert!("a,b".parse::<Span>().is_err());
    assert!("5".parse::<Span>().is_err());
}
