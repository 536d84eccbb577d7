//! Property tests for the filter designs

use frc_filter_tool::filter::{
    lowpass::smoothing_factor, Butterworth, FilterError, FilterKind, FilterModel, LowPass,
    ParameterMap, MAX_ORDER,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_lowpass_alpha_in_unit_interval(cutoff in 0.01f64..1e4, rate in 0.01f64..1e5) {
        let alpha = smoothing_factor(cutoff, rate);
        prop_assert!(alpha > 0.0 && alpha < 1.0);
    }

    #[test]
    fn prop_lowpass_step_is_monotone(cutoff in 0.1f64..100.0, rate in 200.0f64..2000.0) {
        let mut filter = LowPass::new();
        filter.set_parameter("sampleRate", rate).unwrap();
        filter.set_parameter("cutoffFreq", cutoff).unwrap();

        let output = filter.process_block(&[1.0; 200]);
        for pair in output.windows(2) {
            prop_assert!(pair[1] >= pair[0] - 1e-12);
        }
        prop_assert!(output.iter().all(|&y| y > 0.0 && y <= 1.0 + 1e-12));
    }

    #[test]
    fn prop_butterworth_shape(order in 1usize..=MAX_ORDER, cutoff in 1.0f64..400.0) {
        let mut filter = Butterworth::new();
        filter.set_parameter("sampleRate", 1000.0).unwrap();
        filter.set_parameter("cutoffFreq", cutoff).unwrap();
        filter.set_parameter("order", order as f64).unwrap();

        prop_assert_eq!(filter.poles().len(), order);
        prop_assert!(filter.zeros().is_empty());
        prop_assert_eq!(filter.numerator().len(), order + 1);
        prop_assert_eq!(filter.denominator().len(), order + 1);
    }

    #[test]
    fn prop_unknown_parameter_rejected(name in "[a-z]{1,12}") {
        prop_assume!(!["order", "ripple", "bandwidth"].contains(&name.as_str()));
        for kind in FilterKind::all() {
            let mut filter = kind.build(&ParameterMap::new()).unwrap();
            prop_assert_eq!(
                filter.set_parameter(&name, 1.0),
                Err(FilterError::InvalidParameter(name.clone()))
            );
        }
    }
}

#[test]
fn test_all_canonical_names_accepted() {
    for kind in FilterKind::all() {
        let mut filter = kind.build(&ParameterMap::new()).unwrap();
        for name in ["order", "cutoffFreq", "sampleRate", "ripple", "bandwidth"] {
            let value = filter.parameter(name).unwrap();
            assert!(filter.set_parameter(name, value).is_ok(), "{} {}", kind, name);
        }
    }
}
