//! Causal single-input single-output digital filters.
//!
//! Every design implements [`FilterModel`]: human parameters (order, cutoff,
//! sample rate, ...) go in through [`FilterModel::set_parameter`], and each
//! successful set recomputes coefficients, poles and zeros and clears the
//! sample history. Samples are then pushed through
//! [`FilterModel::process_sample`] / [`FilterModel::process_block`].
//!
//! # Designs
//!
//! - [`Butterworth`]: pole placement on a circle of radius `2π·fc/fs`
//! - [`LowPass`]: first-order RC discretization
//!
//! # Frequency response
//!
//! [`FilterModel::frequency_response`] evaluates the zero/pole/gain form on
//! the unit circle. It is computed from the poles and zeros alone, not from
//! the time-domain coefficients, so the two views can disagree for the
//! Butterworth design.

pub mod butterworth;
pub mod direct_form;
pub mod export;
pub mod lowpass;
pub mod params;
pub mod response;

pub use butterworth::Butterworth;
pub use direct_form::DirectForm;
pub use export::linear_filter_code;
pub use lowpass::LowPass;
pub use params::{DesignParams, FilterParameter, ParameterMap, MAX_ORDER};

use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by parameter access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unknown filter parameter '{0}'")]
    InvalidParameter(String),

    #[error("Invalid value {value} for '{name}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Unknown filter type '{0}'")]
    UnknownType(String),
}

/// Contract shared by all filter designs.
pub trait FilterModel: Send {
    /// Display name of the design.
    fn type_name(&self) -> &'static str;

    fn kind(&self) -> FilterKind;

    /// Current design parameters.
    fn params(&self) -> &DesignParams;

    fn params_mut(&mut self) -> &mut DesignParams;

    /// Recompute coefficients, poles and zeros from `params()` and zero the
    /// history.
    fn redesign(&mut self);

    /// Set one named parameter and redesign. The filter is untouched on error.
    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), FilterError> {
        let param = FilterParameter::from_name(name)?;
        self.params_mut().set(param, value)?;
        self.redesign();
        Ok(())
    }

    /// Read one named parameter.
    fn parameter(&self, name: &str) -> Result<f64, FilterError> {
        let param = FilterParameter::from_name(name)?;
        Ok(self.params().get(param))
    }

    /// All parameters as a name → value map.
    fn parameter_map(&self) -> ParameterMap {
        self.params().to_map()
    }

    fn process_sample(&mut self, input: f64) -> f64;

    /// Filter a block; history carries over between calls.
    fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    fn numerator(&self) -> &[f64];

    fn denominator(&self) -> &[f64];

    fn poles(&self) -> &[Complex64];

    fn zeros(&self) -> &[Complex64];

    /// Scalar gain of the zero/pole/gain form.
    fn response_gain(&self) -> f64 {
        1.0
    }

    /// Complex response at each frequency (Hz).
    fn frequency_response(&self, frequencies: &[f64]) -> Vec<Complex64> {
        response::frequency_response(
            self.response_gain(),
            self.zeros(),
            self.poles(),
            self.params().sample_rate,
            frequencies,
        )
    }

    /// Zero the sample history without touching the design.
    fn reset(&mut self);
}

/// Available filter designs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    Butterworth,
    LowPass,
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Butterworth => "Butterworth",
            FilterKind::LowPass => "LowPass",
        }
    }

    pub fn all() -> &'static [FilterKind] {
        &[FilterKind::Butterworth, FilterKind::LowPass]
    }

    /// Build a filter from the design defaults overlaid with `params`.
    pub fn build(&self, params: &ParameterMap) -> Result<Box<dyn FilterModel>, FilterError> {
        self.build_with(&DesignParams::default(), params)
    }

    /// Build a filter from `defaults` overlaid with `params`.
    pub fn build_with(
        &self,
        defaults: &DesignParams,
        params: &ParameterMap,
    ) -> Result<Box<dyn FilterModel>, FilterError> {
        let mut design = defaults.clone();
        design.apply_map(params)?;
        Ok(match self {
            FilterKind::Butterworth => Box::new(Butterworth::from_params(design)),
            FilterKind::LowPass => Box::new(LowPass::from_params(design)),
        })
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "butterworth" => Ok(FilterKind::Butterworth),
            "lowpass" | "lowpassfilter" | "low-pass" => Ok(FilterKind::LowPass),
            _ => Err(FilterError::UnknownType(s.to_string())),
        }
    }
}
