//! Named design parameters shared by every filter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FilterError;

/// Parameter store keyed by canonical name. Ordered so that listings and
/// generated code are stable.
pub type ParameterMap = BTreeMap<String, f64>;

/// Highest accepted filter order.
pub const MAX_ORDER: usize = 32;

/// Canonical parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterParameter {
    Order,
    CutoffFreq,
    SampleRate,
    Ripple,
    Bandwidth,
}

impl FilterParameter {
    pub const ALL: [FilterParameter; 5] = [
        FilterParameter::Order,
        FilterParameter::CutoffFreq,
        FilterParameter::SampleRate,
        FilterParameter::Ripple,
        FilterParameter::Bandwidth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterParameter::Order => "order",
            FilterParameter::CutoffFreq => "cutoffFreq",
            FilterParameter::SampleRate => "sampleRate",
            FilterParameter::Ripple => "ripple",
            FilterParameter::Bandwidth => "bandwidth",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, FilterError> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| FilterError::InvalidParameter(name.to_string()))
    }
}

impl std::fmt::Display for FilterParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Design parameters of one filter instance.
///
/// `ripple` and `bandwidth` are stored for every design even when the
/// design does not use them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignParams {
    #[serde(default = "default_order")]
    pub order: usize,
    #[serde(default = "default_cutoff_freq")]
    pub cutoff_freq: f64,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    #[serde(default = "default_ripple")]
    pub ripple: f64,
    #[serde(default = "default_bandwidth")]
    pub bandwidth: f64,
}

fn default_order() -> usize {
    2
}

fn default_cutoff_freq() -> f64 {
    1000.0
}

fn default_sample_rate() -> f64 {
    44100.0
}

fn default_ripple() -> f64 {
    1.0
}

fn default_bandwidth() -> f64 {
    100.0
}

impl Default for DesignParams {
    fn default() -> Self {
        Self {
            order: default_order(),
            cutoff_freq: default_cutoff_freq(),
            sample_rate: default_sample_rate(),
            ripple: default_ripple(),
            bandwidth: default_bandwidth(),
        }
    }
}

impl DesignParams {
    pub fn get(&self, param: FilterParameter) -> f64 {
        match param {
            FilterParameter::Order => self.order as f64,
            FilterParameter::CutoffFreq => self.cutoff_freq,
            FilterParameter::SampleRate => self.sample_rate,
            FilterParameter::Ripple => self.ripple,
            FilterParameter::Bandwidth => self.bandwidth,
        }
    }

    /// Validate and store one value. Fractional orders are truncated.
    pub fn set(&mut self, param: FilterParameter, value: f64) -> Result<(), FilterError> {
        let invalid = |reason| FilterError::InvalidValue {
            name: param.name(),
            value,
            reason,
        };
        if !value.is_finite() {
            return Err(invalid("must be finite"));
        }

        match param {
            FilterParameter::Order => {
                let order = value.trunc();
                if order < 1.0 || order > MAX_ORDER as f64 {
                    return Err(invalid("must be between 1 and 32"));
                }
                self.order = order as usize;
            }
            FilterParameter::CutoffFreq => {
                if value <= 0.0 {
                    return Err(invalid("must be positive"));
                }
                self.cutoff_freq = value;
            }
            FilterParameter::SampleRate => {
                if value <= 0.0 {
                    return Err(invalid("must be positive"));
                }
                self.sample_rate = value;
            }
            FilterParameter::Ripple => {
                if value < 0.0 {
                    return Err(invalid("must not be negative"));
                }
                self.ripple = value;
            }
            FilterParameter::Bandwidth => {
                if value < 0.0 {
                    return Err(invalid("must not be negative"));
                }
                self.bandwidth = value;
            }
        }
        Ok(())
    }

    /// Apply every entry of `map`; stops at the first rejected entry.
    pub fn apply_map(&mut self, map: &ParameterMap) -> Result<(), FilterError> {
        for (name, &value) in map {
            self.set(FilterParameter::from_name(name)?, value)?;
        }
        Ok(())
    }

    pub fn to_map(&self) -> ParameterMap {
        FilterParameter::ALL
            .into_iter()
            .map(|p| (p.name().to_string(), self.get(p)))
            .collect()
    }
}
