//! First-order RC low-pass.
//!
//! `RC = 1/(2π·fc)`, `dt = 1/fs`, `α = dt/(dt+RC)` and
//! `y[n] = α·x[n] + (1-α)·y[n-1]`.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

use super::{DesignParams, FilterKind, FilterModel};

#[derive(Debug, Clone)]
pub struct LowPass {
    params: DesignParams,
    alpha: f64,
    numerator: Vec<f64>,
    denominator: Vec<f64>,
    poles: Vec<Complex64>,
    zeros: Vec<Complex64>,
    prev_output: f64,
}

impl Default for LowPass {
    fn default() -> Self {
        Self::from_params(DesignParams::default())
    }
}

impl LowPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: DesignParams) -> Self {
        let mut filter = Self {
            params,
            alpha: 0.0,
            numerator: Vec::new(),
            denominator: Vec::new(),
            poles: Vec::new(),
            zeros: Vec::new(),
            prev_output: 0.0,
        };
        filter.redesign();
        filter
    }

    /// Smoothing factor, in `(0, 1)` for valid parameters.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// `α` for the given cutoff and sample rate.
pub fn smoothing_factor(cutoff_freq: f64, sample_rate: f64) -> f64 {
    let rc = 1.0 / (2.0 * PI * cutoff_freq);
    let dt = 1.0 / sample_rate;
    dt / (dt + rc)
}

impl FilterModel for LowPass {
    fn type_name(&self) -> &'static str {
        "LowPass"
    }

    fn kind(&self) -> FilterKind {
        FilterKind::LowPass
    }

    fn params(&self) -> &DesignParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut DesignParams {
        &mut self.params
    }

    fn redesign(&mut self) {
        let alpha = smoothing_factor(self.params.cutoff_freq, self.params.sample_rate);
        let feedback = 1.0 - alpha;
        self.alpha = alpha;
        self.numerator = vec![alpha];
        self.denominator = vec![1.0, -feedback];
        self.poles = vec![Complex64::new(feedback, 0.0)];
        self.zeros = vec![Complex64::new(0.0, 0.0)];
        self.prev_output = 0.0;
        tracing::trace!(alpha, "LowPass redesigned");
    }

    fn process_sample(&mut self, input: f64) -> f64 {
        let output = self.alpha * input + (1.0 - self.alpha) * self.prev_output;
        self.prev_output = output;
        output
    }

    fn numerator(&self) -> &[f64] {
        &self.numerator
    }

    fn denominator(&self) -> &[f64] {
        &self.denominator
    }

    fn poles(&self) -> &[Complex64] {
        &self.poles
    }

    fn zeros(&self) -> &[Complex64] {
        &self.zeros
    }

    fn response_gain(&self) -> f64 {
        self.alpha
    }

    fn reset(&mut self) {
        self.prev_output = 0.0;
    }
}
