//! Butterworth design by pole placement.
//!
//! For order `N` and `wc = 2π·fc/fs` the poles sit at
//! `wc·exp(iπ(2k+1)/(2N))`, `k = 0..N`. There are no zeros.
//!
//! The time-domain coefficients are `a = [1, -Re(p_0), ..., -Re(p_{N-1})]`
//! and a numerator of `N+1` zeros scaled by `1/Π|p_k|`. The numerator is
//! therefore all zero and the filter outputs zero for any input; the
//! frequency response is still evaluated from the poles.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

use super::{DesignParams, DirectForm, FilterKind, FilterModel};

#[derive(Debug, Clone)]
pub struct Butterworth {
    params: DesignParams,
    poles: Vec<Complex64>,
    zeros: Vec<Complex64>,
    df: DirectForm,
}

impl Default for Butterworth {
    fn default() -> Self {
        Self::from_params(DesignParams::default())
    }
}

impl Butterworth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: DesignParams) -> Self {
        let mut filter = Self {
            params,
            poles: Vec::new(),
            zeros: Vec::new(),
            df: DirectForm::default(),
        };
        filter.redesign();
        filter
    }

    /// Normalized angular cutoff `2π·fc/fs`.
    pub fn angular_cutoff(&self) -> f64 {
        2.0 * PI * self.params.cutoff_freq / self.params.sample_rate
    }
}

/// Pole positions for the given order and angular cutoff.
pub fn butterworth_poles(order: usize, wc: f64) -> Vec<Complex64> {
    (0..order)
        .map(|k| {
            let theta = PI * (2 * k + 1) as f64 / (2 * order) as f64;
            Complex64::from_polar(wc, theta)
        })
        .collect()
}

impl FilterModel for Butterworth {
    fn type_name(&self) -> &'static str {
        "Butterworth"
    }

    fn kind(&self) -> FilterKind {
        FilterKind::Butterworth
    }

    fn params(&self) -> &DesignParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut DesignParams {
        &mut self.params
    }

    fn redesign(&mut self) {
        let order = self.params.order;
        self.poles = butterworth_poles(order, self.angular_cutoff());
        self.zeros.clear();

        let mut a = Vec::with_capacity(order + 1);
        a.push(1.0);
        a.extend(self.poles.iter().map(|p| -p.re));

        let mut b = vec![0.0; order + 1];
        let gain: f64 = self.poles.iter().map(|p| p.norm()).product();
        if gain != 0.0 && gain.is_finite() {
            for coeff in &mut b {
                *coeff /= gain;
            }
        }

        self.df = DirectForm::new(b, a);
        tracing::trace!(order, cutoff = self.params.cutoff_freq, "Butterworth redesigned");
    }

    fn process_sample(&mut self, input: f64) -> f64 {
        self.df.process(input)
    }

    fn numerator(&self) -> &[f64] {
        self.df.numerator()
    }

    fn denominator(&self) -> &[f64] {
        self.df.denominator()
    }

    fn poles(&self) -> &[Complex64] {
        &self.poles
    }

    fn zeros(&self) -> &[Complex64] {
        &self.zeros
    }

    fn reset(&mut self) {
        self.df.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterError;

    const EPS: f64 = 1e-12;

    fn design(order: f64, cutoff: f64, rate: f64) -> Butterworth {
        let mut filter = Butterworth::new();
        filter.set_parameter("sampleRate", rate).unwrap();
        filter.set_parameter("cutoffFreq", cutoff).unwrap();
        filter.set_parameter("order", order).unwrap();
        filter
    }

    #[test]
    fn test_pole_count_and_radius() {
        let filter = design(4.0, 100.0, 1000.0);
        let wc = 2.0 * PI * 100.0 / 1000.0;
        assert_eq!(filter.poles().len(), 4);
        assert!(filter.zeros().is_empty());
        for pole in filter.poles() {
            assert!((pole.norm() - wc).abs() < EPS);
        }
    }

    #[test]
    fn test_first_pole_angle() {
        let filter = design(2.0, 100.0, 1000.0);
        let angle = filter.poles()[0].arg();
        assert!((angle - PI / 4.0).abs() < EPS);
    }

    #[test]
    fn test_coefficient_lengths() {
        let filter = design(3.0, 50.0, 500.0);
        assert_eq!(filter.denominator().len(), 4);
        assert_eq!(filter.numerator().len(), 4);
        assert_eq!(filter.denominator()[0], 1.0);
        for (a, p) in filter.denominator()[1..].iter().zip(filter.poles()) {
            assert!((a + p.re).abs() < EPS);
        }
    }

    #[test]
    fn test_output_is_zero() {
        let mut filter = design(2.0, 100.0, 1000.0);
        let out = filter.process_block(&[1.0, -3.0, 7.5, 100.0]);
        assert!(out.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_invalid_order_keeps_design() {
        let mut filter = design(2.0, 100.0, 1000.0);
        let err = filter.set_parameter("order", 0.0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { name: "order", .. }));
        assert_eq!(filter.poles().len(), 2);
        assert_eq!(filter.parameter("order").unwrap(), 2.0);
    }

    #[test]
    fn test_ripple_and_bandwidth_stored() {
        let mut filter = Butterworth::new();
        filter.set_parameter("ripple", 0.5).unwrap();
        filter.set_parameter("bandwidth", 20.0).unwrap();
        assert_eq!(filter.parameter("ripple").unwrap(), 0.5);
        assert_eq!(filter.parameter_map()["bandwidth"], 20.0);
    }
}
