//! Measured versus designed filter response.
//!
//! The measured response is the DFT of the filter's impulse response, i.e.
//! what the time-domain coefficients actually do. The designed response is
//! [`FilterModel::frequency_response`], evaluated from poles and zeros. The
//! two agree for the LowPass design and disagree for Butterworth, whose
//! time-domain numerator is all zero.

use rustfft::num_complex::Complex64;

use super::spectrum::SpectrumAnalyzer;
use crate::filter::response::magnitude_db;
use crate::filter::FilterModel;

/// Impulse response of `filter` over `length` samples. Filter history is
/// reset before and after.
pub fn impulse_response(filter: &mut dyn FilterModel, length: usize) -> Vec<f64> {
    filter.reset();
    let response = (0..length)
        .map(|i| filter.process_sample(if i == 0 { 1.0 } else { 0.0 }))
        .collect();
    filter.reset();
    response
}

/// Response measured from the impulse response, bins 0 to Nyquist.
#[derive(Debug, Clone)]
pub struct MeasuredResponse {
    pub frequencies: Vec<f64>,
    pub response: Vec<Complex64>,
}

/// Measure the response over `length` points (rounded up to a power of two).
pub fn measure(
    analyzer: &mut SpectrumAnalyzer,
    filter: &mut dyn FilterModel,
    length: usize,
) -> MeasuredResponse {
    let size = length.max(2).next_power_of_two();
    let impulse = impulse_response(filter, size);
    let bins = analyzer.transform(&impulse, size);

    let sample_rate = filter.params().sample_rate;
    let count = size / 2 + 1;
    MeasuredResponse {
        frequencies: (0..count)
            .map(|k| k as f64 * sample_rate / size as f64)
            .collect(),
        response: bins.into_iter().take(count).collect(),
    }
}

/// Side-by-side magnitudes in dB.
#[derive(Debug, Clone)]
pub struct ResponseComparison {
    pub frequencies: Vec<f64>,
    pub designed_db: Vec<f64>,
    pub measured_db: Vec<f64>,
}

impl ResponseComparison {
    /// Largest absolute gap between the two curves, in dB.
    pub fn max_deviation_db(&self) -> f64 {
        self.designed_db
            .iter()
            .zip(&self.measured_db)
            .map(|(d, m)| (d - m).abs())
            .fold(0.0, f64::max)
    }
}

/// Compare the designed response against the measured one.
pub fn compare(filter: &mut dyn FilterModel, length: usize) -> ResponseComparison {
    let mut analyzer = SpectrumAnalyzer::new();
    let measured = measure(&mut analyzer, filter, length);
    let designed = filter.frequency_response(&measured.frequencies);

    ResponseComparison {
        designed_db: designed.into_iter().map(magnitude_db).collect(),
        measured_db: measured.response.into_iter().map(magnitude_db).collect(),
        frequencies: measured.frequencies,
    }
}
