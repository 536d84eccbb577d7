//! FFT spectrum of sampled signals
//!
//! Provides:
//! - Windowed magnitude spectra of channel data
//! - Peak frequency detection
//! - Window functions (Hann, Hamming, Blackman)

use rustfft::{num_complex::Complex64, FftPlanner};
use std::f64::consts::PI;

/// Window function applied before the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFunction {
    /// No windowing
    #[default]
    Rectangular,
    Hann,
    Hamming,
    Blackman,
}

impl WindowFunction {
    pub fn display_name(&self) -> &'static str {
        match self {
            WindowFunction::Rectangular => "Rectangular",
            WindowFunction::Hann => "Hann",
            WindowFunction::Hamming => "Hamming",
            WindowFunction::Blackman => "Blackman",
        }
    }

    pub fn all() -> &'static [WindowFunction] {
        &[
            WindowFunction::Rectangular,
            WindowFunction::Hann,
            WindowFunction::Hamming,
            WindowFunction::Blackman,
        ]
    }

    /// Window coefficient at position `i` of `n`
    pub fn coefficient(&self, i: usize, n: usize) -> f64 {
        let x = 2.0 * PI * i as f64 / n as f64;
        match self {
            WindowFunction::Rectangular => 1.0,
            WindowFunction::Hann => 0.5 * (1.0 - x.cos()),
            WindowFunction::Hamming => 0.54 - 0.46 * x.cos(),
            // exactly 0 at the endpoints; clamp the -ε rounding leaves behind
            WindowFunction::Blackman => (0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()).max(0.0),
        }
    }

    pub fn generate(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.coefficient(i, n)).collect()
    }
}

impl std::fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for WindowFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowFunction::all()
            .iter()
            .find(|w| w.display_name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown window function: {}", s))
    }
}

/// One-sided magnitude spectrum
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    /// Bin frequencies (Hz), 0 to Nyquist
    pub frequencies: Vec<f64>,
    /// Linear magnitudes, scaled to signal amplitude
    pub magnitudes: Vec<f64>,
    pub sample_rate: f64,
    /// Hz per bin
    pub frequency_resolution: f64,
}

impl Spectrum {
    /// Strongest bin as `(frequency, magnitude)`, ignoring DC
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, &m)| (self.frequencies[i], m))
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

/// Reusable FFT planner plus window setup
pub struct SpectrumAnalyzer {
    planner: FftPlanner<f64>,
    window: WindowFunction,
    min_size: usize,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            window: WindowFunction::Hann,
            min_size: 256,
        }
    }

    pub fn with_window(mut self, window: WindowFunction) -> Self {
        self.window = window;
        self
    }

    /// Transforms are zero-padded to at least this many points
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size.max(1);
        self
    }

    /// Complex DFT of `samples`, zero-padded to `size`. No window.
    pub fn transform(&mut self, samples: &[f64], size: usize) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = samples
            .iter()
            .take(size)
            .map(|&s| Complex64::new(s, 0.0))
            .collect();
        buffer.resize(size, Complex64::new(0.0, 0.0));
        if size > 0 {
            self.planner.plan_fft_forward(size).process(&mut buffer);
        }
        buffer
    }

    /// Windowed one-sided magnitude spectrum
    pub fn compute(&mut self, samples: &[f64], sample_rate: f64) -> Spectrum {
        let n = samples.len();
        if n == 0 {
            return Spectrum {
                sample_rate,
                ..Spectrum::default()
            };
        }

        let size = self.min_size.max(n).next_power_of_two();
        let window = self.window.generate(n);
        let gain: f64 = window.iter().sum::<f64>() / n as f64;
        let windowed: Vec<f64> = samples.iter().zip(&window).map(|(s, w)| s * w).collect();
        let bins = self.transform(&windowed, size);

        let resolution = sample_rate / size as f64;
        let count = size / 2 + 1;
        let frequencies = (0..count).map(|i| i as f64 * resolution).collect();
        let magnitudes = bins
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, c)| {
                let scale = if i == 0 || 2 * i == size { 1.0 } else { 2.0 };
                scale * c.norm() / (n as f64 * gain)
            })
            .collect();

        Spectrum {
            frequencies,
            magnitudes,
            sample_rate,
            frequency_resolution: resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, amplitude: f64, sample_rate: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_window_ranges() {
        for window in WindowFunction::all() {
            for c in window.generate(64) {
                assert!(
                    (0.0..=1.0).contains(&c),
                    "{} coefficient {} out of range",
                    window.display_name(),
                    c
                );
            }
        }
    }

    #[test]
    fn test_sine_peak() {
        let samples = sine(50.0, 1.0, 1000.0, 1000);
        let spectrum = SpectrumAnalyzer::new().compute(&samples, 1000.0);
        let (freq, _) = spectrum.peak().unwrap();
        assert!((freq - 50.0).abs() < 2.0, "peak at {}", freq);
    }

    #[test]
    fn test_bin_aligned_amplitude() {
        // 64 Hz at 1024 Hz over 1024 samples lands exactly on a bin
        let samples = sine(64.0, 3.0, 1024.0, 1024);
        let mut analyzer = SpectrumAnalyzer::new().with_window(WindowFunction::Rectangular);
        let spectrum = analyzer.compute(&samples, 1024.0);
        assert_eq!(spectrum.frequency_resolution, 1.0);
        assert_eq!(spectrum.frequencies[64], 64.0);
        let magnitude = spectrum.magnitudes[64];
        assert!((magnitude - 3.0).abs() < 1e-9, "magnitude {}", magnitude);
    }

    #[test]
    fn test_empty_input() {
        let spectrum = SpectrumAnalyzer::new().compute(&[], 100.0);
        assert!(spectrum.is_empty());
        assert!(spectrum.peak().is_none());
    }

    #[test]
    fn test_window_from_str() {
        assert_eq!("hann".parse::<WindowFunction>(), Ok(WindowFunction::Hann));
        assert_eq!("BLACKMAN".parse::<WindowFunction>(), Ok(WindowFunction::Blackman));
        assert!("kaiser".parse::<WindowFunction>().is_err());
        for window in WindowFunction::all() {
            assert_eq!(window.to_string().parse::<WindowFunction>(), Ok(*window));
        }
    }

    #[test]
    fn test_transform_of_impulse_is_flat() {
        let mut analyzer = SpectrumAnalyzer::new();
        let bins = analyzer.transform(&[1.0], 8);
        assert_eq!(bins.len(), 8);
        for bin in bins {
            assert!((bin - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        }
    }
}
