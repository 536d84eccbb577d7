//! Signal analysis
//!
//! - FFT magnitude spectra of channel data
//! - Measured (impulse response) versus designed filter response

pub mod response;
pub mod spectrum;

pub use response::{compare, impulse_response, measure, MeasuredResponse, ResponseComparison};
pub use spectrum::{Spectrum, SpectrumAnalyzer, WindowFunction};
