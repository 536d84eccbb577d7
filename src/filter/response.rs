//! Zero/pole/gain evaluation on the unit circle.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

/// `H(z) = k·Π(z − z_i) / Π(z − p_i)`.
pub fn evaluate(gain: f64, zeros: &[Complex64], poles: &[Complex64], z: Complex64) -> Complex64 {
    let num = zeros
        .iter()
        .fold(Complex64::new(gain, 0.0), |acc, &q| acc * (z - q));
    let den = poles
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (z - p));
    num / den
}

/// Point on the unit circle for `frequency` Hz at `sample_rate`.
pub fn unit_circle(frequency: f64, sample_rate: f64) -> Complex64 {
    Complex64::from_polar(1.0, 2.0 * PI * frequency / sample_rate)
}

/// Response at each frequency (Hz).
pub fn frequency_response(
    gain: f64,
    zeros: &[Complex64],
    poles: &[Complex64],
    sample_rate: f64,
    frequencies: &[f64],
) -> Vec<Complex64> {
    frequencies
        .iter()
        .map(|&f| evaluate(gain, zeros, poles, unit_circle(f, sample_rate)))
        .collect()
}

/// Magnitude in dB, floored at -200.
pub fn magnitude_db(h: Complex64) -> f64 {
    let mag = h.norm();
    if mag > 1e-10 {
        20.0 * mag.log10()
    } else {
        -200.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_roots_give_gain() {
        let h = evaluate(2.5, &[], &[], Complex64::new(0.3, 0.4));
        assert_eq!(h, Complex64::new(2.5, 0.0));
    }

    #[test]
    fn test_single_pole() {
        // 1 / (z - 0.5) at z = 1
        let h = evaluate(1.0, &[], &[Complex64::new(0.5, 0.0)], Complex64::new(1.0, 0.0));
        assert!((h.re - 2.0).abs() < 1e-12);
        assert!(h.im.abs() < 1e-12);
    }

    #[test]
    fn test_unit_circle_at_nyquist() {
        let z = unit_circle(50.0, 100.0);
        assert!((z.re + 1.0).abs() < 1e-12);
        assert!(z.im.abs() < 1e-12);
    }

    #[test]
    fn test_magnitude_db() {
        assert!((magnitude_db(Complex64::new(10.0, 0.0)) - 20.0).abs() < 1e-12);
        assert_eq!(magnitude_db(Complex64::new(0.0, 0.0)), -200.0);
    }
}
