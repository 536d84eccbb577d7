//! Direct Form I difference equation.

/// `y[n] = (Σ b[i]·x[n-i] − Σ_{i≥1} a[i]·y[n-i]) / a[0]`
///
/// Input history holds `b.len()` samples, output history `a.len() - 1`.
#[derive(Debug, Clone, Default)]
pub struct DirectForm {
    b: Vec<f64>,
    a: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl DirectForm {
    pub fn new(b: Vec<f64>, a: Vec<f64>) -> Self {
        let x = vec![0.0; b.len()];
        let y = vec![0.0; a.len().saturating_sub(1)];
        Self { b, a, x, y }
    }

    pub fn numerator(&self) -> &[f64] {
        &self.b
    }

    pub fn denominator(&self) -> &[f64] {
        &self.a
    }

    pub fn process(&mut self, input: f64) -> f64 {
        if !self.x.is_empty() {
            self.x.rotate_right(1);
            self.x[0] = input;
        }

        let feedforward: f64 = self.b.iter().zip(&self.x).map(|(b, x)| b * x).sum();
        let feedback: f64 = self
            .a
            .iter()
            .skip(1)
            .zip(&self.y)
            .map(|(a, y)| a * y)
            .sum();

        let mut output = feedforward - feedback;
        if let Some(&a0) = self.a.first() {
            if a0 != 0.0 && a0 != 1.0 {
                output /= a0;
            }
        }

        if !self.y.is_empty() {
            self.y.rotate_right(1);
            self.y[0] = output;
        }
        output
    }

    pub fn reset(&mut self) {
        self.x.fill(0.0);
        self.y.fill(0.0);
    }
}
