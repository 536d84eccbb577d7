//! Coefficient export as WPILib C++ source.

use std::fmt::Write;

use super::FilterModel;

/// `frc::LinearFilter<double>` declaration built from the filter's
/// numerator (feedforward) and denominator (feedback) coefficients.
pub fn linear_filter_code(filter: &dyn FilterModel) -> String {
    let mut out = String::new();
    out.push_str("#include <frc/filter/LinearFilter.h>\n\n");
    let _ = writeln!(out, "// Generated {} filter coefficients", filter.type_name());
    out.push_str("frc::LinearFilter<double> filter({\n");
    out.push_str("    // Numerator coefficients (b)\n");
    write_coefficients(&mut out, filter.numerator());
    out.push_str("}, {\n");
    out.push_str("    // Denominator coefficients (a)\n");
    write_coefficients(&mut out, filter.denominator());
    out.push_str("});\n");
    out
}

fn write_coefficients(out: &mut String, coefficients: &[f64]) {
    let last = coefficients.len().saturating_sub(1);
    for (i, c) in coefficients.iter().enumerate() {
        let sep = if i < last { "," } else { "" };
        let _ = writeln!(out, "    {c}{sep}");
    }
}
