// Copyright (c) 2026  The SolarSizer developers

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use crate::error::{invalid, Result};
use crate::vecops::is_distribution;

/// Number of calculation periods (months) in a year
pub const MONTHS: usize = 12;

/// Tolerance for the sum of monthly fractions
pub const FRACTION_TOLERANCE: f64 = 1e-3;

/// Even split of annual energy among the twelve months
pub fn even_fractions() -> Vec<f64> {
    vec![1.0 / MONTHS as f64; MONTHS]
}

/// Comprueba que una serie de fracciones mensuales es válida
///
/// Check that `fractions` has twelve non negative values adding up to 1
pub fn validate_fractions(name: &str, fractions: &[f64]) -> Result<()> {
    if fractions.len() != MONTHS {
        return invalid(format!(
            "{} must have {} monthly values and has {}",
            name,
            MONTHS,
            fractions.len()
        ));
    }
    if !is_distribution(fractions, FRACTION_TOLERANCE) {
        return invalid(format!(
            "{} must be non negative and add up to 1.0 (sum = {:.4})",
            name,
            fractions.iter().sum::<f64>()
        ));
    }
    Ok(())
}

/// Check that `value` is a finite number greater or equal to zero
pub fn validate_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return invalid(format!("{} must be a non negative number and is {}", name, value));
    }
    Ok(())
}

/// Check that `value` is a finite number in the closed range [min, max]
pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return invalid(format!(
            "{} must be between {} and {} and is {}",
            name, min, max, value
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_validation() {
        assert!(validate_fractions("load", &even_fractions()).is_ok());
        assert!(validate_fractions("load", &[0.5, 0.5]).is_err());
        let mut skewed = even_fractions();
        skewed[0] += 0.1;
        assert!(validate_fractions("load", &skewed).is_err());
    }

    #[test]
    fn scalar_validation() {
        assert!(validate_non_negative("rate", 0.0).is_ok());
        assert!(validate_non_negative("rate", -0.01).is_err());
        assert!(validate_non_negative("rate", std::f64::NAN).is_err());
        assert!(validate_range("credit", 0.3, 0.0, 1.0).is_ok());
        assert!(validate_range("credit", 1.3, 0.0, 1.0).is_err());
    }
}
