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

use serde::{Deserialize, Serialize};

use super::{validate_fractions, validate_non_negative, validate_range};
use crate::defaults::DEFAULT_UNCERTAINTY_PCT;
use crate::error::{invalid, Result};

/// Perfil de producción fotovoltaica de referencia
///
/// Production estimate from the solar production service for a reference
/// system capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionProfile {
    /// Reference system capacity [kW DC]
    pub reference_capacity_kw: f64,
    /// Annual AC energy output at the reference capacity [kWh]
    pub annual_output_kwh: f64,
    /// Share of the annual output produced in each month [-]
    pub monthly_fractions: Vec<f64>,
    /// Capacity factor [-]
    #[serde(default)]
    pub capacity_factor: f64,
    /// Production uncertainty (TMY variance) [%]
    #[serde(default = "uncertainty_default")]
    pub uncertainty_pct: f64,
}

fn uncertainty_default() -> f64 {
    DEFAULT_UNCERTAINTY_PCT
}

impl ProductionProfile {
    /// Specific yield [kWh/kW]
    pub fn specific_yield(&self) -> f64 {
        if self.reference_capacity_kw > 0.0 {
            self.annual_output_kwh / self.reference_capacity_kw
        } else {
            0.0
        }
    }

    /// Check profile invariants
    pub fn validate(&self) -> Result<()> {
        if !(self.reference_capacity_kw.is_finite() && self.reference_capacity_kw > 0.0) {
            return invalid(format!(
                "reference capacity must be positive and is {}",
                self.reference_capacity_kw
            ));
        }
        validate_non_negative("annual output", self.annual_output_kwh)?;
        validate_fractions("production monthly fractions", &self.monthly_fractions)?;
        validate_range("capacity factor", self.capacity_factor, 0.0, 1.0)?;
        validate_uncertainty(self.uncertainty_pct)
    }
}

/// Uncertainty must stay in [0, 100) so that the conservative band keeps
/// a positive production
pub fn validate_uncertainty(pct: f64) -> Result<()> {
    if !pct.is_finite() || pct < 0.0 || pct >= 100.0 {
        return invalid(format!(
            "production uncertainty must be in [0, 100) % and is {}",
            pct
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::even_fractions;

    fn profile() -> ProductionProfile {
        ProductionProfile {
            reference_capacity_kw: 5.0,
            annual_output_kwh: 7235.0,
            monthly_fractions: even_fractions(),
            capacity_factor: 0.165,
            uncertainty_pct: 12.5,
        }
    }

    #[test]
    fn profile_validation() {
        assert!(profile().validate().is_ok());
        let mut p = profile();
        p.reference_capacity_kw = 0.0;
        assert!(p.validate().is_err());
        let mut p = profile();
        p.monthly_fractions[3] = 0.5;
        assert!(p.validate().is_err());
        let mut p = profile();
        p.uncertainty_pct = 100.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn profile_specific_yield() {
        assert!((profile().specific_yield() - 1447.0).abs() < 1e-9);
    }
}
