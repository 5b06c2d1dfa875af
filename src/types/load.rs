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

use super::{even_fractions, validate_fractions, validate_non_negative, validate_range};
use crate::error::{invalid, Result};
use crate::vecops::veckmul;

/// Consumo eléctrico de la vivienda
///
/// Household electricity consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAssumption {
    /// Annual consumption [kWh]
    pub annual_consumption_kwh: f64,
    /// Share of the annual consumption in each month [-]
    pub monthly_fractions: Vec<f64>,
    /// Share of the average demand that must be kept during an outage [0, 1]
    #[serde(default)]
    pub critical_load_fraction: f64,
}

impl LoadAssumption {
    /// Load evenly split among months
    pub fn even(annual_consumption_kwh: f64, critical_load_fraction: f64) -> Self {
        Self {
            annual_consumption_kwh,
            monthly_fractions: even_fractions(),
            critical_load_fraction,
        }
    }

    /// Consumo estimado a partir de la factura mensual
    ///
    /// Load derived from the average monthly bill [$] and the retail rate [$/kWh]
    pub fn from_monthly_bill(
        monthly_bill: f64,
        rate: f64,
        critical_load_fraction: f64,
    ) -> Result<Self> {
        validate_non_negative("monthly bill", monthly_bill)?;
        if !(rate.is_finite() && rate > 0.0) {
            return invalid(format!("electricity rate must be positive and is {}", rate));
        }
        Ok(Self::even(monthly_bill * 12.0 / rate, critical_load_fraction))
    }

    /// Monthly consumption [kWh]
    pub fn monthly_kwh(&self) -> Vec<f64> {
        veckmul(&self.monthly_fractions, self.annual_consumption_kwh)
    }

    /// Check load invariants
    pub fn validate(&self) -> Result<()> {
        validate_non_negative("annual consumption", self.annual_consumption_kwh)?;
        validate_fractions("load monthly fractions", &self.monthly_fractions)?;
        validate_range("critical load fraction", self.critical_load_fraction, 0.0, 1.0)
    }
}
