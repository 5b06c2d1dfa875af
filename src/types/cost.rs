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

use super::{validate_non_negative, validate_range};
use crate::defaults::{srec_price_for_state, BatteryChemistry, Sector, ITC_RATE};
use crate::error::Result;

/// Hipótesis de costes de la instalación
///
/// Installed cost and incentive assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAssumptions {
    /// PV installed cost [$/kW DC]
    pub pv_cost_per_kw: f64,
    /// Battery installed cost [$/kWh usable]
    pub battery_cost_per_kwh: f64,
    /// Fixed soft costs (permits, interconnection...) [$]
    #[serde(default)]
    pub fixed_soft_costs: f64,
    /// Federal tax credit rate [0, 1]
    #[serde(default = "credit_rate_default")]
    pub credit_rate: f64,
    /// SREC price [$/MWh], 0 if there is no market
    #[serde(default)]
    pub srec_price_per_mwh: f64,
    /// Whether the location can sell SRECs
    #[serde(default)]
    pub srec_eligible: bool,
}

fn credit_rate_default() -> f64 {
    ITC_RATE
}

impl Default for CostAssumptions {
    fn default() -> Self {
        CostAssumptions::for_sector_and_chemistry(Sector::default(), BatteryChemistry::default())
    }
}

impl CostAssumptions {
    /// Reference costs for a sector and battery chemistry, with the federal ITC
    pub fn for_sector_and_chemistry(sector: Sector, chemistry: BatteryChemistry) -> Self {
        Self {
            pv_cost_per_kw: sector.pv_cost_per_kw(),
            battery_cost_per_kwh: chemistry.cost_per_kwh(),
            fixed_soft_costs: 0.0,
            credit_rate: ITC_RATE,
            srec_price_per_mwh: 0.0,
            srec_eligible: false,
        }
    }

    /// Set SREC price and eligibility from the state of the location
    pub fn with_state_srec(mut self, region: &str) -> Self {
        match srec_price_for_state(region) {
            Some(price) => {
                self.srec_price_per_mwh = price;
                self.srec_eligible = true;
            }
            None => {
                self.srec_price_per_mwh = 0.0;
                self.srec_eligible = false;
            }
        }
        self
    }

    /// Check cost values and credit rate
    pub fn validate(&self) -> Result<()> {
        validate_non_negative("PV cost", self.pv_cost_per_kw)?;
        validate_non_negative("battery cost", self.battery_cost_per_kwh)?;
        validate_non_negative("fixed soft costs", self.fixed_soft_costs)?;
        validate_non_negative("SREC price", self.srec_price_per_mwh)?;
        validate_range("credit rate", self.credit_rate, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cost_defaults() {
        let c = CostAssumptions::default();
        assert_eq!(c.pv_cost_per_kw, 2500.0);
        assert_eq!(c.battery_cost_per_kwh, 450.0);
        assert_eq!(c.credit_rate, 0.30);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn cost_state_srec() {
        let c = CostAssumptions::default().with_state_srec("NJ");
        assert!(c.srec_eligible);
        assert_eq!(c.srec_price_per_mwh, 220.0);
        let c = c.with_state_srec("AZ");
        assert!(!c.srec_eligible);
    }

    #[test]
    fn cost_credit_rate_range() {
        let mut c = CostAssumptions::default();
        c.credit_rate = 1.2;
        assert!(c.validate().is_err());
    }
}
