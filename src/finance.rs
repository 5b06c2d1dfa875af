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

/*!
Proyección financiera
=====================

Lifetime cash flow of a system: yearly savings with PV degradation and tariff
escalation, SREC revenue with its own escalation and a battery replacement, plus
the derived NPV, IRR and LCOE.

Simple payback stays the headline figure; this projection only adds context for
each scenario.
*/

use serde::{Deserialize, Serialize};

use crate::error::{invalid, Result};
use crate::types::{validate_non_negative, validate_range};

/// Hipótesis financieras para la proyección
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialAssumptions {
    /// Analysis period [years]
    pub analysis_years: u32,
    /// Discount rate for NPV [-]
    pub discount_rate: f64,
    /// Yearly electricity rate escalation [-]
    pub rate_escalation: f64,
    /// Yearly SREC price escalation [-]
    pub srec_escalation: f64,
    /// Yearly PV production degradation [-]
    pub pv_degradation: f64,
    /// Year of battery replacement (0 = never)
    pub battery_replacement_year: u32,
    /// Replacement cost as a share of the battery gross cost [-]
    pub battery_replacement_cost_factor: f64,
}

impl Default for FinancialAssumptions {
    fn default() -> Self {
        Self {
            analysis_years: 25,
            discount_rate: 0.05,
            rate_escalation: 0.03,
            srec_escalation: 0.02,
            pv_degradation: 0.005,
            battery_replacement_year: 10,
            battery_replacement_cost_factor: 0.5,
        }
    }
}

impl FinancialAssumptions {
    /// Check projection parameters
    pub fn validate(&self) -> Result<()> {
        if self.analysis_years == 0 {
            return invalid("analysis period must be at least one year");
        }
        validate_range("discount rate", self.discount_rate, -0.99, 10.0)?;
        validate_range("rate escalation", self.rate_escalation, -0.99, 10.0)?;
        validate_range("SREC escalation", self.srec_escalation, -0.99, 10.0)?;
        validate_range("PV degradation", self.pv_degradation, 0.0, 0.99)?;
        validate_non_negative(
            "battery replacement cost factor",
            self.battery_replacement_cost_factor,
        )
    }
}

/// First year figures the projection starts from
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowBasis {
    /// Net installed cost (year 0 investment) [$]
    pub net_cost: f64,
    /// First year bill savings [$]
    pub bill_savings: f64,
    /// First year SREC revenue [$]
    pub srec_revenue: f64,
    /// First year production [kWh]
    pub production_kwh: f64,
    /// Battery gross cost, base for the replacement cost [$]
    pub battery_cost: f64,
}

/// Resultado de la proyección financiera
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeProjection {
    /// Cash flow by year, year 0 is the investment [$]
    pub cash_flows: Vec<f64>,
    /// Net present value [$]
    pub npv: f64,
    /// Internal rate of return [-], None when it doesn't exist
    pub irr: Option<f64>,
    /// Levelized cost of energy [$/kWh], 0 without production
    pub lcoe: f64,
    /// Sum of yearly savings [$]
    pub cumulative_savings: f64,
    /// Cumulative savings minus investment and replacements [$]
    pub net_profit: f64,
}

/// Proyecta los flujos de caja durante la vida útil
pub fn project(basis: &CashFlowBasis, finance: &FinancialAssumptions) -> LifetimeProjection {
    let years = finance.analysis_years;
    let mut cash_flows = Vec::with_capacity(years as usize + 1);
    cash_flows.push(-basis.net_cost);

    let mut cumulative_savings = 0.0;
    let mut lifetime_production = 0.0;
    let mut replacement_costs = 0.0;
    for year in 1..=years {
        let age = f64::from(year - 1);
        let degradation = (1.0 - finance.pv_degradation).powf(age);
        let savings = basis.bill_savings * degradation * (1.0 + finance.rate_escalation).powf(age)
            + basis.srec_revenue * degradation * (1.0 + finance.srec_escalation).powf(age);
        let replacement = if year == finance.battery_replacement_year && basis.battery_cost > 0.0 {
            basis.battery_cost * finance.battery_replacement_cost_factor
        } else {
            0.0
        };
        cumulative_savings += savings;
        replacement_costs += replacement;
        lifetime_production += basis.production_kwh * degradation;
        cash_flows.push(savings - replacement);
    }

    let lcoe = if lifetime_production > 0.0 {
        (basis.net_cost + replacement_costs) / lifetime_production
    } else {
        0.0
    };

    LifetimeProjection {
        npv: npv(&cash_flows, finance.discount_rate),
        irr: irr(&cash_flows),
        lcoe,
        cumulative_savings,
        net_profit: cumulative_savings - basis.net_cost - replacement_costs,
        cash_flows,
    }
}

/// Net present value of yearly cash flows, the first one at year 0
pub fn npv(cash_flows: &[f64], rate: f64) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(year, cf)| cf / (1.0 + rate).powi(year as i32))
        .sum()
}

/// Internal rate of return by bisection on (-0.99, 1.0)
///
/// None when the NPV doesn't change sign in the interval
pub fn irr(cash_flows: &[f64]) -> Option<f64> {
    const MAX_ITERATIONS: usize = 200;
    const TOLERANCE: f64 = 1e-9;

    let mut low = -0.99;
    let mut high = 1.0;
    let mut f_low = npv(cash_flows, low);
    let f_high = npv(cash_flows, high);
    if !(f_low.is_finite() && f_high.is_finite()) || f_low * f_high > 0.0 {
        return None;
    }
    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (low + high);
        let f_mid = npv(cash_flows, mid);
        if f_mid.abs() < TOLERANCE || (high - low) < TOLERANCE {
            return Some(mid);
        }
        if f_low * f_mid < 0.0 {
            high = mid;
        } else {
            low = mid;
            f_low = f_mid;
        }
    }
    Some(0.5 * (low + high))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_finance(years: u32) -> FinancialAssumptions {
        FinancialAssumptions {
            analysis_years: years,
            discount_rate: 0.0,
            rate_escalation: 0.0,
            srec_escalation: 0.0,
            pv_degradation: 0.0,
            battery_replacement_year: 0,
            battery_replacement_cost_factor: 0.5,
        }
    }

    #[test]
    fn projection_without_escalation() {
        let basis = CashFlowBasis {
            net_cost: 1000.0,
            bill_savings: 150.0,
            srec_revenue: 50.0,
            production_kwh: 1000.0,
            battery_cost: 0.0,
        };
        let p = project(&basis, &flat_finance(10));
        assert_eq!(p.cash_flows.len(), 11);
        assert!((p.cumulative_savings - 2000.0).abs() < 1e-9);
        assert!((p.npv - 1000.0).abs() < 1e-9);
        assert!((p.net_profit - 1000.0).abs() < 1e-9);
        assert!((p.lcoe - 0.1).abs() < 1e-12);
        let irr = p.irr.unwrap();
        assert!(npv(&p.cash_flows, irr).abs() < 1e-6);
        assert!(irr > 0.15 && irr < 0.16);
    }

    #[test]
    fn projection_battery_replacement() {
        let basis = CashFlowBasis {
            net_cost: 10_000.0,
            bill_savings: 1000.0,
            srec_revenue: 0.0,
            production_kwh: 5000.0,
            battery_cost: 4000.0,
        };
        let mut finance = flat_finance(25);
        finance.battery_replacement_year = 10;
        let p = project(&basis, &finance);
        assert!((p.cash_flows[10] + 1000.0).abs() < 1e-9);
        assert!((p.net_profit - (25_000.0 - 10_000.0 - 2000.0)).abs() < 1e-9);
    }

    #[test]
    fn projection_degradation_and_escalation() {
        let basis = CashFlowBasis {
            net_cost: 10_000.0,
            bill_savings: 1000.0,
            ..Default::default()
        };
        let p = project(&basis, &FinancialAssumptions::default());
        let expected_year2 = 1000.0 * 0.995 * 1.03;
        assert!((p.cash_flows[2] - expected_year2).abs() < 1e-9);
        assert!(p.npv < p.cumulative_savings - basis.net_cost);
    }

    #[test]
    fn irr_without_sign_change() {
        assert_eq!(irr(&[100.0, 100.0]), None);
        assert_eq!(irr(&[-100.0, -10.0]), None);
    }

    #[test]
    fn finance_validation() {
        assert!(FinancialAssumptions::default().validate().is_ok());
        let mut f = FinancialAssumptions::default();
        f.analysis_years = 0;
        assert!(f.validate().is_err());
        let mut f = FinancialAssumptions::default();
        f.pv_degradation = 1.5;
        assert!(f.validate().is_err());
    }
}
