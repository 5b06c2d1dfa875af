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
Modelo de costes
================

Gross and net (after tax credit) installed cost of a PV + battery system and
SREC revenue from its production.
*/

use serde::{Deserialize, Serialize};

use crate::types::CostAssumptions;

/// Coste de la instalación
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemCost {
    /// Installed cost before incentives [$]
    pub gross: f64,
    /// Installed cost after the tax credit [$]
    pub net: f64,
}

/// Calcula el coste bruto y neto de la instalación
///
/// gross = pv_kw x pv_cost_per_kw + battery_kwh x battery_cost_per_kwh + fixed_soft_costs
/// net = gross x (1 - credit_rate)
///
/// Inputs are validated by the caller.
pub fn estimate_cost(pv_kw: f64, battery_kwh: f64, assumptions: &CostAssumptions) -> SystemCost {
    let gross = pv_kw * assumptions.pv_cost_per_kw
        + battery_kwh * assumptions.battery_cost_per_kwh
        + assumptions.fixed_soft_costs;
    SystemCost {
        gross,
        net: gross * (1.0 - assumptions.credit_rate),
    }
}

/// Annual SREC revenue [$] for an annual production [kWh]
pub fn srec_revenue(annual_production_kwh: f64, assumptions: &CostAssumptions) -> f64 {
    if assumptions.srec_eligible {
        annual_production_kwh / 1000.0 * assumptions.srec_price_per_mwh
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assumptions() -> CostAssumptions {
        CostAssumptions {
            pv_cost_per_kw: 2800.0,
            battery_cost_per_kwh: 800.0,
            fixed_soft_costs: 1000.0,
            credit_rate: 0.30,
            srec_price_per_mwh: 220.0,
            srec_eligible: true,
        }
    }

    #[test]
    fn cost_gross_and_net() {
        let c = estimate_cost(6.0, 10.0, &assumptions());
        assert!((c.gross - 25_800.0).abs() < 1e-9);
        assert!((c.net - 18_060.0).abs() < 1e-9);
    }

    #[test]
    fn cost_without_credit() {
        let mut a = assumptions();
        a.credit_rate = 0.0;
        let c = estimate_cost(5.0, 0.0, &a);
        assert_eq!(c.gross, c.net);
    }

    #[test]
    fn srec_only_when_eligible() {
        let mut a = assumptions();
        assert!((srec_revenue(7235.0, &a) - 1591.7).abs() < 1e-9);
        a.srec_eligible = false;
        assert_eq!(srec_revenue(7235.0, &a), 0.0);
    }
}
