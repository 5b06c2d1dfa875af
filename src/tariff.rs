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
Modelo tarifario
================

Pricing of imported and exported energy by period for a `TariffSchedule`.

- flat tariffs price the total import with the residential rate
- time of use tariffs price each period with its rate, or the residential rate when
  the period is not in the table
- exports are credited according to the distributed generation rule:
    - net metering: import rate of the same period, netted over the year
    - net billing: export (avoided cost) rate, can't turn the bill into a credit
    - buy-all-sell-all: export rate, paid as separate revenue
    - none: no credit
*/

use serde::{Deserialize, Serialize};

use crate::{
    error::{invalid, Result, SizingError},
    types::{DgRule, RateStructure, TariffSchedule},
    vecops::{vecsum, vecvecmul},
};

/// Resultado de la facturación anual
///
/// Annual billing result.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Billing {
    /// Import charges, before any export credit [$]
    pub bill_before: f64,
    /// Bill after applying the export credit [$]
    pub bill_after: f64,
    /// Value of the exported energy [$]
    pub export_credit: f64,
}

/// Valora la energía importada y exportada
///
/// Price an import/export energy profile with a tariff.
///
/// * `import_kwh` - grid import by period [kWh]
/// * `export_kwh` - grid export by period [kWh]
/// * `schedule` - tariff
///
/// # Errors
///
/// * `MissingRate` if a period has no rate and the tariff has no residential rate
/// * `InputValidation` if the import and export profiles have different lengths
///
pub fn price_energy(
    import_kwh: &[f64],
    export_kwh: &[f64],
    schedule: &TariffSchedule,
) -> Result<Billing> {
    if import_kwh.len() != export_kwh.len() {
        return invalid(format!(
            "import ({}) and export ({}) profiles must have the same number of periods",
            import_kwh.len(),
            export_kwh.len()
        ));
    }

    let (bill_before, export_value) = match schedule.structure {
        RateStructure::Flat => {
            let rate = schedule
                .residential_rate
                .ok_or(SizingError::MissingRate { period: 0 })?;
            let export_rate = schedule.export_credit_rate(0)?;
            (vecsum(import_kwh) * rate, vecsum(export_kwh) * export_rate)
        }
        RateStructure::TimeOfUse { .. } => {
            let import_rates = (0..import_kwh.len())
                .map(|period| schedule.import_rate(period))
                .collect::<Result<Vec<f64>>>()?;
            let export_rates = (0..export_kwh.len())
                .map(|period| schedule.export_credit_rate(period))
                .collect::<Result<Vec<f64>>>()?;
            (
                vecsum(&vecvecmul(import_kwh, &import_rates)),
                vecsum(&vecvecmul(export_kwh, &export_rates)),
            )
        }
    };

    let bill_after = match schedule.dg_rule {
        DgRule::BuyAllSellAll => bill_before - export_value,
        // Credits carried over the year expire at the annual true-up
        DgRule::NetMetering | DgRule::NetBilling | DgRule::NoCredit => {
            (bill_before - export_value).max(0.0)
        }
    };

    Ok(Billing {
        bill_before,
        bill_after,
        export_credit: export_value,
    })
}
