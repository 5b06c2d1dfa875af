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
Salida en formato simple
========================

Compact text summary of a sizing report.
*/

use crate::recommend::ScenarioResult;
use crate::report::{BandStatus, DataQualityIssue, RecommendationBand, SizingReport};

// ==================== Conversión a formato simple

/// Muestra en formato simple
///
/// Compact plain text view of sizing results.
pub trait AsPlain {
    /// Get in plain format
    fn to_plain(&self) -> String;
}

/// Payback con un decimal o "never" si no se recupera la inversión
fn payback_or_never(v: f64) -> String {
    if v.is_finite() {
        format!("{:.1}", v)
    } else {
        "never".to_string()
    }
}

/// IRR en porcentaje o un guion si no existe
fn irr_or_dash(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:.1} %", 100.0 * v),
        None => "-".to_string(),
    }
}

impl AsPlain for ScenarioResult {
    fn to_plain(&self) -> String {
        let config = self.config;
        let payback = payback_or_never(self.simple_payback_years);
        let irr = irr_or_dash(self.projection.irr);
        format!(
            "{config}: payback {payback} years, savings {:.0} $/yr, net cost {:.0} $, backup {:.1} h
  production {:.0} kWh, self consumed {:.0} kWh, exported {:.0} kWh, imported {:.0} kWh
  bill {:.0} -> {:.0} $/yr, SREC {:.0} $/yr, NPV {:.0} $, IRR {irr}, LCOE {:.3} $/kWh",
            self.annual_savings,
            self.net_cost,
            self.backup_hours,
            self.annual_production_kwh,
            self.self_consumed_kwh,
            self.exported_kwh,
            self.imported_kwh,
            self.bill_before,
            self.bill_after,
            self.srec_revenue,
            self.projection.npv,
            self.projection.lcoe,
            config = config,
            payback = payback,
            irr = irr,
        )
    }
}

impl AsPlain for RecommendationBand {
    fn to_plain(&self) -> String {
        let header = match self.status {
            BandStatus::CostEffective => format!("** Band {}", self.band),
            BandStatus::NoCostEffectiveConfiguration => format!(
                "** Band {} (no cost effective configuration, highest savings shown)",
                self.band
            ),
        };
        let entries = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {}", i + 1, e.to_plain()))
            .collect::<Vec<String>>()
            .join("\n");
        format!("{}\n\n{}", header, entries)
    }
}

impl AsPlain for DataQualityIssue {
    fn to_plain(&self) -> String {
        match self {
            DataQualityIssue::MissingRate {
                periods,
                fallback_rate,
            } => format!(
                "- {} tariff period(s) without rate, priced at {:.3} $/kWh",
                periods.len(),
                fallback_rate
            ),
            DataQualityIssue::UnresolvedLocation { id } => {
                format!("- location \"{}\" was not resolved", id)
            }
            DataQualityIssue::NoCostEffectiveConfiguration { band } => {
                format!("- no cost effective configuration in band {}", band)
            }
        }
    }
}

impl AsPlain for SizingReport {
    fn to_plain(&self) -> String {
        let bands = [&self.best, &self.base, &self.conservative]
            .iter()
            .map(|b| b.to_plain())
            .collect::<Vec<String>>()
            .join("\n\n");
        let quality = if self.data_quality.is_degraded() {
            let issues = self
                .data_quality
                .issues
                .iter()
                .map(AsPlain::to_plain)
                .collect::<Vec<String>>()
                .join("\n");
            format!("\n\n** Data quality: degraded\n{}", issues)
        } else {
            String::new()
        };
        format!(
            "** Sizing for {}

Configurations evaluated: {}
Production uncertainty: {:.1} %

{}{}
",
            self.location_id,
            self.grid.len() / 3,
            self.uncertainty_pct,
            bands,
            quality
        )
    }
}
