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

use std::collections::BTreeMap;
use std::str;

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::Display;

use super::{validate_non_negative, MONTHS};
use crate::defaults::AVOIDED_COST_FRACTION;
use crate::error::{invalid, Result, SizingError};

/// Regla de compensación de la energía exportada
///
/// Distributed generation rule, sets how exported energy is valued.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DgRule {
    /// Exports credited at the retail import rate, netted annually
    #[strum(serialize = "net-metering")]
    NetMetering,
    /// Exports credited at an avoided cost rate against the bill
    #[strum(serialize = "net-billing")]
    NetBilling,
    /// All production sold at the export rate, all load bought at retail
    #[strum(serialize = "buy-all-sell-all")]
    BuyAllSellAll,
    /// Exports are not credited
    #[strum(serialize = "none")]
    #[serde(rename = "none")]
    NoCredit,
}

impl str::FromStr for DgRule {
    type Err = SizingError;

    fn from_str(s: &str) -> std::result::Result<DgRule, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "net-metering" | "nem" => Ok(DgRule::NetMetering),
            "net-billing" => Ok(DgRule::NetBilling),
            "buy-all-sell-all" | "basa" => Ok(DgRule::BuyAllSellAll),
            "none" | "" => Ok(DgRule::NoCredit),
            _ => Err(SizingError::Parse(s.into())),
        }
    }
}

impl Default for DgRule {
    fn default() -> Self {
        DgRule::NetMetering
    }
}

/// Estructura de precios de la energía importada
///
/// Import rate structure. Time of use tables give a rate by period (0 = January).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RateStructure {
    /// Single residential rate for every period
    Flat,
    /// Rate by period, missing periods use the residential rate
    TimeOfUse {
        /// Period -> rate [$/kWh]
        #[serde(deserialize_with = "period_table")]
        table: BTreeMap<usize, f64>,
    },
}

// Tagged content is buffered and JSON map keys arrive as strings
fn period_table<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<usize, f64>, D::Error> {
    use serde::de::Error;

    BTreeMap::<String, f64>::deserialize(deserializer)?
        .into_iter()
        .map(|(period, rate)| {
            period
                .trim()
                .parse::<usize>()
                .map(|p| (p, rate))
                .map_err(|_| {
                    D::Error::custom(format!("invalid time of use period \"{}\"", period))
                })
        })
        .collect()
}

impl Default for RateStructure {
    fn default() -> Self {
        RateStructure::Flat
    }
}

/// Tarifa eléctrica de la vivienda
///
/// Normalized utility tariff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffSchedule {
    /// Utility name
    #[serde(default)]
    pub utility_name: String,
    /// Import rate structure
    #[serde(default)]
    pub structure: RateStructure,
    /// Distributed generation rule
    #[serde(default)]
    pub dg_rule: DgRule,
    /// Residential rate [$/kWh], also the fallback for time of use periods
    #[serde(default)]
    pub residential_rate: Option<f64>,
    /// Commercial rate [$/kWh]
    #[serde(default)]
    pub commercial_rate: Option<f64>,
    /// Export credit rate [$/kWh] for net billing and buy-all-sell-all
    #[serde(default)]
    pub export_rate: Option<f64>,
}

impl TariffSchedule {
    /// Flat rate tariff
    pub fn flat(rate: f64, dg_rule: DgRule) -> Self {
        Self {
            utility_name: String::new(),
            structure: RateStructure::Flat,
            dg_rule,
            residential_rate: Some(rate),
            commercial_rate: None,
            export_rate: None,
        }
    }

    /// Import rate [$/kWh] for a period
    pub fn import_rate(&self, period: usize) -> Result<f64> {
        let period_rate = match &self.structure {
            RateStructure::Flat => None,
            RateStructure::TimeOfUse { table } => table.get(&period).copied(),
        };
        period_rate
            .or(self.residential_rate)
            .ok_or(SizingError::MissingRate { period })
    }

    /// Export credit rate [$/kWh] for a period
    ///
    /// Net metering values exports at the import rate. Net billing and buy-all-sell-all
    /// use the export rate or, when missing, the avoided cost rate (a fraction of the import rate).
    pub fn export_credit_rate(&self, period: usize) -> Result<f64> {
        match self.dg_rule {
            DgRule::NetMetering => self.import_rate(period),
            DgRule::NetBilling | DgRule::BuyAllSellAll => match self.export_rate {
                Some(rate) => Ok(rate),
                None => Ok(AVOIDED_COST_FRACTION * self.import_rate(period)?),
            },
            DgRule::NoCredit => Ok(0.0),
        }
    }

    /// Periods without an import rate
    pub fn missing_periods(&self) -> Vec<usize> {
        (0..MONTHS)
            .filter(|&period| self.import_rate(period).is_err())
            .collect()
    }

    /// Completa la tarifa con un precio por defecto
    ///
    /// Fill the residential rate with `fallback` when some period has no rate.
    /// Returns the resolved tariff and the periods that used the fallback.
    ///
    /// # Errors
    ///
    /// * `InputValidation` if the export rate is higher than the fallback rate
    ///   (except for net metering)
    pub fn resolve(&self, fallback: f64) -> Result<(TariffSchedule, Vec<usize>)> {
        let missing = self.missing_periods();
        let mut resolved = self.clone();
        if !missing.is_empty() {
            resolved.residential_rate = Some(fallback);
            resolved.validate()?;
        }
        Ok((resolved, missing))
    }

    /// Check rates
    ///
    /// All rates are non negative and, except for net metering, the export rate
    /// can't be higher than any import rate. Periods without rate are checked
    /// again once the tariff is resolved.
    pub fn validate(&self) -> Result<()> {
        if let Some(rate) = self.residential_rate {
            validate_non_negative("residential rate", rate)?;
        }
        if let Some(rate) = self.commercial_rate {
            validate_non_negative("commercial rate", rate)?;
        }
        if let RateStructure::TimeOfUse { table } = &self.structure {
            for (period, rate) in table {
                if *period >= MONTHS {
                    return invalid(format!(
                        "time of use period must be in 0..{} and is {}",
                        MONTHS, period
                    ));
                }
                validate_non_negative("time of use rate", *rate)?;
            }
        }
        if let Some(export_rate) = self.export_rate {
            validate_non_negative("export rate", export_rate)?;
            if self.dg_rule != DgRule::NetMetering {
                for period in 0..MONTHS {
                    if let Ok(import_rate) = self.import_rate(period) {
                        if export_rate > import_rate {
                            return invalid(format!(
                                "export rate ({}) higher than import rate ({}) in period {} under {}",
                                export_rate, import_rate, period, self.dg_rule
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
