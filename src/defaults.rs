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
Valores de referencia
=====================

Reference values for residential PV + battery sizing in the US market:

- federal investment tax credit and fallback tariff
- PV installed cost by sector and battery cost by chemistry
- battery performance values
- SREC prices by state
- budget ranges and system size bounds

These are only defaults. The engine always receives fully resolved
`CostAssumptions` and `TariffSchedule` values.
*/

use std::str;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Federal investment tax credit (ITC) rate
pub const ITC_RATE: f64 = 0.30;
/// Conservative tariff rate [$/kWh] used when the tariff has no usable rate
pub const DEFAULT_FALLBACK_RATE: f64 = 0.15;
/// Avoided cost rate as a fraction of the import rate, for export credit
/// under net billing or buy-all-sell-all when no export rate is known
pub const AVOIDED_COST_FRACTION: f64 = 0.5;
/// Production uncertainty from TMY interannual variance [%]
pub const DEFAULT_UNCERTAINTY_PCT: f64 = 12.5;

/// Battery round trip efficiency [-]
pub const DEFAULT_ROUND_TRIP_EFFICIENCY: f64 = 0.92;

/// Number of recommended configurations per band
pub const DEFAULT_TOP_K: usize = 3;

/// Minimum PV system size [kW]
pub const MIN_SYSTEM_SIZE_KW: f64 = 0.1;
/// Maximum PV system size [kW]
pub const MAX_SYSTEM_SIZE_KW: f64 = 1000.0;

/// Share of the investment budget allocated to the PV array
pub const PV_BUDGET_SHARE: f64 = 0.7;
/// Largest number of candidates a start:stop:step range may produce
pub const MAX_RANGE_CANDIDATES: usize = 10_000;

/// Hours in a (non leap) year
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Installation sector, sets the PV installed cost
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sector {
    /// Homes
    #[strum(serialize = "residential")]
    Residential,
    /// Shops and offices
    #[strum(serialize = "commercial")]
    Commercial,
    /// Industrial sites
    #[strum(serialize = "industrial")]
    Industrial,
}

impl Sector {
    /// PV installed cost [$/kW DC]
    pub fn pv_cost_per_kw(self) -> f64 {
        match self {
            Sector::Residential => 2500.0,
            Sector::Commercial => 2200.0,
            Sector::Industrial => 2000.0,
        }
    }
}

impl Default for Sector {
    fn default() -> Self {
        Sector::Residential
    }
}

/// Battery chemistry, sets the battery cost
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatteryChemistry {
    /// Lithium iron phosphate
    #[strum(serialize = "lfp")]
    Lfp,
    /// Nickel manganese cobalt
    #[strum(serialize = "nmc")]
    Nmc,
    /// Lithium titanate
    #[strum(serialize = "lto")]
    Lto,
}

impl BatteryChemistry {
    /// Battery cost [$/kWh]
    pub fn cost_per_kwh(self) -> f64 {
        match self {
            BatteryChemistry::Lfp => 450.0,
            BatteryChemistry::Nmc => 550.0,
            BatteryChemistry::Lto => 800.0,
        }
    }
}

impl Default for BatteryChemistry {
    fn default() -> Self {
        BatteryChemistry::Lfp
    }
}

/// SREC prices by state [$/MWh]. States not listed have no SREC market.
pub const SREC_PRICES: [(&str, &str, f64); 8] = [
    ("NJ", "New Jersey", 220.0),
    ("MA", "Massachusetts", 280.0),
    ("PA", "Pennsylvania", 45.0),
    ("DC", "District of Columbia", 420.0),
    ("MD", "Maryland", 60.0),
    ("IL", "Illinois", 70.0),
    ("OH", "Ohio", 15.0),
    ("VA", "Virginia", 35.0),
];

/// SREC price for a state, given its code or name
///
/// Returns None when the state has no SREC market
pub fn srec_price_for_state(region: &str) -> Option<f64> {
    let region = region.trim();
    SREC_PRICES
        .iter()
        .find(|(code, name, _)| {
            code.eq_ignore_ascii_case(region) || name.eq_ignore_ascii_case(region)
        })
        .map(|(_, _, price)| *price)
}

/// Investment budget range [$]
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    /// Lower bound [$]
    pub min: f64,
    /// Upper bound [$]
    pub max: f64,
}

/// Budget level names
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetLevel {
    /// Entry level, 10k - 20k $
    #[strum(serialize = "small")]
    Small,
    /// Standard, 20k - 40k $
    #[strum(serialize = "medium")]
    Medium,
    /// Premium, 40k - 80k $
    #[strum(serialize = "large")]
    Large,
    /// Enterprise, 80k - 150k $
    #[strum(serialize = "enterprise")]
    Enterprise,
}

impl BudgetLevel {
    /// Budget range for this level
    pub fn range(self) -> BudgetRange {
        let (min, max) = match self {
            BudgetLevel::Small => (10_000.0, 20_000.0),
            BudgetLevel::Medium => (20_000.0, 40_000.0),
            BudgetLevel::Large => (40_000.0, 80_000.0),
            BudgetLevel::Enterprise => (80_000.0, 150_000.0),
        };
        BudgetRange { min, max }
    }
}
