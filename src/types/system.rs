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

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::validate_non_negative;
use crate::defaults::{MAX_SYSTEM_SIZE_KW, MIN_SYSTEM_SIZE_KW};
use crate::error::{invalid, Result};

/// Configuración candidata PV + batería
///
/// Candidate system: PV capacity and usable battery capacity.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfiguration {
    /// PV capacity [kW DC], > 0
    pub pv_kw: f64,
    /// Usable battery capacity [kWh], >= 0
    pub battery_kwh: f64,
}

impl SystemConfiguration {
    /// New configuration
    pub fn new(pv_kw: f64, battery_kwh: f64) -> Self {
        Self { pv_kw, battery_kwh }
    }

    /// Check PV and battery capacities
    pub fn validate(&self) -> Result<()> {
        validate_pv_capacity(self.pv_kw)?;
        validate_non_negative("battery capacity", self.battery_kwh)
    }
}

impl fmt::Display for SystemConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} kW PV + {:.1} kWh battery", self.pv_kw, self.battery_kwh)
    }
}

/// PV capacity must be positive and within the supported system sizes
pub fn validate_pv_capacity(pv_kw: f64) -> Result<()> {
    if !pv_kw.is_finite() || pv_kw <= 0.0 {
        return invalid(format!("PV capacity must be positive and is {}", pv_kw));
    }
    if pv_kw < MIN_SYSTEM_SIZE_KW || pv_kw > MAX_SYSTEM_SIZE_KW {
        return invalid(format!(
            "PV capacity must be between {} and {} kW and is {}",
            MIN_SYSTEM_SIZE_KW, MAX_SYSTEM_SIZE_KW, pv_kw
        ));
    }
    Ok(())
}

/// Banda de incertidumbre de la producción
///
/// Production uncertainty band.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum UncertaintyBand {
    /// Production above the nominal value by the uncertainty
    #[strum(serialize = "best")]
    Best,
    /// Nominal production
    #[strum(serialize = "base")]
    Base,
    /// Production below the nominal value by the uncertainty
    #[strum(serialize = "conservative")]
    Conservative,
}

/// All bands, in report order
pub const BANDS: [UncertaintyBand; 3] = [
    UncertaintyBand::Best,
    UncertaintyBand::Base,
    UncertaintyBand::Conservative,
];

impl UncertaintyBand {
    /// Production multiplier for an uncertainty percentage
    pub fn factor(self, uncertainty_pct: f64) -> f64 {
        match self {
            UncertaintyBand::Best => 1.0 + uncertainty_pct / 100.0,
            UncertaintyBand::Base => 1.0,
            UncertaintyBand::Conservative => 1.0 - uncertainty_pct / 100.0,
        }
    }
}
