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

use super::validate_range;
use crate::error::Result;

/// Emplazamiento de la instalación
///
/// Household location as resolved by the geocoding service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Location identifier (address, site code...)
    pub id: String,
    /// Latitude [deg]
    pub latitude: f64,
    /// Longitude [deg]
    pub longitude: f64,
    /// State or region code (e.g. "NJ"), empty if unknown
    #[serde(default)]
    pub region: String,
    /// Whether the geocoder resolved the address
    #[serde(default = "resolved_default")]
    pub resolved: bool,
}

fn resolved_default() -> bool {
    true
}

impl Location {
    /// New resolved location
    pub fn new(id: &str, latitude: f64, longitude: f64, region: &str) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            region: region.into(),
            resolved: true,
        }
    }

    /// Check coordinate ranges
    pub fn validate(&self) -> Result<()> {
        validate_range("latitude", self.latitude, -90.0, 90.0)?;
        validate_range("longitude", self.longitude, -180.0, 180.0)
    }
}
