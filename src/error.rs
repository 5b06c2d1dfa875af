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
Errores
=======

Error types for the sizing engine.

Only input validation problems are fatal. A missing tariff rate is reported
as `MissingRate` by the tariff model but `recommend` recovers from it with a
fallback rate and a data quality flag.
*/

use std::fmt;

/// Sizing engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum SizingError {
    /// Invalid input data, detected before any simulation is run
    InputValidation(String),
    /// No tariff rate available for a period (0-based month) and no fallback
    MissingRate {
        /// Period index (0 = January)
        period: usize,
    },
    /// Text could not be parsed into the requested value
    Parse(String),
}

/// Result alias for the sizing engine
pub type Result<T> = std::result::Result<T, SizingError>;

impl fmt::Display for SizingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SizingError::*;
        match self {
            InputValidation(desc) => write!(f, "Invalid input data: {}", desc),
            MissingRate { period } => write!(
                f,
                "Missing tariff rate for period {} and no residential fallback rate",
                period
            ),
            Parse(s) => write!(f, "Could not parse value from \"{}\"", s),
        }
    }
}

impl std::error::Error for SizingError {}

impl From<std::num::ParseFloatError> for SizingError {
    fn from(err: std::num::ParseFloatError) -> Self {
        SizingError::Parse(err.to_string())
    }
}

/// Shortcut to build an input validation error
pub(crate) fn invalid<T, S: Into<String>>(desc: S) -> Result<T> {
    Err(SizingError::InputValidation(desc.into()))
}
