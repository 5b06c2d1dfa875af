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
SolarSizer
==========

This crate provides a library and binary that **sizes residential PV + battery systems**
from a financial point of view.

For a household with a known location, solar production profile, utility tariff and
load, it sweeps a grid of candidate PV capacities and battery sizes and, for each
configuration and each production uncertainty band (best, base, conservative), it
computes:

- the monthly energy balance (self consumption, battery cycling, grid import and export)
- the annual bill under the distributed generation rule of the tariff (net metering,
  net billing, buy-all-sell-all or no export credit)
- gross and net (after tax credit) installed cost and SREC revenue
- simple payback, battery backup hours and a lifetime cash flow projection (NPV, IRR, LCOE)

and recommends the best configurations of each band, ranked by payback, backup hours
and net cost.

It also holds the following assumptions:

- production scales linearly with capacity from a reference production profile
- the energy balance is monthly; the battery starts empty and its state of charge
  carries over between months
- net metering credits are netted over the year
- uncertainty is a single symmetric percentage applied to production

Calling layers resolve locations, production profiles and tariffs; the engine makes no
network calls and keeps no state between calls.

# Ejemplo

```rust
use solarsizer::*;
use solarsizer::types::*;

let request = SizingRequest {
    location: Location::new("Trenton, NJ", 40.22, -74.76, "NJ"),
    production: ProductionProfile {
        reference_capacity_kw: 5.0,
        annual_output_kwh: 6250.0,
        monthly_fractions: even_fractions(),
        capacity_factor: 0.143,
        uncertainty_pct: 12.5,
    },
    tariff: TariffSchedule::flat(0.18, DgRule::NetMetering),
    costs: CostAssumptions::default().with_state_srec("NJ"),
    load: LoadAssumption::even(9000.0, 0.4),
    pv_candidates: vec![4.0, 6.0, 8.0],
    battery_candidates: vec![0.0, 10.0],
    uncertainty_pct: None,
    options: SizingOptions::default(),
};

let report = recommend(&request).unwrap();
assert_eq!(report.grid.len(), 18);
println!("{}", report.to_plain());
```

*/

#![deny(missing_docs)]

mod asplain;
mod balance;
mod cost;
mod finance;
mod production;
mod recommend;
mod report;
mod tariff;
mod vecops;

pub mod defaults;
pub mod error;
pub mod types;

pub use asplain::*;
pub use balance::*;
pub use cost::*;
pub use finance::*;
pub use production::*;
pub use recommend::*;
pub use report::*;
pub use tariff::*;

/// Número de versión de la librería
///
/// Version number
pub static VERSION: &str = env!("CARGO_PKG_VERSION");
