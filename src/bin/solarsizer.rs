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

#[macro_use]
extern crate clap;

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::process::exit;

use clap::{App, AppSettings, Arg, ArgMatches};
use failure::{err_msg, Error, ResultExt};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use solarsizer::defaults::BudgetLevel;
use solarsizer::*;

// Funciones auxiliares -----------------------------------------------------------------------

fn readfile(path: &Path) -> Result<String, Error> {
    let mut f = File::open(path).context(format!("File {} not found", path.display()))?;
    let mut contents = String::new();
    f.read_to_string(&mut contents)
        .context("Error reading file")?;
    Ok(contents)
}

fn writefile(path: &Path, content: &[u8]) -> Result<(), Error> {
    let mut file =
        File::create(path).context(format!("Could not create file {}", path.display()))?;
    file.write_all(content)
        .context(format!("Could not write to file {}", path.display()))?;
    Ok(())
}

/// Logs go to stderr. RUST_LOG, when set, takes precedence over -v
fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("solarsizer={}", level))),
        )
        .init();
}

/// Aplica las opciones de la CLI sobre la petición leída
///
/// Command line values take precedence over the ones in the request file.
fn apply_overrides(matches: &ArgMatches<'_>, request: &mut SizingRequest) -> Result<(), Error> {
    if let Some(pv) = matches.value_of("pv") {
        request.pv_candidates = parse_candidates(pv).context("Invalid PV candidates")?;
        info!(candidates = ?request.pv_candidates, "PV candidates (user)");
    }
    if let Some(budget) = matches.value_of("budget") {
        let level: BudgetLevel = budget
            .parse()
            .map_err(|_| err_msg(format!("Unknown budget level \"{}\"", budget)))?;
        request.pv_candidates =
            pv_candidates_from_budget(level.range(), request.costs.pv_cost_per_kw)
                .context("Could not derive PV candidates from the budget")?;
        info!(budget = %level, candidates = ?request.pv_candidates, "PV candidates (budget)");
    }
    if let Some(battery) = matches.value_of("battery") {
        request.battery_candidates =
            parse_candidates(battery).context("Invalid battery candidates")?;
        info!(candidates = ?request.battery_candidates, "Battery candidates (user)");
    }
    if matches.is_present("top_k") {
        request.options.top_k = value_t!(matches, "top_k", usize)?;
    }
    if matches.is_present("efficiency") {
        request.options.round_trip_efficiency = value_t!(matches, "efficiency", f64)?;
    }
    if matches.is_present("fallback_rate") {
        request.options.fallback_rate = value_t!(matches, "fallback_rate", f64)?;
    }
    if matches.is_present("uncertainty") {
        request.uncertainty_pct = Some(value_t!(matches, "uncertainty", f64)?);
    }
    Ok(())
}

// Función principal ------------------------------------------------------------------------------

fn main() {
    let matches = App::new("SolarSizer")
        .bin_name("solarsizer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("SolarSizer - Financial sizing of residential PV + battery systems.")
        .setting(AppSettings::NextLineHelp)
        .arg(Arg::with_name("request")
            .short("r")
            .long("request")
            .value_name("REQUEST_FILE")
            .help("Sizing request file (JSON)")
            .takes_value(true)
            .required(true)
            .display_order(1))
        .arg(Arg::with_name("pv")
            .long("pv")
            .value_name("PV_KW")
            .help("PV capacity candidates [kW], as a list or a range.\nP.e.: --pv 4,5,6 or --pv 3:8:0.5")
            .takes_value(true)
            .display_order(2))
        .arg(Arg::with_name("budget")
            .short("b")
            .long("budget")
            .value_name("BUDGET")
            .possible_values(&["small", "medium", "large", "enterprise"])
            .conflicts_with("pv")
            .help("PV capacity candidates affordable with the PV share of a budget level")
            .takes_value(true)
            .display_order(3))
        .arg(Arg::with_name("battery")
            .long("battery")
            .value_name("BATTERY_KWH")
            .help("Usable battery capacity candidates [kWh], as a list or a range.\nP.e.: --battery 0,10,13.5")
            .takes_value(true)
            .display_order(4))
        .arg(Arg::with_name("top_k")
            .short("k")
            .long("top-k")
            .value_name("TOP_K")
            .help("Number of configurations recommended per band")
            .takes_value(true))
        .arg(Arg::with_name("efficiency")
            .long("efficiency")
            .value_name("EFFICIENCY")
            .help("Battery round trip efficiency (0, 1]")
            .takes_value(true))
        .arg(Arg::with_name("fallback_rate")
            .long("fallback-rate")
            .value_name("RATE")
            .help("Import rate for tariff periods without rate [$/kWh]")
            .takes_value(true))
        .arg(Arg::with_name("uncertainty")
            .short("u")
            .long("uncertainty")
            .value_name("PCT")
            .help("Production uncertainty [%], overrides the production profile value")
            .takes_value(true))
        .arg(Arg::with_name("archivo_salida_json")
            .long("json")
            .value_name("JSON_FILE")
            .help("Output file for the detailed report in JSON format")
            .takes_value(true))
        .arg(Arg::with_name("v")
            .short("v")
            .multiple(true)
            .help("Sets the level of verbosity"))
        .get_matches();

    // Prólogo ------------------------------------------------------------------------------------

    let verbosity = matches.occurrences_of("v");
    init_logging(verbosity);
    debug!(?matches, "command line");

    // Petición de dimensionado --------------------------------------------------------------------
    let path = Path::new(matches.value_of_os("request").unwrap_or_default());
    let requeststring = readfile(path).unwrap_or_else(|err| {
        eprintln!(
            "ERROR: Could not read the sizing request \"{}\" -> {}",
            path.display(),
            err
        );
        exit(exitcode::IOERR);
    });
    let mut request: SizingRequest = serde_json::from_str(&requeststring).unwrap_or_else(|err| {
        eprintln!(
            "ERROR: Invalid sizing request \"{}\" -> {}",
            path.display(),
            err
        );
        exit(exitcode::DATAERR);
    });
    info!(path = %path.display(), location = %request.location.id, "Sizing request");

    if let Err(err) = apply_overrides(&matches, &mut request) {
        eprintln!("ERROR: {}", err);
        for cause in err.iter_causes() {
            eprintln!("  {}", cause);
        }
        exit(exitcode::USAGE);
    }

    // Dimensionado --------------------------------------------------------------------------------
    let report = recommend(&request).unwrap_or_else(|err| {
        eprintln!("ERROR: Could not size the system -> {}", err);
        exit(exitcode::DATAERR);
    });
    if report.data_quality.is_degraded() {
        warn!(
            issues = report.data_quality.issues.len(),
            "results computed from degraded data"
        );
    }

    // Salida --------------------------------------------------------------------------------------
    println!("{}", report.to_plain());

    if let Some(json) = matches.value_of_os("archivo_salida_json") {
        let path = Path::new(json);
        let result = serde_json::to_string_pretty(&report)
            .map_err(Error::from)
            .and_then(|json| writefile(path, json.as_bytes()));
        if let Err(err) = result {
            eprintln!("ERROR: {}", err);
            exit(exitcode::CANTCREAT);
        }
        info!(path = %path.display(), "Report saved");
    }
}
