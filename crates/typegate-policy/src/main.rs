//! typegate-check
//!
//! Evaluates type names against a frozen whitelist and prints one JSON line
//! per name.
//!
//! Usage: `typegate-check [CONFIG.yaml] NAME...`
//! - With a `.yaml`/`.yml` first argument, rules come from that file.
//! - Otherwise rules come from the `TYPEGATE_*` environment variables.
//!
//! Exit status: 0 all allowed, 1 any denied, 2 configuration error.

use std::process::ExitCode;

use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use typegate_core::error::{ErrorCode, Result};
use typegate_policy::{config, TypeWhitelist, WhitelistConfig};

#[derive(Serialize)]
struct Decision<'a> {
    #[serde(rename = "type")]
    type_name: &'a str,
    allowed: bool,
}

#[derive(Serialize)]
struct Failure {
    error: ErrorCode,
    message: String,
}

fn load(args: &mut Vec<String>) -> Result<TypeWhitelist> {
    let from_file = args
        .first()
        .is_some_and(|a| a.ends_with(".yaml") || a.ends_with(".yml"));
    let cfg = if from_file {
        let path = args.remove(0);
        config::load_from_file(&path)?
    } else {
        WhitelistConfig::from_env()?
    };
    let mut wl = TypeWhitelist::new(&cfg)?;
    wl.freeze()?;
    Ok(wl)
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let wl = match load(&mut args) {
        Ok(wl) => wl,
        Err(e) => {
            let failure = Failure {
                error: e.code(),
                message: e.to_string(),
            };
            match serde_json::to_string(&failure) {
                Ok(line) => eprintln!("{line}"),
                Err(_) => eprintln!("{e}"),
            }
            return ExitCode::from(2);
        }
    };
    tracing::info!(policy = %wl, "typegate-check ready");

    let mut all_allowed = true;
    for name in &args {
        let allowed = wl.is_allowed(name);
        all_allowed &= allowed;
        let decision = Decision {
            type_name: name,
            allowed,
        };
        match serde_json::to_string(&decision) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                tracing::error!(error = %e, "encode decision failed");
                return ExitCode::from(2);
            }
        }
    }

    if all_allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
