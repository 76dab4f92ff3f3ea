//! Fix up address bar text, preferring `https` when no scheme was typed.

use std::error::Error;
use std::io::{self, BufRead, Write};

use log::{error, info};

use secure_fixup::config;
use secure_fixup::{FixupFlags, FixupInfo, Normalizer, SchemeUpgradingNormalizer};

mod cli;
mod logging;

use crate::cli::Options;

fn main() -> Result<(), Box<dyn Error>> {
    let options = Options::new();

    // Use the CLI level until the configuration is known.
    logging::initialize(options.log_level())?;

    let mut config = config::load(options.config_file.as_deref())?;
    options.override_config(&mut config);
    log::set_max_level(config.debug.log_level);

    let inputs = if options.inputs.is_empty() {
        io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?
    } else {
        options.inputs.clone()
    };

    let normalizer = config.fixup.normalizer();
    let flags = config.fixup.flags();

    let failures = if config.upgrade.enabled {
        info!("Upgrading synthesized schemes to https");
        let normalizer = SchemeUpgradingNormalizer::with_policy(normalizer, config.upgrade.policy());
        run(&normalizer, &inputs, flags, options.json)?
    } else {
        info!("Scheme upgrades are disabled");
        run(&normalizer, &inputs, flags, options.json)?
    };

    if failures > 0 {
        return Err(format!("{failures} of {} inputs could not be fixed up", inputs.len()).into());
    }

    Ok(())
}

/// Fix up every input, returning the number of failures.
fn run<N: Normalizer>(
    normalizer: &N,
    inputs: &[String],
    flags: FixupFlags,
    json: bool,
) -> Result<usize, Box<dyn Error>> {
    let mut stdout = io::stdout().lock();
    let mut failures = 0;

    for input in inputs {
        match normalizer.fixup_info(input, flags) {
            Ok(info) => writeln!(stdout, "{}", format_info(&info, json)?)?,
            Err(err) => {
                error!("{err}");
                failures += 1;
            },
        }
    }

    stdout.flush()?;

    Ok(failures)
}

fn format_info(info: &FixupInfo, json: bool) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string(info);
    }

    Ok(info.preferred_uri.as_ref().map(|uri| uri.to_string()).unwrap_or_default())
}
