use std::cmp::max;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};
use log::LevelFilter;

use secure_fixup::config::Config;

/// CLI options for the fixup executable.
#[derive(Parser, Default, Debug)]
#[clap(about, version)]
pub struct Options {
    /// Address bar text to fix up [default: one input per line from STDIN].
    pub inputs: Vec<String>,

    /// Specify alternative configuration file [default:
    /// $XDG_CONFIG_HOME/secure_fixup/secure_fixup.toml].
    #[clap(long, value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Keep the scheme picked by the normalizer.
    #[clap(long)]
    pub no_upgrade: bool,

    /// Print the complete fixup result as JSON.
    #[clap(long)]
    pub json: bool,

    /// Reject single label hosts which are not whitelisted.
    #[clap(long)]
    pub require_whitelisted_host: bool,

    /// Reduces the level of verbosity (the min level is -qq).
    #[clap(short, conflicts_with("verbose"), action = ArgAction::Count)]
    quiet: u8,

    /// Increases the level of verbosity (the max level is -vvv).
    #[clap(short, conflicts_with("quiet"), action = ArgAction::Count)]
    verbose: u8,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }

    /// Override configuration file with options from the CLI.
    pub fn override_config(&self, config: &mut Config) {
        config.upgrade.enabled &= !self.no_upgrade;
        config.fixup.require_whitelisted_host |= self.require_whitelisted_host;

        config.debug.log_level = if self.quiet > 0 {
            self.log_level()
        } else {
            max(config.debug.log_level, self.log_level())
        };
    }

    /// Logging filter level.
    pub fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            // Force at least `Error` level.
            (1, _) => LevelFilter::Error,
            // Silence all logging.
            (2.., _) => LevelFilter::Off,
            (_, 0) => LevelFilter::Warn,
            (_, 1) => LevelFilter::Info,
            (_, 2) => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Options::command().debug_assert();
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let options = Options::try_parse_from(["secure-fixup"]).unwrap();
        let mut config = Config::default();
        options.override_config(&mut config);

        assert_eq!(config, Config::default());
        assert!(options.inputs.is_empty());
    }

    #[test]
    fn no_upgrade_disables_decorator() {
        let options =
            Options::try_parse_from(["secure-fixup", "--no-upgrade", "example.com"]).unwrap();
        let mut config = Config::default();
        options.override_config(&mut config);

        assert!(!config.upgrade.enabled);
        assert_eq!(options.inputs, ["example.com"]);
    }

    #[test]
    fn whitelist_flag_is_merged() {
        let options = Options::try_parse_from(["secure-fixup", "--require-whitelisted-host"]).unwrap();
        let mut config = Config::default();
        options.override_config(&mut config);

        assert!(config.fixup.require_whitelisted_host);
    }

    #[test]
    fn verbosity_levels() {
        let level = |args: &[&str]| {
            let mut argv = vec!["secure-fixup"];
            argv.extend_from_slice(args);
            Options::try_parse_from(argv).unwrap().log_level()
        };

        assert_eq!(level(&[]), LevelFilter::Warn);
        assert_eq!(level(&["-v"]), LevelFilter::Info);
        assert_eq!(level(&["-vv"]), LevelFilter::Debug);
        assert_eq!(level(&["-vvv"]), LevelFilter::Trace);
        assert_eq!(level(&["-q"]), LevelFilter::Error);
        assert_eq!(level(&["-qq"]), LevelFilter::Off);
        assert!(Options::try_parse_from(["secure-fixup", "-q", "-v"]).is_err());
    }

    #[test]
    fn quiet_overrides_config_level() {
        let options = Options::try_parse_from(["secure-fixup", "-qq"]).unwrap();
        let mut config = Config::default();
        config.debug.log_level = LevelFilter::Debug;
        options.override_config(&mut config);

        assert_eq!(config.debug.log_level, LevelFilter::Off);
    }
}
