use std::path::PathBuf;

use clap::Parser;

/// Copy RSS feeds into a FeoBlog-style signed content store.
#[derive(Parser, Debug)]
#[command(name = "fbrss-rs", version)]
pub struct Cli {
    /// The configuration file which lists RSS feeds to sync.
    #[arg(long, default_value = "config.toml")]
    pub config_file: PathBuf,

    /// Enable extra verbose output.
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["fbrss-rs"]).unwrap();
        assert_eq!(cli.config_file, PathBuf::from("config.toml"));
        assert!(!cli.debug);
    }

    #[test]
    fn test_explicit_args() {
        let cli =
            Cli::try_parse_from(["fbrss-rs", "--config-file", "/etc/fbrss.toml", "--debug"])
                .unwrap();
        assert_eq!(cli.config_file, PathBuf::from("/etc/fbrss.toml"));
        assert!(cli.debug);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["fbrss-rs", "--bogus"]).is_err());
    }
}
