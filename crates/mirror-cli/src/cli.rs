//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use mirror_core::DEFAULT_CONFIG_FILE;

/// Remote Mirror - Upload local changes to an FTP server as they happen
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable conflict resolution mode. When enabled, checks if remote files
    /// exist and shows differences before uploading.
    #[arg(short = 'c', long)]
    pub check_conflicts: bool,

    /// Configuration file (JSON, TOML or YAML)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_direct_mode() {
        let cli = Cli::try_parse_from(["mirror"]).unwrap();
        assert!(!cli.check_conflicts);
        assert!(!cli.verbose);
        assert_eq!(cli.config, PathBuf::from("sync_config.json"));
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["mirror", "-c", "-v", "--config", "site.toml"]).unwrap();
        assert!(cli.check_conflicts);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("site.toml"));

        let cli = Cli::try_parse_from(["mirror", "--check-conflicts"]).unwrap();
        assert!(cli.check_conflicts);
    }

    #[test]
    fn rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["mirror", "extra"]).is_err());
    }
}
