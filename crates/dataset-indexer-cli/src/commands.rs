use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dataset-indexer", version)]
#[command(
    about = "Scan a folder ('address') for pressure.csv and other CSVs (echo files) and build an index + summary.",
    long_about = None
)]
pub struct Cli {
    /// Path to a directory containing CSVs (or a file whose parent contains CSVs)
    #[arg(long)]
    pub address: String,

    /// Directory to write dataset_index.json, summary.csv and errors.log [default: artifacts]
    #[arg(long)]
    pub outdir: Option<String>,

    /// Configuration file (defaults to an optional indexer.toml in the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_address_is_required() {
        assert!(Cli::try_parse_from(["dataset-indexer"]).is_err());
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "dataset-indexer",
            "--address",
            "/data",
            "--outdir",
            "out",
            "--config",
            "cfg.toml",
        ])
        .unwrap();
        assert_eq!(cli.address, "/data");
        assert_eq!(cli.outdir.as_deref(), Some("out"));
        assert_eq!(cli.config, Some(PathBuf::from("cfg.toml")));
    }
}
