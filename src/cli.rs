use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Build a product catalog out of a public Google Drive folder.
#[derive(Debug, Parser)]
#[command(name = "vitrina", version, about)]
pub struct Cli {
    /// Configuration file (toml, yaml or json). Defaults to the platform
    /// configuration directory.
    #[arg(long, global = true, env = "VITRINA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Google API key, overriding every other source.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// More logging; repeat for more (-v, -vv, -vvv). `RUST_LOG` wins.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the catalog and print it as JSON.
    Catalog {
        /// Root folder link or id. Defaults to `root_folder` from the configuration.
        folder: Option<String>,
        /// Store image download links instead of embedding the images.
        #[arg(long)]
        links: bool,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the children of a folder as JSON.
    List {
        /// Folder link or id.
        folder: String,
    },
    /// Resolve one image to a data URI.
    Image {
        /// Image link or id.
        image: String,
    },
}

impl Cli {
    /// Log filter used when `RUST_LOG` isn't set.
    pub fn default_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_catalog_arguments() {
        let cli = Cli::try_parse_from(["vitrina", "catalog", "ROOT", "--links", "--pretty", "-vv"]).unwrap();
        let Command::Catalog { folder, links, pretty } = cli.command else {
            panic!("expected the catalog command");
        };
        assert_eq!(folder.as_deref(), Some("ROOT"));
        assert!(links && pretty);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["vitrina", "list", "ROOT", "--api-key", "KEY", "--config", "c.toml"]).unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("KEY"));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn test_list_requires_folder() {
        assert!(Cli::try_parse_from(["vitrina", "list"]).is_err());
    }

    #[rstest]
    #[case(&[], "warn")]
    #[case(&["-v"], "info")]
    #[case(&["-vv"], "debug")]
    #[case(&["-vvvv"], "trace")]
    fn test_default_log_level(#[case] flags: &[&str], #[case] expected: &str) {
        let args = ["vitrina", "image", "abc"].iter().chain(flags).copied();
        assert_eq!(Cli::try_parse_from(args).unwrap().default_log_level(), expected);
    }
}
