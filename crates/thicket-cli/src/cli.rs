//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "thicket")]
#[command(version, about = "Render and check widget templates")]
pub struct Cli {
    /// Maximum number of parsed templates to keep (unbounded if omitted)
    #[arg(long, global = true)]
    pub cache_capacity: Option<usize>,

    /// Maximum nesting depth during evaluation
    #[arg(long, global = true, default_value_t = thicket::context::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Trace each evaluated element
    #[arg(long, global = true)]
    pub trace: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a template and print the element tree as JSON
    Render {
        /// Template file
        template: PathBuf,

        /// JSON file with the widget data (defaults to `{}`)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Fail on errors instead of printing the diagnostic panel
        #[arg(long)]
        strict: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Parse a template and report syntax errors
    Check {
        /// Template file
        template: PathBuf,
    },

    /// List the widget components, marking leaf components
    Components,
}

impl Cli {
    /// Log filter implied by `-v` when `RUST_LOG` is unset.
    pub fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args() {
        let cli = Cli::parse_from([
            "thicket", "render", "card.jsx", "--data", "data.json", "--strict", "-vv",
        ]);
        assert_eq!(cli.default_filter(), "trace");
        match cli.command {
            Command::Render {
                template,
                data,
                strict,
                pretty,
            } => {
                assert_eq!(template, PathBuf::from("card.jsx"));
                assert_eq!(data, Some(PathBuf::from("data.json")));
                assert!(strict);
                assert!(!pretty);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["thicket", "check", "t.jsx", "--max-depth", "8", "--cache-capacity", "4"]);
        assert_eq!(cli.max_depth, 8);
        assert_eq!(cli.cache_capacity, Some(4));
        assert_eq!(cli.default_filter(), "warn");
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
