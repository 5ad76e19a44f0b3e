use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use tabgen_core::config::{TabgenConfig, CONFIG_FILE_NAME};

/// Output directory used when neither --output-dir nor the config names one.
pub const DEFAULT_OUTPUT_DIR: &str = "csvs";

#[derive(Parser, Debug)]
#[command(
    name = "tabgen",
    about = "Generate templated, randomized CSV test data from a declarative table description",
    version,
    after_help = "Examples:\n  tabgen generate --config tabgen.toml --output-dir csvs\n  tabgen generate --seed 42 --strict\n  tabgen preview --rows 10\n  tabgen tokens --filter name"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate every configured table and write output tables as CSV
    Generate(GenerateArgs),

    /// Print a few generated rows per table without writing files
    Preview(PreviewArgs),

    /// List the built-in placeholders with a sample value each
    Tokens(TokensArgs),
}

/// Options shared by every command that runs the generator.
#[derive(Args, Debug)]
pub struct GenerationOptions {
    /// Path to the table description
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Random seed for deterministic generation (overrides [generate] seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fail on unknown placeholders and on tables whose row count cannot be inferred
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub opts: GenerationOptions,

    /// Directory to write <table>.csv files into (overrides [generate] output_dir)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub opts: GenerationOptions,

    /// Number of sample rows to show per table (at least 1)
    #[arg(long, default_value = "5")]
    pub rows: NonZeroUsize,

    /// Only show these tables
    #[arg(long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Also show input tables
    #[arg(long)]
    pub inputs: bool,
}

#[derive(Parser, Debug)]
pub struct TokensArgs {
    /// Only list placeholders containing this text
    #[arg(long)]
    pub filter: Option<String>,

    /// Seed for the sample values
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

impl GenerationOptions {
    /// --seed, then the config's seed, then a fresh random one.
    pub fn resolve_seed(&self, config: &TabgenConfig) -> u64 {
        self.seed
            .or(config.generate.seed)
            .unwrap_or_else(rand::random)
    }

    pub fn resolve_strict(&self, config: &TabgenConfig) -> bool {
        self.strict || config.generate.strict.unwrap_or(false)
    }
}

impl GenerateArgs {
    /// --output-dir as given, else the config's output_dir relative to the
    /// config file, else `csvs`.
    pub fn resolve_output_dir(&self, config: &TabgenConfig) -> PathBuf {
        if let Some(ref dir) = self.output_dir {
            return dir.clone();
        }
        match config.generate.output_dir {
            Some(ref dir) => config.resolve_path(dir),
            None => PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabgen_core::config::parse_config;

    #[test]
    fn test_parse_generate_args() {
        let cli = Cli::parse_from([
            "tabgen",
            "generate",
            "--config",
            "x.toml",
            "--seed",
            "9",
            "--strict",
            "-o",
            "out",
        ]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.opts.config, PathBuf::from("x.toml"));
                assert_eq!(args.opts.seed, Some(9));
                assert!(args.opts.strict);
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
            }
            other => panic!("expected generate, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["tabgen", "preview", "--tables", "a,b"]);
        match cli.command {
            Command::Preview(args) => {
                assert_eq!(args.opts.config, PathBuf::from(CONFIG_FILE_NAME));
                assert_eq!(args.rows.get(), 5);
                assert_eq!(args.tables, vec!["a", "b"]);
                assert!(!args.opts.strict);
            }
            other => panic!("expected preview, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_rejects_zero_rows() {
        assert!(Cli::try_parse_from(["tabgen", "preview", "--rows", "0"]).is_err());
        let cli = Cli::try_parse_from(["tabgen", "preview", "--rows", "1"]).unwrap();
        let Command::Preview(args) = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(args.rows.get(), 1);
    }

    #[test]
    fn test_seed_and_strict_precedence() {
        let config = parse_config("[generate]\nseed = 5\nstrict = true\n").unwrap();
        let cli = Cli::parse_from(["tabgen", "generate", "--seed", "1"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.opts.resolve_seed(&config), 1);
        assert!(args.opts.resolve_strict(&config));

        let cli = Cli::parse_from(["tabgen", "generate"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.opts.resolve_seed(&config), 5);
    }

    #[test]
    fn test_output_dir_precedence() {
        let config = parse_config("").unwrap();
        let cli = Cli::parse_from(["tabgen", "generate"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(
            args.resolve_output_dir(&config),
            PathBuf::from(DEFAULT_OUTPUT_DIR)
        );

        let config = parse_config("[generate]\noutput_dir = \"data\"\n").unwrap();
        assert_eq!(args.resolve_output_dir(&config), PathBuf::from("data"));
    }
}
