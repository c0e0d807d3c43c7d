use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "props-check",
    about = "Unmessing Java *.properties files",
    after_help = "Input files are expected to be in UTF-8 encoding.",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML settings file with defaults for clean and locate
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean and sort *.properties files
    Clean(CleanArgs),
    /// Compare keys and/or values in two properties files
    Compare(CompareArgs),
    /// Look up and locate properties keys in source code (needs git)
    Locate(LocateArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).args(["infile", "indir"])))]
pub struct CleanArgs {
    /// Path to a *.properties file
    #[arg(long)]
    pub infile: Option<PathBuf>,
    /// Directory with *.properties files
    #[arg(long)]
    pub indir: Option<PathBuf>,
    /// Output file path or relative sub-directory; a *.properties file
    /// combined with --indir merges all inputs into it
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Add spaces around = for readability
    #[arg(long, alias = "add_spaces")]
    pub add_spaces: bool,
    #[arg(long, alias = "strip_comments")]
    pub strip_comments: bool,
    /// Decode \uXXXX escapes in values to UTF-8
    #[arg(long)]
    pub utf8: bool,
    /// Group all inputs together into one document (needs --indir and a
    /// *.properties --output)
    #[arg(long, requires = "indir", requires = "output")]
    pub combined: bool,
}

#[derive(Args)]
pub struct CompareArgs {
    pub infile_a: PathBuf,
    pub infile_b: PathBuf,
    /// Compare values as well as keys
    #[arg(long)]
    pub values: bool,
    /// Show a line diff of the two cleaned files
    #[arg(long)]
    pub text: bool,
}

#[derive(Args)]
pub struct LocateArgs {
    pub infile: PathBuf,
    /// Repository path
    pub repo_path: PathBuf,
    /// Scope lookup to a specific branch
    #[arg(long)]
    pub branch: Option<String>,
    /// Scope lookup to a specific sub-directory
    #[arg(long)]
    pub subdir: Option<String>,
    /// Comma-delimited file extensions, e.g. java,js,jsp,tld,xml,xsl,vm
    #[arg(long)]
    pub filext: Option<String>,
    /// Run lookups concurrently
    #[arg(long)]
    pub multi: bool,
    /// Concurrent lookups with --multi (default: number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_clean_infile() {
        let cli = Cli::try_parse_from(["props-check", "clean", "--infile", "a.properties"]).unwrap();
        if let Command::Clean(args) = cli.command {
            assert_eq!(args.infile, Some(PathBuf::from("a.properties")));
            assert!(!args.add_spaces);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn clean_needs_an_input() {
        assert!(Cli::try_parse_from(["props-check", "clean"]).is_err());
    }

    #[test]
    fn clean_inputs_are_exclusive() {
        let res = Cli::try_parse_from(["props-check", "clean", "--infile", "a", "--indir", "d"]);
        assert!(res.is_err());
    }

    #[test]
    fn clean_accepts_underscore_flags() {
        let cli = Cli::try_parse_from([
            "props-check", "clean", "--indir", "i18n", "--add_spaces", "--strip-comments", "--utf8",
        ])
        .unwrap();
        if let Command::Clean(args) = cli.command {
            assert!(args.add_spaces && args.strip_comments && args.utf8);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn combined_requires_indir_and_output() {
        assert!(Cli::try_parse_from(["props-check", "clean", "--infile", "a", "--combined"]).is_err());
        assert!(Cli::try_parse_from([
            "props-check", "clean", "--indir", "d", "--output", "all.properties", "--combined",
        ])
        .is_ok());
    }

    #[test]
    fn parse_compare_values() {
        let cli = Cli::try_parse_from(["props-check", "compare", "a.properties", "b.properties", "--values"]).unwrap();
        if let Command::Compare(args) = cli.command {
            assert!(args.values);
            assert!(!args.text);
            assert_eq!(args.infile_b, PathBuf::from("b.properties"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_locate() {
        let cli = Cli::try_parse_from([
            "props-check", "locate", "a.properties", "/src/repo", "--branch", "main",
            "--filext", "java,jsp", "--multi", "-j", "8",
        ])
        .unwrap();
        if let Command::Locate(args) = cli.command {
            assert_eq!(args.branch, Some("main".into()));
            assert_eq!(args.filext, Some("java,jsp".into()));
            assert!(args.multi);
            assert_eq!(args.jobs, Some(8));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_json_format_and_config() {
        let cli = Cli::try_parse_from([
            "props-check", "--format", "json", "--config", "props.toml", "compare", "a", "b",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("props.toml")));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["props-check", "--verbose", "compare", "a", "b"]).unwrap();
        assert!(cli.verbose);
    }
}
