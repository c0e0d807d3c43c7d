use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use colored::Colorize;
use props_core::{
    display_key, format_report, normalize_table, FormatOptions, FormatOutput, Grouper, ParseOptions,
    PropertyTable,
};
use props_diff::{compare, diff_text, DiffLine};
use props_locate::{
    plan_lookups, report_file_names, run_lookups, GitGrep, LocateConfig, LocateReport, Progress,
};
use tokio::sync::mpsc;

use crate::cli::*;
use crate::fs::{list_properties_files, load_properties, resolve_output, save_output};
use crate::settings::Settings;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    if matches!(cli.format, OutputFormat::Text) {
        print_banner();
    }
    match cli.command {
        Command::Clean(args) => cmd_clean(args, &settings),
        Command::Compare(args) => cmd_compare(args, &cli.format),
        Command::Locate(args) => cmd_locate(args, &settings),
    }
}

fn print_banner() {
    println!("{} {}", "props-check".bold(), env!("CARGO_PKG_VERSION"));
    println!("Unmessing Java *.properties files\n");
}

fn print_error(message: impl std::fmt::Display) {
    eprintln!("\n{} {}\n", "ERROR:".red().bold(), message);
}

/// Effective clean options: command-line flags OR settings.
#[derive(Clone, Debug, Default)]
struct CleanOptions {
    add_spaces: bool,
    strip_comments: bool,
    utf8: bool,
}

impl CleanOptions {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions::decode_values(self.utf8)
    }
}

fn cmd_clean(args: CleanArgs, settings: &Settings) -> anyhow::Result<()> {
    println!("*** Properties cleaning ***\n");
    let options = CleanOptions {
        add_spaces: args.add_spaces || settings.clean.add_spaces,
        strip_comments: args.strip_comments || settings.clean.strip_comments,
        utf8: args.utf8 || settings.clean.utf8,
    };
    let cwd = std::env::current_dir().context("reading working directory")?;

    if let Some(infile) = &args.infile {
        return clean_file(infile, args.output.as_deref(), false, &options, &cwd);
    }

    let Some(indir) = &args.indir else {
        return Ok(());
    };
    if !indir.is_dir() {
        anyhow::bail!("input directory does not exist: {}", indir.display());
    }
    let files = list_properties_files(indir)?;
    if files.is_empty() {
        println!("No *.properties files in: {}", indir.display());
        return Ok(());
    }

    if args.combined {
        // clap guarantees --output is present.
        let output = args.output.as_deref().context("--combined needs --output")?;
        return clean_combined(&files, output, &options);
    }

    let mut failures = 0;
    for file in &files {
        if let Err(e) = clean_file(file, args.output.as_deref(), true, &options, &cwd) {
            print_error(format!("{e:#}"));
            failures += 1;
        }
    }
    println!(
        "Cleaned {} of {} files.",
        (files.len() - failures).to_string().bold(),
        files.len()
    );
    Ok(())
}

fn clean_file(
    input: &Path,
    output: Option<&Path>,
    batch: bool,
    options: &CleanOptions,
    cwd: &Path,
) -> anyhow::Result<()> {
    println!("Input file: {}", input.display());
    let table = load_properties(input, options.parse_options())?;

    let target = resolve_output(input, output, batch, cwd).with_context(|| {
        format!(
            "output file cannot be created from {}",
            output.map(|p| p.display().to_string()).unwrap_or_default()
        )
    })?;

    let format_options = FormatOptions {
        source_label: Some(input.display().to_string()),
        add_spaces: options.add_spaces,
    };
    let formatted = normalize_table(table, options.strip_comments, &format_options);
    print_duplicates(&formatted);

    save_output(&target.path, &formatted.text, target.append)?;
    if target.append {
        println!("Output appended to: {}\n", target.path.display().to_string().green());
    } else {
        println!("Output saved to: {}\n", target.path.display().to_string().green());
    }
    Ok(())
}

fn clean_combined(files: &[std::path::PathBuf], output: &Path, options: &CleanOptions) -> anyhow::Result<()> {
    if output.extension().map_or(true, |ext| ext != "properties") {
        anyhow::bail!("--combined output must be a *.properties file: {}", output.display());
    }

    let mut grouper = Grouper::new();
    let mut merged = 0;
    for file in files {
        println!("Input file: {}", file.display());
        match load_properties(file, options.parse_options()) {
            Ok(table) => {
                grouper.add_table(&table.sorted());
                merged += 1;
            }
            Err(e) => print_error(e),
        }
    }
    if merged == 0 {
        anyhow::bail!("no properties found in any input file");
    }

    let (grouped, comments) = grouper.finish();
    let comments = (!options.strip_comments).then_some(&comments);
    let format_options = FormatOptions {
        source_label: None,
        add_spaces: options.add_spaces,
    };
    let formatted = format_report(&grouped, comments, &format_options);
    print_duplicates(&formatted);

    save_output(output, &formatted.text, false)?;
    println!("Combined {} files into: {}\n", merged, output.display().to_string().green());
    Ok(())
}

fn print_duplicates(formatted: &FormatOutput) {
    if formatted.duplicate_keys.is_empty() {
        return;
    }
    println!("\n{}", "Duplicate keys:".yellow().bold());
    for key in &formatted.duplicate_keys {
        println!("{key}");
    }
    println!();
}

fn cmd_compare(args: CompareArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let table_a = load_properties(&args.infile_a, ParseOptions::default())?;
    let table_b = load_properties(&args.infile_b, ParseOptions::default())?;
    let comparison = compare(&table_a, &table_b, args.values);

    if matches!(format, OutputFormat::Json) {
        println!("{}", comparison.to_json()?);
        return Ok(());
    }

    println!("*** Properties comparing ***\n");

    if let Some(values) = &comparison.values {
        println!("\n*** Different values: ");
        for diff in values {
            println!("{}={} | {}", diff.key.bold(), diff.value_a, diff.value_b);
        }
    }

    print_missing(&args.infile_a, &comparison.keys.missing_in_a, &table_b);
    print_missing(&args.infile_b, &comparison.keys.missing_in_b, &table_a);

    if args.text {
        let options = FormatOptions::default();
        let a = normalize_table(table_a, false, &options).text;
        let b = normalize_table(table_b, false, &options).text;
        let diff = diff_text(&a, &b, 3);

        println!("\n*** Cleaned file diff: +{} -{}", diff.additions(), diff.deletions());
        for (i, hunk) in diff.hunks.iter().enumerate() {
            if i > 0 {
                println!("{}", "...".dimmed());
            }
            for line in hunk {
                match line {
                    DiffLine::Context(text) => println!(" {text}"),
                    DiffLine::Added(text) => println!("{}", format!("+{text}").green()),
                    DiffLine::Removed(text) => println!("{}", format!("-{text}").red()),
                }
            }
        }
    }
    Ok(())
}

/// List keys missing from `missing_from`, with their value from `source`.
fn print_missing(missing_from: &Path, keys: &[String], source: &PropertyTable) {
    println!("\n*** Keys missing in: {}", missing_from.display().to_string().yellow());
    println!("Human |Key=Value");
    for key in keys {
        let value = source.first_value(key).unwrap_or_default();
        println!("{} |{}={}", display_key(key), key, value);
    }
}

fn cmd_locate(args: LocateArgs, settings: &Settings) -> anyhow::Result<()> {
    println!("*** Properties locating ***");

    let jobs = if args.multi {
        match args.jobs.unwrap_or(settings.locate.jobs) {
            0 => std::thread::available_parallelism().map_or(1, |n| n.get()),
            n => n,
        }
    } else {
        1
    };
    let filext = args.filext.as_deref().or(settings.locate.filext.as_deref());
    let config = LocateConfig {
        branch: args.branch.clone(),
        subdir: args.subdir.clone(),
        file_extensions: filext.map(LocateConfig::parse_extensions).unwrap_or_default(),
        timeout: Duration::from_secs(settings.locate.timeout_secs),
        jobs,
        git: settings.locate.git.clone(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(locate(args, config))
}

async fn locate(args: LocateArgs, config: LocateConfig) -> anyhow::Result<()> {
    let grep = GitGrep::new(&args.repo_path, &config);
    let version = grep.version().await?;
    println!("Git version: {version}");

    let table = load_properties(&args.infile, ParseOptions::default())?;

    println!("Input file : {}", args.infile.display());
    println!("Repository : {}", grep.repo().display());
    println!("Branch  : {}", config.branch.as_deref().unwrap_or("-"));
    println!("Sub-dir : {}", config.subdir.as_deref().unwrap_or("-"));
    println!("Files   : {}", args.filext.as_deref().unwrap_or("-"));
    println!("Jobs    : {}", config.jobs);

    let lookups = plan_lookups(&table);
    let total = lookups.len();

    let (tx, rx) = mpsc::unbounded_channel();
    let renderer = tokio::spawn(render_progress(rx));
    let outcomes = run_lookups(Arc::new(grep), lookups, config.jobs, Some(tx)).await;
    renderer.await.context("progress display")?;

    println!("Total processed keys : {} - output : {}", total, outcomes.len());

    let report = LocateReport::from_outcomes(outcomes);
    let (found_name, missing_name) = report_file_names(&args.infile);

    if let Some(text) = report.found_text() {
        save_output(Path::new(&found_name), &text, false)?;
        println!("Found keys : {}", report.found.len().to_string().green());
        println!(" - report : {found_name}");
    }
    if let Some(text) = report.missing_text() {
        save_output(Path::new(&missing_name), &text, false)?;
        println!("Missing keys : {}", report.missing.len().to_string().red());
        println!(" - report : {missing_name}");
    }
    Ok(())
}

/// Draw a one-line progress counter on stderr until the driver is done.
async fn render_progress(mut rx: mpsc::UnboundedReceiver<Progress>) {
    let mut last = None;
    while let Some(event) = rx.recv().await {
        eprint!("\rProgress: {}/{}", event.completed, event.total);
        let _ = std::io::stderr().flush();
        last = Some(event);
    }
    if last.is_some() {
        eprintln!();
    }
}
