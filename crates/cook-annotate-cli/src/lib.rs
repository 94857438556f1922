use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use cook_annotate::{
    annotate, build_preview_diff, AnnotateRequest, ExitCode, RecipeMetadata, StepSeparator,
    TermTable, TimeSetting,
};
use cook_annotate_config::{Config, LoadOptions};
use serde_json::json;

mod fs;
mod table_file;

pub use table_file::{TableFile, TableRow};

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Command::Seed(args) => handle_seed(args),
        Command::Annotate(args) => handle_annotate(args),
    }
}

fn handle_seed(args: SeedArgs) -> Result<i32> {
    let SeedArgs { terms, output } = args;

    let raw = match read_input(&terms) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("failed to read terms from {}: {err}", terms.display());
            return Ok(ExitCode::Io as i32);
        }
    };

    let table = match TermTable::seed(raw.lines().map(str::trim).filter(|line| !line.is_empty()))
    {
        Ok(table) => table,
        Err(err) => {
            eprintln!("{err}");
            return Ok(err.exit_code() as i32);
        }
    };

    let skeleton = table_file::render_skeleton(&table);

    match output {
        Some(path) => {
            if let Err(err) = fs::write_atomic(&path, &skeleton, false) {
                eprintln!("failed to write {}: {err}", path.display());
                return Ok(ExitCode::Io as i32);
            }
            eprintln!("wrote {} terms to {}", table.len(), path.display());
        }
        None => emit(&skeleton)?,
    }

    Ok(0)
}

fn handle_annotate(args: AnnotateArgs) -> Result<i32> {
    let config = Config::load(load_options(&args))?;

    let raw = match read_input(&args.recipe) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("failed to read recipe from {}: {err}", args.recipe.display());
            return Ok(ExitCode::Io as i32);
        }
    };

    let table = match table_file::load(&args.table) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("{err}");
            return Ok(err.exit_code() as i32);
        }
    };

    if let Some(course) = &args.course {
        if !args.quiet && !config.metadata.is_known_course(course) {
            eprintln!("warning: course '{course}' is not in the configured course list");
        }
    }

    let separator = args
        .separator
        .map(SeparatorValue::into_separator)
        .unwrap_or(config.recipe.separator);

    let request = AnnotateRequest {
        text: raw.clone(),
        separator,
        table,
        units: config.units.clone(),
        metadata: RecipeMetadata {
            source: args.source.clone(),
            time: match args.time {
                Some(Some(minutes)) => TimeSetting::Set(minutes),
                Some(None) => TimeSetting::Set(config.metadata.default_time),
                None => TimeSetting::Unset,
            },
            course: args.course.clone(),
        },
    };

    let outcome = match annotate(&request) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("{err}");
            return Ok(err.exit_code() as i32);
        }
    };

    let format = args.format.unwrap_or(FormatValue::Plain);

    if !args.quiet && matches!(format, FormatValue::Plain) {
        for term in &outcome.unmatched {
            eprintln!("warning: term '{term}' not found in recipe text");
        }
    }

    let rendered = outcome.document.render();

    if args.dry_run {
        let label = args.recipe.display().to_string();
        if let Some(diff) = build_preview_diff(&raw, &rendered, &label) {
            emit(&diff)?;
        }
        return Ok(0);
    }

    match format {
        FormatValue::Json => {
            let payload = json!({
                "document": rendered,
                "header": outcome.document.header,
                "body": outcome.document.body,
                "annotated": outcome.annotated,
                "unmatched": outcome.unmatched,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        FormatValue::Plain => match &args.name {
            Some(name) => {
                let path = args.output_dir.join(format!("{name}.cook"));
                if let Err(err) = fs::write_atomic(&path, &rendered, !args.no_backup) {
                    eprintln!("failed to write {}: {err}", path.display());
                    return Ok(ExitCode::Io as i32);
                }
                if !args.quiet {
                    eprintln!("wrote {}", path.display());
                }
            }
            None => emit(&rendered)?,
        },
    }

    Ok(0)
}

fn load_options(args: &AnnotateArgs) -> LoadOptions {
    let mut options = LoadOptions::default();
    if let Some(path) = &args.config {
        options = options.with_override_path(path.clone());
    }
    options
}

fn read_input(path: &PathBuf) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
    }
}

fn emit(content: &str) -> Result<()> {
    print!("{content}");
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Annotate recipe text with CookLang markup",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a classification-table skeleton from tagger output
    Seed(SeedArgs),
    /// Annotate recipe text using an edited classification table
    Annotate(AnnotateArgs),
}

#[derive(Args)]
struct SeedArgs {
    /// Terms file, one surface form per line (use '-' for stdin)
    #[arg(value_name = "TERMS")]
    terms: PathBuf,

    /// Write the table skeleton here instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct AnnotateArgs {
    /// Recipe text file (use '-' for stdin)
    #[arg(value_name = "RECIPE")]
    recipe: PathBuf,

    /// Classification table written by `seed` and edited by hand
    #[arg(long = "table", value_name = "PATH")]
    table: PathBuf,

    /// Config file overriding the discovered `.cook-annotate.toml`
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Step separator, overriding the configured one
    #[arg(long = "separator", value_enum, value_name = "SEPARATOR")]
    separator: Option<SeparatorValue>,

    /// Recipe source (website) for the metadata header
    #[arg(long = "source", value_name = "URL")]
    source: Option<String>,

    /// Preparation time in minutes; the header line is only emitted when
    /// this flag is given. Without a value the configured default applies
    #[arg(long = "time", value_name = "MINUTES", num_args = 0..=1)]
    time: Option<Option<u32>>,

    /// Course for the metadata header
    #[arg(long = "course", value_name = "COURSE")]
    course: Option<String>,

    /// Recipe name; when set the document is written to `<NAME>.cook`
    #[arg(long = "name", value_name = "NAME")]
    name: Option<String>,

    /// Directory for the `.cook` file
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Do not keep a `.bak` copy when overwriting an existing file
    #[arg(long = "no-backup")]
    no_backup: bool,

    /// Print a unified diff of raw vs annotated text instead of writing
    #[arg(long = "dry-run", conflicts_with = "format")]
    dry_run: bool,

    /// Output format
    #[arg(long = "format", value_enum, value_name = "FORMAT")]
    format: Option<FormatValue>,

    /// Suppress warnings and success messages
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SeparatorValue {
    Period,
    Semicolon,
    Newline,
}

impl SeparatorValue {
    fn into_separator(self) -> StepSeparator {
        match self {
            SeparatorValue::Period => StepSeparator::Period,
            SeparatorValue::Semicolon => StepSeparator::Semicolon,
            SeparatorValue::Newline => StepSeparator::Newline,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatValue {
    Plain,
    Json,
}
