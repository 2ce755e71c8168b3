use anyhow::{Context, Result};
use aspire::serializers::{json, text};
use aspire::{Answers, Chain, Framing, ParserKind, ResourceLimits, SolveOptions, Stage};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

mod error_formatter;
mod formatter;

use formatter::Formatter;

#[derive(Parser)]
#[command(name = "aspire")]
#[command(about = "Lazy, typed answer sets from the clingo solver", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run clingo on logic programs and print the reshaped models
    ///
    /// Stages are applied in the order given. Examples:
    ///   aspire solve queens.lp -n 0 -c n=8 -s by-predicate -s parse-args
    ///   aspire solve -e "a;b." -n 0 --format json
    Solve {
        /// Program files (.lp)
        files: Vec<PathBuf>,

        /// Load every .lp file under this directory
        #[arg(short = 'd', long = "dir")]
        dir: Option<PathBuf>,

        /// Inline program text, sent to the solver on stdin
        #[arg(short = 'e', long = "eval")]
        inline: Option<String>,

        /// Number of models to compute (0 for all)
        #[arg(short = 'n', long = "models", default_value_t = 0)]
        nb_model: u32,

        /// Constant definition NAME=VALUE, passed as -c NAME=VALUE
        #[arg(short = 'c', long = "const", value_parser = parse_constant)]
        constants: Vec<(String, String)>,

        /// Extra solver option, passed through verbatim
        #[arg(short = 'o', long = "option", allow_hyphen_values = true)]
        options: Vec<String>,

        /// Solver time limit in seconds
        #[arg(long = "time-limit")]
        time_limit: Option<u64>,

        /// Solver binary (defaults to $ASPIRE_CLINGO, then `clingo`)
        #[arg(long = "clingo")]
        clingo: Option<PathBuf>,

        /// Reshaping stage, e.g. by-predicate, parse-args, first-arg-only
        #[arg(short = 's', long = "stage")]
        stages: Vec<Stage>,

        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Print the solver command line and exit without running it
        #[arg(long = "print-command")]
        print_command: bool,
    },
    /// Reshape captured solver output or an exported answer file
    Read {
        /// Input file; reads stdin when omitted or `-`
        file: Option<PathBuf>,

        #[arg(short = 's', long = "stage")]
        stages: Vec<Stage>,

        /// Treat every line as a model, without solver framing
        #[arg(long = "lines")]
        lines: bool,

        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Split one model line into terms, one per row
    Parse {
        line: String,

        /// Use the grammar parser instead of the delimiter scanner
        #[arg(long = "careful")]
        careful: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aspire=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Solve {
            files,
            dir,
            inline,
            nb_model,
            constants,
            options,
            time_limit,
            clingo,
            stages,
            format,
            print_command,
        } => {
            let mut solve_options = SolveOptions::new().with_nb_model(*nb_model);
            for (name, value) in constants {
                solve_options = solve_options.with_constant(name, value);
            }
            for option in options {
                solve_options = solve_options.with_option(option);
            }
            if let Some(seconds) = time_limit {
                solve_options = solve_options.with_time_limit(*seconds);
            }
            if let Some(path) = clingo {
                solve_options = solve_options.with_clingo_path(path);
            }
            solve_command(
                files,
                dir.as_deref(),
                inline.as_deref(),
                &solve_options,
                stages,
                *format,
                *print_command,
            )
        }
        Commands::Read {
            file,
            stages,
            lines,
            format,
        } => read_command(file.as_deref(), stages, *lines, *format),
        Commands::Parse { line, careful } => parse_command(line, *careful),
    };

    if let Err(e) = result {
        if let Some(aspire_err) = e.downcast_ref::<aspire::AspireError>() {
            eprintln!("{}", error_formatter::format_error(aspire_err));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn parse_constant(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((name, value)) => Ok((name.trim().to_string(), value.trim().to_string())),
        None => Err(format!("expected NAME=VALUE, got '{}'", input)),
    }
}

fn solve_command(
    files: &[PathBuf],
    dir: Option<&Path>,
    inline: Option<&str>,
    options: &SolveOptions,
    stages: &[Stage],
    format: OutputFormat,
    print_command: bool,
) -> Result<()> {
    let mut programs = files.to_vec();
    if let Some(dir) = dir {
        programs.extend(load_directory(dir)?);
    }

    if print_command {
        println!("{}", options.command(&programs, inline.is_some()).join(" "));
        return Ok(());
    }

    let answers = aspire::solve(&programs, inline, options)?;
    let answers = answers.with_chain(&Chain::from_stages(stages.iter().copied())?)?;
    print_answers(&answers, format)?;

    if let Some(outcome) = answers.outcome() {
        tracing::debug!(?outcome, "solver finished");
    }
    Ok(())
}

fn read_command(
    file: Option<&Path>,
    stages: &[Stage],
    lines: bool,
    format: OutputFormat,
) -> Result<()> {
    let framing = if lines { Framing::Lines } else { Framing::Solver };
    let answers = match file {
        Some(path) if path != Path::new("-") => {
            let handle = fs::File::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            Answers::from_reader(BufReader::new(handle), framing)
        }
        _ => Answers::from_reader(BufReader::new(io::stdin()), framing),
    };
    let answers = answers.with_chain(&Chain::from_stages(stages.iter().copied())?)?;
    print_answers(&answers, format)
}

fn parse_command(line: &str, careful: bool) -> Result<()> {
    let kind = if careful {
        ParserKind::Careful
    } else {
        ParserKind::Fast
    };
    let terms = aspire::parse_line(line, kind, &ResourceLimits::default())?;
    print!("{}", Formatter::default().format_terms(&terms));
    Ok(())
}

fn print_answers(answers: &Answers, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            json::write_json_lines(&mut out, answers)?;
        }
        OutputFormat::Text if answers.chain().is_empty() => {
            text::write_answers(&mut out, answers)?;
        }
        OutputFormat::Text => {
            let formatter = Formatter::default();
            for answer in answers {
                write!(out, "{}", formatter.format_answer(&answer?))?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Collect every .lp file under `dir`, in a stable order
fn load_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut programs = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.path().extension().and_then(|s| s.to_str()) == Some("lp") {
            programs.push(entry.path().to_path_buf());
        }
    }
    if programs.is_empty() {
        anyhow::bail!("no .lp files found under {}", dir.display());
    }
    Ok(programs)
}
