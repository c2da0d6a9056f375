use std::fmt;
use std::path::{Path, PathBuf};

use quiz_core::timer::DEFAULT_TOTAL_SECS;
use services::{AppServices, Clock};
use storage::json::JsonScoreStore;
use tracing_subscriber::EnvFilter;

mod shell;

use shell::{Shell, render_catalog};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingQuizFile,
    UnknownArg(String),
    InvalidTimer { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingQuizFile => write!(f, "run requires a quiz file"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimer { raw } => write!(f, "invalid --timer-mins value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz list [--dir <quiz_dir>] [--scores <path>] [--verbose]");
    eprintln!("  quiz run <quiz.json> [--scores <path>] [--timer-mins <n>] [--verbose]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --dir        <program dir>/assets/itil_vragen");
    eprintln!("  --scores     <program dir>/assets/score/scores.json");
    eprintln!("  --timer-mins 60");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DIR, QUIZ_SCORES_PATH, QUIZ_TIMER_MINS, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Run(PathBuf),
}

#[derive(Debug)]
struct Args {
    command: Command,
    quiz_dir: PathBuf,
    scores_path: PathBuf,
    timer_secs: u32,
    verbose: bool,
}

impl Args {
    fn parse(argv: Vec<String>) -> Result<Option<Self>, ArgsError> {
        let base = program_dir();
        let mut quiz_dir = std::env::var_os("QUIZ_DIR")
            .map_or_else(|| base.join("assets").join("itil_vragen"), PathBuf::from);
        let mut scores_path = std::env::var_os("QUIZ_SCORES_PATH")
            .map_or_else(|| JsonScoreStore::default_path_in(&base), PathBuf::from);
        let mut timer_secs = match std::env::var("QUIZ_TIMER_MINS") {
            Ok(raw) => parse_timer_mins(&raw)?,
            Err(_) => DEFAULT_TOTAL_SECS,
        };
        let mut verbose = false;

        let mut args = argv.into_iter();
        let command = match args.next().as_deref() {
            None | Some("list") => Command::List,
            Some("run") => Command::Run(PathBuf::from(
                args.next().ok_or(ArgsError::MissingQuizFile)?,
            )),
            Some("--help" | "-h") => return Ok(None),
            Some(other) => return Err(ArgsError::UnknownArg(other.to_owned())),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dir" => quiz_dir = PathBuf::from(require_value(&mut args, "--dir")?),
                "--scores" => scores_path = PathBuf::from(require_value(&mut args, "--scores")?),
                "--timer-mins" => {
                    timer_secs = parse_timer_mins(&require_value(&mut args, "--timer-mins")?)?;
                }
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self {
            command,
            quiz_dir,
            scores_path,
            timer_secs,
            verbose,
        }))
    }
}

fn parse_timer_mins(raw: &str) -> Result<u32, ArgsError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(|mins| mins.checked_mul(60))
        .ok_or_else(|| ArgsError::InvalidTimer {
            raw: raw.to_owned(),
        })
}

/// Directory of the executable; scores and assets live next to it.
fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = Args::parse(argv).inspect_err(|e| {
        eprintln!("{e}");
        print_usage();
    })?
    else {
        print_usage();
        return Ok(());
    };

    init_tracing(args.verbose);
    tracing::debug!(?args, "starting");

    let mut app = AppServices::open(
        &args.quiz_dir,
        &args.scores_path,
        Clock::default(),
        args.timer_secs,
    );

    let stdout = std::io::stdout();
    match args.command {
        Command::List => {
            let entries = app.catalog().entries()?;
            render_catalog(&mut stdout.lock(), &entries)?;
        }
        Command::Run(path) => {
            app.engine_mut().start_from_path(&path)?;
            let image_base = path.parent().map(Path::to_path_buf);
            let stdin = std::io::stdin();
            Shell::new(app.engine_mut(), stdin.lock(), stdout.lock())
                .with_image_base(image_base)
                .run()?;
        }
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
