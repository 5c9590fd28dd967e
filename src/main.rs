// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! FQL Tour CLI entrypoint.
//!
//! By default this plays a tour from the tour directory in the terminal UI, executing each step
//! against the FQL backend at `--endpoint`. `--demo` plays the bundled tour against a scripted
//! in-memory backend, and `--extract` prints a tour's runnable FQL instead of playing it.

use std::error::Error;
use std::fmt;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fqltour::exec::{
    ContextIdError, ExecutionContextId, ExecutionOutcome, ExecutionOutput, Executor, HttpExecutor,
    ScriptedExecutor, DEFAULT_TIMEOUT,
};
use fqltour::format::tour::extract_fql;
use fqltour::source::{
    load_tour_with_diagnostics, DirectorySource, StaticSource, TourSource, DEMO_TOUR_NAME,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ENDPOINT_ENV: &str = "FQLTOUR_ENDPOINT";
const CONTEXT_ENV: &str = "FQLTOUR_CONTEXT";
const TOUR_DIR_ENV: &str = "FQLTOUR_TOUR_DIR";
const LOG_ENV: &str = "FQLTOUR_LOG";
const DEFAULT_TOUR_DIR: &str = "tours";
const DEFAULT_LOG_FILTER: &str = "fqltour=info";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<tour>] [--dir <dir>] [--endpoint <url>] [--context <id>] [--timeout <secs>]\n  {program} <tour> --extract [--dir <dir>]\n  {program} --demo [<tour>] [--extract]\n\nWithout <tour>, the tours found in the tour directory are listed.\n--dir defaults to ${TOUR_DIR_ENV}, then `{DEFAULT_TOUR_DIR}`.\n--endpoint defaults to ${ENDPOINT_ENV}; --context defaults to ${CONTEXT_ENV}.\n--timeout bounds each execution request (seconds, default 30).\n--demo plays the bundled tour against a scripted backend and cannot be combined with --dir or --endpoint.\n--extract prints the tour's runnable FQL and exits.\n\nSet ${LOG_ENV}=<file> to write logs (filter via RUST_LOG, default `{DEFAULT_LOG_FILTER}`)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    tour: Option<String>,
    dir: Option<String>,
    endpoint: Option<String>,
    context: Option<String>,
    timeout_secs: Option<u64>,
    demo: bool,
    extract: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    fn set_once(slot: &mut Option<String>, value: Option<String>) -> Result<(), ()> {
        if slot.is_some() {
            return Err(());
        }
        *slot = Some(value.ok_or(())?);
        Ok(())
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--extract" => {
                if options.extract {
                    return Err(());
                }
                options.extract = true;
            }
            "--dir" => set_once(&mut options.dir, args.next())?,
            "--endpoint" => set_once(&mut options.endpoint, args.next())?,
            "--context" => set_once(&mut options.context, args.next())?,
            "--timeout" => {
                if options.timeout_secs.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let secs: u64 = raw.parse().map_err(|_| ())?;
                if secs == 0 {
                    return Err(());
                }
                options.timeout_secs = Some(secs);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => set_once(&mut options.tour, Some(arg))?,
        }
    }

    if options.demo && (options.dir.is_some() || options.endpoint.is_some()) {
        return Err(());
    }
    if options.extract && options.tour.is_none() && !options.demo {
        return Err(());
    }

    Ok(options)
}

#[derive(Debug)]
enum ConfigError {
    MissingEndpoint,
    InvalidContext { value: String, source: ContextIdError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndpoint => {
                write!(f, "no backend endpoint: pass --endpoint <url> or set {ENDPOINT_ENV}")
            }
            Self::InvalidContext { value, source } => {
                write!(f, "invalid execution context {value:?}: {source}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingEndpoint => None,
            Self::InvalidContext { source, .. } => Some(source),
        }
    }
}

/// What the process does once options and environment are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List { dir: PathBuf },
    Extract { source: SourceChoice, tour: String },
    Play {
        source: SourceChoice,
        tour: String,
        backend: Backend,
        context: Option<ExecutionContextId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceChoice {
    Directory(PathBuf),
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    Http { endpoint: String, timeout: Duration },
    Scripted,
}

/// Merges CLI options with environment fallbacks. Flags always win over the environment.
fn resolve_command(
    options: CliOptions,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Command, ConfigError> {
    let from_env = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    let source = if options.demo {
        SourceChoice::Demo
    } else {
        let dir = options
            .dir
            .or_else(|| from_env(TOUR_DIR_ENV))
            .unwrap_or_else(|| DEFAULT_TOUR_DIR.to_owned());
        SourceChoice::Directory(PathBuf::from(dir))
    };

    let tour = match (options.tour, &source) {
        (Some(tour), _) => tour,
        (None, SourceChoice::Demo) => DEMO_TOUR_NAME.to_owned(),
        (None, SourceChoice::Directory(dir)) => return Ok(Command::List { dir: dir.clone() }),
    };

    if options.extract {
        return Ok(Command::Extract { source, tour });
    }

    let context = options
        .context
        .or_else(|| from_env(CONTEXT_ENV))
        .map(|value| {
            ExecutionContextId::new(value.trim())
                .map_err(|source| ConfigError::InvalidContext { value, source })
        })
        .transpose()?;

    let backend = match &source {
        SourceChoice::Demo => Backend::Scripted,
        SourceChoice::Directory(_) => {
            let endpoint = options
                .endpoint
                .or_else(|| from_env(ENDPOINT_ENV))
                .ok_or(ConfigError::MissingEndpoint)?;
            let timeout = options.timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT);
            Backend::Http { endpoint, timeout }
        }
    };

    Ok(Command::Play { source, tour, backend, context })
}

fn open_source(choice: &SourceChoice) -> Box<dyn TourSource> {
    match choice {
        SourceChoice::Directory(dir) => Box::new(DirectorySource::new(dir.clone())),
        SourceChoice::Demo => Box::new(StaticSource::demo()),
    }
}

/// Canned answers for the bundled tour, so `--demo` works without a backend.
fn demo_executor() -> ScriptedExecutor {
    let lines = |lines: &[&str]| -> ExecutionOutcome {
        Ok(ExecutionOutput::new(lines.iter().map(|line| (*line).to_owned()).collect()))
    };
    ScriptedExecutor::new()
        .with_latency(Duration::from_millis(350))
        .with_response("AS BankBalance", lines(&["BankBalance: 20000"]))
        .with_response("AS LoanBookTotal", lines(&["LoanBookTotal: 1503.61"]))
        .with_response(
            "AS TrialBalance",
            lines(&[
                "TrialBalance: @bank 18500, @loans 1503.61, @interest_earned -3.61, @equity -20000",
            ]),
        )
}

fn init_logging(path: Option<std::ffi::OsString>) -> Result<(), Box<dyn Error>> {
    // The TUI owns the terminal, so logs only ever go to a file.
    let Some(path) = path.filter(|path| !path.is_empty()) else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()?;
    Ok(())
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List { dir } => {
            let names = DirectorySource::new(&dir).list()?;
            if names.is_empty() {
                eprintln!("no tours found in {}", dir.display());
            }
            for name in names {
                println!("{name}");
            }
        }
        Command::Extract { source, tour } => {
            let text = open_source(&source).fetch(&tour)?;
            print!("{}", extract_fql(&text));
        }
        Command::Play { source, tour: name, backend, context } => {
            let source = open_source(&source);
            let (tour, diagnostics) = load_tour_with_diagnostics(source.as_ref(), &name)?;
            info!(tour = %name, steps = tour.len(), diagnostics = diagnostics.len(), "loaded tour");

            let executor: Arc<dyn Executor> = match backend {
                Backend::Http { endpoint, timeout } => {
                    let executor = HttpExecutor::new(endpoint, timeout)?;
                    info!(endpoint = executor.endpoint(), ?timeout, "using http backend");
                    Arc::new(executor)
                }
                Backend::Scripted => Arc::new(demo_executor()),
            };
            fqltour::tui::run(&tour, &diagnostics, executor, context)?;
        }
    }
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "fqltour".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging(std::env::var_os(LOG_ENV))?;
        let command = resolve_command(options, |name| std::env::var(name).ok())?;
        run(command)
    })();

    if let Err(err) = result {
        eprintln!("fqltour: {err}");
        std::process::exit(1);
    }
}
