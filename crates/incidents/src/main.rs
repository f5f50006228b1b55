use std::io::ErrorKind;
use std::process;

use clap::Parser;
use cli::{Args, Command};
use env_logger::Env;
use error::{IncidentsError, IncidentsResult};
use jemallocator::Jemalloc;
use project::Project;
use rayon::ThreadPoolBuilder;

pub(crate) mod prelude {
    pub(crate) use crate::config::Config;
    pub(crate) use crate::error::{
        bail, IncidentsError, IncidentsResult,
    };
    pub(crate) use crate::progress::ProgressBarBuilder;
    pub(crate) use crate::project::Project;
}

mod cli;
mod commands;
mod config;
mod error;
mod loader;
mod progress;
mod project;
mod writer;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn num_threads(args: &Args) -> usize {
    if let Some(num_threads) = args.num_jobs {
        return num_threads;
    }

    if let Ok(config) = Project::discover().and_then(|p| p.config()) {
        if let Some(runtime) = config.runtime {
            if let Some(num_threads) = runtime.num_jobs {
                return num_threads;
            }
        }
    }

    0
}

fn init_logger(args: &Args) {
    let level = if args.quiet {
        "warn"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(args: Args) -> IncidentsResult<()> {
    let quiet = args.quiet;

    match args.cmd {
        Command::Build(cmd) => cmd.execute(quiet),
        Command::Clean(cmd) => cmd.execute(),
        Command::Config(cmd) => cmd.execute(),
        Command::Init(cmd) => cmd.execute(),
        Command::Summary(cmd) => cmd.execute(),
        Command::Version(cmd) => cmd.execute(),
    }
}

fn main() {
    let args = Args::parse();
    init_logger(&args);

    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(num_threads(&args))
        .build_global()
    {
        log::warn!("unable to configure thread pool: {e}");
    }

    match run(args) {
        Ok(()) => process::exit(0),
        Err(IncidentsError::IO(e))
            if e.kind() == ErrorKind::BrokenPipe =>
        {
            process::exit(0)
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}
