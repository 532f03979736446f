use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::SystemTime;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shapelock::cell::{BasicCell, CellState, OrientedCell};
use shapelock::config::Config;
use shapelock::matching::{check, Policy, Strict, Verdict};
use shapelock::normalize::normalize;
use shapelock::problem::Bundle;
use shapelock::session::{Session, Tone};
use shapelock::{Dimension, Grid};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::storage::FileStorage;

mod storage;

#[derive(Parser)]
#[command(name = "checker", version, about = "Validate reference grids, check answers and manage problem files")]
struct Cli {
    /// JSON config file; flags below override it.
    #[arg(long, global = true, env = "SHAPELOCK_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, global = true, env = "SHAPELOCK_GRID_SIZE")]
    grid_size: Option<Dimension>,
    #[arg(long, global = true, env = "SHAPELOCK_POLICY")]
    policy: Option<Policy>,
    /// Which set of cell states grid files use.
    #[arg(long, global = true, value_enum, default_value_t = CellSet::Oriented)]
    cells: CellSet,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, ValueEnum)]
enum CellSet {
    /// empty, square, triangle
    Basic,
    /// empty, square, triangle-ne, triangle-nw, triangle-se, triangle-sw
    Oriented,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a reference grid file is well formed.
    Validate { file: PathBuf },
    /// Print the normalized signature of a grid file.
    Normalize { file: PathBuf },
    /// Check an answer grid against a reference grid.
    Check {
        #[arg(long)]
        reference: Option<PathBuf>,
        #[arg(long)]
        answer: PathBuf,
    },
    /// Manage a problem file.
    Problems {
        #[arg(long, env = "SHAPELOCK_STORE")]
        store: PathBuf,
        /// A bundled problem list to list ahead of the stored problems.
        #[arg(long)]
        bundle: Option<PathBuf>,
        #[command(subcommand)]
        command: ProblemCommand,
    },
}

#[derive(Subcommand)]
enum ProblemCommand {
    List,
    Register {
        /// The illustration, as SVG markup.
        #[arg(long)]
        image: PathBuf,
        /// The reference grid file.
        #[arg(long)]
        grid: PathBuf,
        /// Text revealed to whoever solves the problem.
        #[arg(long)]
        text: String,
        #[arg(long, env = "SHAPELOCK_ADMIN_PASSWORD")]
        password: String,
    },
    Delete {
        index: usize,
        #[arg(long, env = "SHAPELOCK_ADMIN_PASSWORD")]
        password: String,
    },
    /// Check an answer grid against a problem, printing its text if solved.
    Solve {
        index: usize,
        #[arg(long)]
        answer: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json(&read(path)?).with_context(|| format!("bad config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }

    Ok(config)
}

fn load_grid<C: CellState>(path: &Path, config: &Config) -> Result<Grid<C>> {
    Grid::from_json(&read(path)?, config.grid_size).with_context(|| format!("invalid grid {}", path.display()))
}

fn verdict_code(verdict: Verdict) -> ExitCode {
    match verdict {
        Verdict::Correct => ExitCode::SUCCESS,
        Verdict::Incorrect => ExitCode::from(1),
        Verdict::NotLoaded => ExitCode::from(2),
    }
}

fn run<C: CellState>(command: Commands, config: Config) -> Result<ExitCode> {
    match command {
        Commands::Validate { file } => {
            let grid = load_grid::<C>(&file, &config)?;
            println!("valid {0}x{0} grid", grid.side());
            print!("{}", grid);
        }
        Commands::Normalize { file } => {
            let grid = load_grid::<C>(&file, &config)?;
            println!("{}", normalize(&grid));
        }
        Commands::Check { reference, answer } => {
            let user = load_grid::<C>(&answer, &config)?;
            let target = reference.map(|path| load_grid::<C>(&path, &config)).transpose()?;

            let verdict = check(&user, target.as_ref(), &config.policy);
            let label: &'static str = verdict.into();
            match (config.policy, &target) {
                (Policy::Strict, Some(target)) if verdict == Verdict::Correct => {
                    let axis: &'static str = Strict::matching_axis(&user, target).map(Into::into).unwrap_or("none");
                    println!("{label} (axis: {axis})");
                }
                _ => println!("{label}"),
            }

            return Ok(verdict_code(verdict));
        }
        Commands::Problems { store, bundle, command } => {
            let mut session = Session::<C, _>::new(config, FileStorage::new(store));
            if let Some(path) = bundle {
                let side = session.config().grid_size;
                session.load_bundle(Bundle::from_fetch(fs::read_to_string(path), side));
            }
            if session.status().tone == Tone::Failure {
                eprintln!("{}", session.status().message);
            }

            return run_problems(&mut session, command);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_problems<C: CellState>(session: &mut Session<C, FileStorage>, command: ProblemCommand) -> Result<ExitCode> {
    match command {
        ProblemCommand::List => {
            let bundled = session.problems().bundled_len();
            for (index, problem) in session.problems().iter().enumerate() {
                let origin = if index < bundled { "bundled" } else { "stored" };
                println!("{index}\t{}\t{origin}", problem.created_at);
                print!("{}", problem.grid);
            }
        }
        ProblemCommand::Register { image, grid, text, password } => {
            if !session.unlock_admin(&password) {
                bail!("{}", session.status().message);
            }

            let created_at = humantime::format_rfc3339_seconds(SystemTime::now()).to_string();
            let index = session.register_problem(read(&image)?, &read(&grid)?, text, created_at)?;
            println!("registered problem {index}");
        }
        ProblemCommand::Delete { index, password } => {
            if !session.unlock_admin(&password) {
                bail!("{}", session.status().message);
            }

            session.delete_problem(index)?;
            println!("deleted problem {index}");
        }
        ProblemCommand::Solve { index, answer } => {
            session.select_problem(index)?;
            let grid = load_grid::<C>(&answer, session.config())?;
            session.set_grid(grid)?;

            let verdict = session.check();
            debug!(?verdict, index, "solve attempt");
            println!("{}", session.status().message);
            if let Some(text) = session.revealed() {
                println!("{text}");
            }

            return Ok(verdict_code(verdict));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.cells {
        CellSet::Basic => run::<BasicCell>(cli.command, config),
        CellSet::Oriented => run::<OrientedCell>(cli.command, config),
    }
}
