//! lifesim
//!
//! Command-line front end: birth, inspect and tick agents stored in a JSON
//! data directory.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use life_core::config::DEFAULT_TUNING_PATH;
use life_core::{
    describe_activity, AgentRepository, JsonDirectoryStore, LifeAgent, Simulator, Tuning,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "lifesim")]
#[command(about = "Long-lived animal agents that drift, remember and sometimes speak")]
struct Args {
    /// Directory holding agent and archive files
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Tuning file; defaults are used when it does not exist
    #[arg(long, global = true, default_value = DEFAULT_TUNING_PATH)]
    tuning: PathBuf,

    /// Random seed for reproducibility (defaults to the clock)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Birth a new animal
    Birth {
        #[arg(long, default_value = "")]
        creator: String,
    },
    /// List animal ids
    List {
        #[arg(long)]
        creator: Option<String>,
    },
    /// Print an animal's timeline with its silences
    Observe { id: String },
    /// Print a JSON summary of an animal
    State { id: String },
    /// Look an animal up by its public slug
    Find { slug: String },
    /// Advance the whole population
    Tick {
        #[arg(long, default_value_t = 1)]
        ticks: u64,
    },
    /// Print the effective tuning
    Config,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let tuning = Tuning::load_or_default(&args.tuning)?;
    let now = unix_now();
    let seed = args.seed.unwrap_or(now.as_nanos() as u64);
    let store = JsonDirectoryStore::open(&args.data_dir, tuning.clone());

    match args.command {
        Command::Birth { creator } => {
            let mut simulator = Simulator::new(store, tuning, seed, now.as_secs());
            let agent = simulator.spawn(&creator)?;
            println!("{}", agent.id);
            println!("{}", agent.slug);
        }
        Command::List { creator } => {
            for id in store.list_ids(creator.as_deref())? {
                println!("{}", id);
            }
        }
        Command::Observe { id } => {
            let agent = store.load(&id)?;
            for line in agent.timeline.render(agent.age_ticks) {
                println!("{}", line);
            }
        }
        Command::State { id } => {
            let agent = store.load(&id)?;
            print_state(&agent)?;
        }
        Command::Find { slug } => match store.find_by_public_slug(&slug)? {
            Some(agent) => print_state(&agent)?,
            None => return Err(format!("no animal with slug '{}'", slug).into()),
        },
        Command::Tick { ticks } => {
            let mut simulator = Simulator::new(store, tuning, seed, now.as_secs());
            let report = simulator.run(ticks)?;
            println!(
                "ticks={} expressions={} births={}",
                report.ticks, report.expressions, report.births
            );
        }
        Command::Config => print!("{}", tuning.to_toml()?),
    }
    Ok(())
}

fn print_state(agent: &LifeAgent) -> Result<(), Box<dyn Error>> {
    let temperament: Vec<&str> = agent.temperament.iter().map(|t| t.as_str()).collect();
    let payload = serde_json::json!({
        "id": agent.id,
        "slug": agent.slug,
        "species": agent.species,
        "creator": agent.creator,
        "age_ticks": agent.age_ticks,
        "phase": agent.phase.label(),
        "temperament": temperament,
        "state": agent.state.to_axes(),
        "pressure": agent.pressure,
        "tolerance": agent.tolerance,
        "memories": agent.memory.len(),
        "expressions": agent.timeline.len(),
        "activity": describe_activity(agent),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn unix_now() -> std::time::Duration {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
}
