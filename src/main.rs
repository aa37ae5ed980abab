use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{error, info};

use gift_exchange::matcher::{Matcher, SearchOutcome, Strategy};
use gift_exchange::{logging, metrics, report, survey, Config};

#[derive(Parser)]
#[command(name = "gift_exchange")]
#[command(about = "Assigns gift exchange participants without crossing their content limits")]
#[command(version = "0.1.0")]
struct Cli {
    /// Survey responses (CSV with a header row)
    data: PathBuf,

    /// Config file; defaults to gift_exchange.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a gifting cycle and print it, one creator per line
    AssignSantas {
        #[arg(long, value_enum)]
        strategy: Option<Strategy>,
        /// Seed for a reproducible search
        #[arg(long)]
        seed: Option<u64>,
        /// Permutations tried by the brute-force strategy
        #[arg(long)]
        max_attempts: Option<u64>,
        /// Node expansions allowed to the graph strategy
        #[arg(long)]
        max_steps: Option<u64>,
        /// Print the assignment as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count every character named in the survey
    ListCharacters,
    /// Count every ship named in the survey
    ListShips,
    /// Report participants who submitted more than once
    CheckDuplicates,
}

fn print_frequencies(frequencies: report::Frequencies) {
    for (token, count) in frequencies {
        println!("{token}: {count}");
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();
    metrics::describe();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading config")?;
    let normalizer = config.normalizer();

    let records = survey::read_records_from_path(&cli.data)
        .with_context(|| format!("reading survey {}", cli.data.display()))?;

    if let Commands::CheckDuplicates = cli.command {
        let duplicates = report::duplicate_ids(
            records
                .iter()
                .filter_map(|r| r.get(&config.columns.id))
                .map(|id| id.trim()),
        );
        if duplicates.is_empty() {
            println!("No duplicates found");
        } else {
            println!("Duplicate Entries");
            print_frequencies(duplicates);
        }
        return Ok(());
    }

    let participants = survey::load_participants(&records, &config.columns, &normalizer)?;

    match cli.command {
        Commands::ListCharacters => print_frequencies(report::entity_frequencies(&participants)),
        Commands::ListShips => print_frequencies(report::pairing_frequencies(&participants)),
        Commands::CheckDuplicates => {}
        Commands::AssignSantas {
            strategy,
            seed,
            max_attempts,
            max_steps,
            json,
        } => {
            let mut settings = config.search.clone();
            settings.strategy = strategy.unwrap_or(settings.strategy);
            settings.seed = seed.or(settings.seed);
            settings.max_attempts = max_attempts.unwrap_or(settings.max_attempts);
            settings.max_steps = max_steps.unwrap_or(settings.max_steps);

            let mut rng = match settings.seed {
                Some(seed) => {
                    info!(seed, "Using fixed seed");
                    StdRng::seed_from_u64(seed)
                }
                None => StdRng::from_entropy(),
            };

            let compatibility = config.compatibility();
            let matcher = Matcher::new(&participants, &compatibility)?;

            match matcher.search(&settings, &mut rng)? {
                SearchOutcome::Found(assignment) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&assignment.report())?);
                    } else {
                        for creator in assignment.cycle() {
                            println!("{creator}");
                        }
                    }
                }
                SearchOutcome::NotFound {
                    reason,
                    longest_path,
                } => {
                    error!(
                        %reason,
                        covered = longest_path.len(),
                        total = participants.len(),
                        "Search ended without an assignment"
                    );
                    println!("No solution found!");
                }
            }
        }
    }

    Ok(())
}
