//! strathouse CLI
//!
//! Command-line interface for managing strategy houses and their parts

use clap::{Parser, Subcommand};
use strathouse_core::logging_facility::{self, Profile};
use strathouse_core::ManifestLoader;
use strathouse_engine::{GitFetcher, HouseManager, Settings};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "strathouse")]
#[command(about = "strathouse - local strategy house manager", long_about = None)]
struct Cli {
    /// Do not auto-register the default house on first use
    #[arg(long, global = true)]
    no_default_house: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// House registry operations
    House(commands::house::HouseArgs),
    /// Part lookup and construction
    Part(commands::part::PartArgs),
}

fn main() {
    logging_facility::init(Profile::Development);
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load()?;
    if cli.no_default_house {
        settings = settings.without_default_house();
    }

    let fetcher = GitFetcher::new(settings.git_program.clone());
    let mut manager = HouseManager::open(
        settings,
        Box::new(fetcher),
        Box::new(ManifestLoader::new()),
    )?;

    match cli.command {
        Commands::House(args) => commands::house::execute(args, &mut manager),
        Commands::Part(args) => commands::part::execute(args, &manager),
    }
}
