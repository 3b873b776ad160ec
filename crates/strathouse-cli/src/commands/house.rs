//! House commands
//!
//! Usage: strathouse house <add-remote|add-local|update|remove|list|path>

use clap::{Args, Subcommand};
use std::path::PathBuf;
use strathouse_core::model::house::DEFAULT_BRANCH;
use strathouse_core::ScanReport;
use strathouse_engine::HouseManager;

#[derive(Debug, Args)]
pub struct HouseArgs {
    #[command(subcommand)]
    pub command: HouseCommand,
}

#[derive(Debug, Subcommand)]
pub enum HouseCommand {
    /// Clone a remote house and register its parts
    AddRemote {
        name: String,
        url: String,
        #[arg(long, default_value = DEFAULT_BRANCH)]
        branch: String,
    },
    /// Register a local directory as a house named after it
    AddLocal { path: PathBuf },
    /// Re-fetch (remote) and re-scan a house
    Update { name: String },
    /// Remove a house and all its parts
    Remove { name: String },
    /// List registered houses
    List,
    /// Print the local directory of a house
    Path { name: String },
}

/// Execute house command
pub fn execute(args: HouseArgs, manager: &mut HouseManager) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        HouseCommand::AddRemote { name, url, branch } => {
            let report = manager.add_remote_house(&name, &url, &branch)?;
            print_report(&name, &report);
        }
        HouseCommand::AddLocal { path } => {
            let report = manager.add_local_house(&path)?;
            let name = path
                .canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_else(|| path.display().to_string());
            print_report(&name, &report);
        }
        HouseCommand::Update { name } => {
            let report = manager.update_house(&name)?;
            print_report(&name, &report);
        }
        HouseCommand::Remove { name } => {
            manager.remove_house(&name)?;
            println!("Removed house '{}'", name);
        }
        HouseCommand::List => {
            for house in manager.list_houses()? {
                match (&house.url, &house.branch) {
                    (Some(url), Some(branch)) => println!(
                        "{}\t{}\t{}\t{}@{}",
                        house.name,
                        house.house_type,
                        house.local_path.display(),
                        url,
                        branch
                    ),
                    _ => println!(
                        "{}\t{}\t{}",
                        house.name,
                        house.house_type,
                        house.local_path.display()
                    ),
                }
            }
        }
        HouseCommand::Path { name } => {
            println!("{}", manager.get_house_path(&name)?.display());
        }
    }
    Ok(())
}

fn print_report(name: &str, report: &ScanReport) {
    if report.house_path_missing {
        println!("House '{}' directory is missing, no parts registered", name);
        return;
    }
    for skipped in &report.skipped {
        println!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    println!(
        "Registered {} part(s) in house '{}'",
        report.registered.len(),
        name
    );
}
