//! Part commands
//!
//! Usage: strathouse part <list|info|get>

use clap::{Args, Subcommand};
use serde_json::Value;
use strathouse_core::{Category, Params};
use strathouse_engine::HouseManager;

#[derive(Debug, Args)]
pub struct PartArgs {
    #[command(subcommand)]
    pub command: PartCommand,
}

#[derive(Debug, Subcommand)]
pub enum PartCommand {
    /// List registered part names
    List {
        #[arg(long)]
        house: Option<String>,
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
    },
    /// Show a part's name, author, version and doc
    Info {
        name: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Construct a part and print its name and parameters
    Get {
        name: String,
        /// Parameter as key=value; the value is read as JSON when it parses
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },
}

/// Execute part command
pub fn execute(args: PartArgs, manager: &HouseManager) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        PartCommand::List { house, category } => {
            for name in manager.get_part_name_list(house.as_deref(), category)? {
                println!("{}", name);
            }
        }
        PartCommand::Info { name, json } => {
            if json {
                let info = manager.get_part_info(&name)?;
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                manager.print_part_info(&name)?;
            }
        }
        PartCommand::Get { name, params } => {
            let params: Params = params.into_iter().collect();
            let part = manager.get_part(&name, &params)?;
            println!("{}", part.name());
            println!("{}", serde_json::to_string_pretty(part.params())?);
        }
    }
    Ok(())
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse().map_err(|e: strathouse_core::model::category::UnknownCategory| e.to_string())
}

fn parse_param(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", s));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_reads_json_or_string() {
        assert_eq!(parse_param("p=0.05").unwrap(), ("p".to_string(), serde_json::json!(0.05)));
        assert_eq!(
            parse_param("mode=fast").unwrap(),
            ("mode".to_string(), Value::String("fast".to_string()))
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=1").is_err());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("prtflo").unwrap(), Category::Prtflo);
        assert!(parse_category("xx").is_err());
    }
}
