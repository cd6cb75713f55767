use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use captable_core::utils::parse_decimal;

#[derive(Parser, Debug)]
#[command(name = "captable")]
#[command(about = "Simulate startup ownership across SAFEs, notes, priced rounds and option pools")]
pub struct Cli {
    /// SQLite database file (overrides CAPTABLE_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Scenario to operate on (overrides CAPTABLE_SCENARIO)
    #[arg(long, short, global = true)]
    pub scenario: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the scenario over with founders given as "John:50, Jane:50"
    Init {
        founders: String,
        /// Initial option pool percentage
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        pool: Decimal,
    },
    /// Add a SAFE; with neither --discount nor --cap it is an MFN SAFE
    Safe {
        name: String,
        #[arg(long, value_parser = parse_amount)]
        invested: Decimal,
        /// Discount rate in percent
        #[arg(long, value_parser = parse_amount)]
        discount: Option<Decimal>,
        /// Post-money valuation cap
        #[arg(long, value_parser = parse_amount)]
        cap: Option<Decimal>,
    },
    /// Add a convertible note
    Note {
        name: String,
        #[arg(long, value_parser = parse_amount)]
        invested: Decimal,
        #[arg(long, value_parser = parse_amount)]
        price: Decimal,
    },
    /// Add a priced equity round, optionally topping up the option pool
    Priced {
        name: String,
        #[arg(long, value_parser = parse_amount)]
        pre_money: Decimal,
        #[arg(long, value_parser = parse_amount)]
        invested: Decimal,
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        pool: Decimal,
    },
    /// Create an option pool that dilutes every current holder
    Pool {
        #[arg(value_parser = parse_amount)]
        percentage: Decimal,
    },
    /// Give a holder a percentage without diluting anyone
    Allocate {
        name: String,
        #[arg(value_parser = parse_amount)]
        percentage: Decimal,
    },
    /// Revert the last mutation
    Undo,
    /// Print the current cap table
    Show,
    /// List undoable mutations, oldest first
    History,
    /// Write the cap table to a CSV file
    Export { path: PathBuf },
    /// List stored scenarios
    Scenarios,
    /// Delete the selected scenario
    Delete,
}

impl Commands {
    /// True for commands that change the stored scenario.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Commands::Init { .. }
                | Commands::Safe { .. }
                | Commands::Note { .. }
                | Commands::Priced { .. }
                | Commands::Pool { .. }
                | Commands::Allocate { .. }
                | Commands::Undo
        )
    }
}

fn parse_amount(value: &str) -> Result<Decimal, String> {
    parse_decimal(value).map_err(|e| e.to_string())
}
