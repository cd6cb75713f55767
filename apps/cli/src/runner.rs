use std::io::Write;

use anyhow::{bail, Context};

use captable_core::export::export_cap_table_csv;
use captable_core::scenarios::ScenarioRepositoryTrait;
use captable_core::settings::SimulatorSettings;
use captable_core::utils::parse_founders;
use captable_core::{CapTableServiceTrait, CapTableSimulator};

use crate::commands::Commands;
use crate::config::Config;

/// Executes one command against the configured scenario.
///
/// Mutations load the stored scenario (or start empty), apply the
/// operation, save, and print the resulting table.
pub fn run<W: Write>(
    command: Commands,
    config: &Config,
    repository: &dyn ScenarioRepositoryTrait,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Scenarios => return list_scenarios(repository, out),
        Commands::Delete => {
            let deleted = repository.delete_scenario(&config.scenario)?;
            if deleted == 0 {
                bail!("scenario '{}' does not exist", config.scenario);
            }
            tracing::info!("Deleted scenario '{}'", config.scenario);
            writeln!(out, "Deleted scenario '{}'", config.scenario)?;
            return Ok(());
        }
        _ => {}
    }

    let mutates = command.is_mutation();
    let mut simulator = if matches!(command, Commands::Init { .. }) {
        fresh_simulator(config)?
    } else {
        load_simulator(config, repository)?
    };

    match command {
        Commands::Init { founders, pool } => {
            let founders = parse_founders(&founders)?;
            simulator.initialize_founders(&founders, pool)?;
        }
        Commands::Safe {
            name,
            invested,
            discount,
            cap,
        } => {
            simulator.add_safe_round(&name, invested, discount, cap)?;
        }
        Commands::Note {
            name,
            invested,
            price,
        } => {
            simulator.add_convertible_note_round(&name, invested, price)?;
        }
        Commands::Priced {
            name,
            pre_money,
            invested,
            pool,
        } => {
            simulator.add_priced_equity_round(&name, pre_money, invested, pool)?;
        }
        Commands::Pool { percentage } => {
            simulator.create_option_pool(percentage)?;
        }
        Commands::Allocate { name, percentage } => {
            simulator.allocate(&name, percentage)?;
        }
        Commands::Undo => {
            let snapshot = simulator.undo()?;
            writeln!(out, "Undid: {}", snapshot.label)?;
        }
        Commands::Show => {}
        Commands::History => {
            let labels = simulator.history_labels();
            if labels.is_empty() {
                writeln!(out, "Nothing to undo")?;
            }
            for (index, label) in labels.iter().enumerate() {
                writeln!(out, "{:>3}. {}", index + 1, label)?;
            }
            return Ok(());
        }
        Commands::Export { path } => {
            let precision = simulator.settings().display_precision;
            export_cap_table_csv(simulator.current_cap_table(), precision, &path)?;
            writeln!(out, "Exported cap table to {}", path.display())?;
            return Ok(());
        }
        // Handled before the scenario was loaded.
        Commands::Scenarios | Commands::Delete => return Ok(()),
    }

    if mutates {
        repository
            .save_scenario(&config.scenario, &simulator.serialize_state())
            .with_context(|| format!("saving scenario '{}'", config.scenario))?;
    }

    print_cap_table(&simulator, out)
}

fn fresh_simulator(config: &Config) -> anyhow::Result<CapTableSimulator> {
    let settings = SimulatorSettings {
        history_limit: config.history_limit,
        ..SimulatorSettings::default()
    };
    Ok(CapTableSimulator::with_settings(settings)?)
}

fn load_simulator(
    config: &Config,
    repository: &dyn ScenarioRepositoryTrait,
) -> anyhow::Result<CapTableSimulator> {
    match repository.load_scenario(&config.scenario)? {
        Some(scenario) => {
            let mut simulator = CapTableSimulator::from_state(scenario.state)
                .with_context(|| format!("restoring scenario '{}'", config.scenario))?;
            if config.history_limit.is_some() {
                simulator.set_history_limit(config.history_limit)?;
            }
            Ok(simulator)
        }
        None => {
            tracing::debug!("Scenario '{}' not found, starting empty", config.scenario);
            fresh_simulator(config)
        }
    }
}

fn print_cap_table<W: Write>(simulator: &CapTableSimulator, out: &mut W) -> anyhow::Result<()> {
    let rows = simulator.display_cap_table();
    if rows.is_empty() {
        writeln!(out, "Cap table is empty")?;
        return Ok(());
    }

    let precision = simulator.settings().display_precision as usize;
    let width = rows.iter().map(|(holder, _)| holder.len()).max().unwrap_or(0);
    for (holder, percentage) in rows {
        writeln!(
            out,
            "{:<width$}  {:>8.*}%",
            holder,
            precision,
            percentage,
            width = width
        )?;
    }
    Ok(())
}

fn list_scenarios<W: Write>(
    repository: &dyn ScenarioRepositoryTrait,
    out: &mut W,
) -> anyhow::Result<()> {
    let summaries = repository.list_scenarios()?;
    if summaries.is_empty() {
        writeln!(out, "No scenarios saved")?;
    }
    for summary in summaries {
        writeln!(
            out,
            "{}  holders={} rounds={} updated={}",
            summary.name,
            summary.holder_count,
            summary.round_count,
            summary.updated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use captable_storage_sqlite::open_scenario_repository;
    use captable_storage_sqlite::ScenarioRepository;
    use tempfile::TempDir;

    fn setup() -> (Config, ScenarioRepository, TempDir) {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("cli.db").to_string_lossy().to_string();
        let repository = open_scenario_repository(&db_path).expect("Failed to open repository");
        let config = Config {
            db_path,
            scenario: "test".to_string(),
            history_limit: None,
            log_format: "text".to_string(),
        };
        (config, repository, temp_dir)
    }

    fn run_to_string(
        command: Commands,
        config: &Config,
        repository: &ScenarioRepository,
    ) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run(command, config, repository, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8 output"))
    }

    fn init(config: &Config, repository: &ScenarioRepository) {
        run_to_string(
            Commands::Init {
                founders: "John:50, Jane:50".to_string(),
                pool: rust_decimal::Decimal::ZERO,
            },
            config,
            repository,
        )
        .unwrap();
    }

    #[test]
    fn test_init_then_show_persists_table() {
        let (config, repository, _dir) = setup();
        init(&config, &repository);

        let output = run_to_string(Commands::Show, &config, &repository).unwrap();
        assert!(output.contains("John"));
        assert!(output.contains("50.00%"));
        assert!(output.contains("Initial Pool"));
    }

    #[test]
    fn test_mutation_then_undo_round_trip() {
        let (config, repository, _dir) = setup();
        init(&config, &repository);

        run_to_string(
            Commands::Pool {
                percentage: rust_decimal_macros::dec!(20),
            },
            &config,
            &repository,
        )
        .unwrap();
        let output = run_to_string(Commands::Show, &config, &repository).unwrap();
        assert!(output.contains("Pool After Round 1"));
        assert!(output.contains("40.00%"));

        let output = run_to_string(Commands::Undo, &config, &repository).unwrap();
        assert!(output.starts_with("Undid: Create option pool"));
        assert!(!output.contains("20.00%"));
        assert!(output.contains("50.00%"));
    }

    #[test]
    fn test_failed_operation_is_not_saved() {
        let (config, repository, _dir) = setup();
        init(&config, &repository);

        let result = run_to_string(
            Commands::Pool {
                percentage: rust_decimal_macros::dec!(100),
            },
            &config,
            &repository,
        );
        assert!(result.is_err());

        let history = run_to_string(Commands::History, &config, &repository).unwrap();
        assert_eq!(history.lines().count(), 1);
        assert!(history.contains("Initialize 2 founders"));
    }

    #[test]
    fn test_undo_on_empty_scenario_fails() {
        let (config, repository, _dir) = setup();
        assert!(run_to_string(Commands::Undo, &config, &repository).is_err());
    }

    #[test]
    fn test_export_writes_csv() {
        let (config, repository, dir) = setup();
        init(&config, &repository);

        let path = dir.path().join("table.csv");
        run_to_string(Commands::Export { path: path.clone() }, &config, &repository).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("Holder,Percentage"));
        assert!(contents.contains("Jane,50.00"));
    }

    #[test]
    fn test_scenarios_and_delete() {
        let (config, repository, _dir) = setup();
        init(&config, &repository);

        let listing = run_to_string(Commands::Scenarios, &config, &repository).unwrap();
        assert!(listing.contains("test  holders=3 rounds=0"));

        run_to_string(Commands::Delete, &config, &repository).unwrap();
        assert!(run_to_string(Commands::Delete, &config, &repository).is_err());
        let listing = run_to_string(Commands::Scenarios, &config, &repository).unwrap();
        assert!(listing.contains("No scenarios saved"));
    }
}
