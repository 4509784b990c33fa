use crate::clock::LogicalClock;
use crate::config::AppConfig;
use crate::plotting;
use anyhow::{Context, Result};
use pondforge_core::{
    analysis::{self, PondSummary},
    evaluator,
    logger::MeasurementJournal,
    MeasurementRequest, MeasurementStore, PondforgeError,
};
use pondforge_schemas::{
    command::SessionStep, file_formats::SessionFile, parameters::Parameter, MeasurementId, PondId,
};
use std::{fs, path::Path};
use tracing::{info, warn};

/// A step the store refused without changing anything.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub step: usize,
    pub pond_id: PondId,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ReplayOutcome {
    pub recorded: Vec<MeasurementId>,
    pub rejected: Vec<Rejection>,
    pub threshold_updates: usize,
}

pub fn load_session(path: &Path) -> Result<SessionFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file: {:?}", path))?;
    let session: SessionFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
    Ok(session)
}

/// Applies each step of a session to the store in order.
///
/// Rejected records are collected and replay goes on; any other failure,
/// including a missing expected measurement, stops the replay.
pub fn replay_session(
    store: &MeasurementStore,
    session: &SessionFile,
    clock: &mut LogicalClock,
    mut journal: Option<&mut MeasurementJournal>,
) -> Result<ReplayOutcome> {
    let mut outcome = ReplayOutcome::default();

    for (step_no, step) in session.steps.iter().enumerate() {
        match step {
            SessionStep::Record {
                pond_id,
                parameters,
                weather,
                notes,
                recorder,
            } => {
                let recorder = recorder.clone().unwrap_or_else(|| session.operator.clone());
                let request = MeasurementRequest {
                    pond_id: *pond_id,
                    parameters: *parameters,
                    weather: weather.clone(),
                    notes: notes.clone(),
                };

                match store.record_evaluated(clock.context(recorder), request) {
                    Ok((id, thresholds)) => {
                        clock.advance();
                        outcome.recorded.push(id);
                        if let Some(journal) = journal.as_deref_mut() {
                            let measurement = store
                                .get(id)
                                .ok_or(PondforgeError::MeasurementNotFound(id))?;
                            let breaches = evaluator::breaches(parameters, &thresholds);
                            journal.log_measurement(&measurement, &breaches)?;
                        }
                    }
                    Err(e) if e.is_rejection() => {
                        warn!(step = step_no, pond_id = *pond_id, "step rejected: {e}");
                        outcome.rejected.push(Rejection {
                            step: step_no,
                            pond_id: *pond_id,
                            reason: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            SessionStep::UpdateThresholds { thresholds } => {
                store.update_thresholds(*thresholds);
                clock.advance();
                outcome.threshold_updates += 1;
            }
            SessionStep::ExpectMeasurement { measurement_id } => {
                store
                    .get(*measurement_id)
                    .ok_or(PondforgeError::MeasurementNotFound(*measurement_id))
                    .with_context(|| format!("Session step {} failed", step_no))?;
            }
        }
    }

    Ok(outcome)
}

/// Runs a session file end to end and writes the journal, summary and charts
/// into a fresh run directory.
pub fn run_replay(config: &AppConfig, session_path: &Path) -> Result<()> {
    let session = load_session(session_path)?;
    let store = config.build_store()?;

    let output_dir = format!(
        "{}/session_{}",
        config.output_dir,
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir))?;

    // Copy the session file to the output directory for traceability
    fs::copy(session_path, Path::new(&output_dir).join("session.yaml"))?;

    println!("--- Replaying session ({} steps) ---", session.steps.len());
    info!(operator = %session.operator, schema_version = %session.schema_version, "session loaded");

    let journal_path = Path::new(&output_dir).join("journal.csv");
    let journal_path = journal_path
        .to_str()
        .context("Output path is not valid UTF-8")?
        .to_string();
    let mut journal = MeasurementJournal::new(&journal_path)?;
    let mut clock = LogicalClock::starting_at(config.start_height);

    let outcome = replay_session(&store, &session, &mut clock, Some(&mut journal))?;

    let summaries = analysis::summarize(&store);
    fs::write(
        Path::new(&output_dir).join("summary.json"),
        serde_json::to_string_pretty(&summaries)?,
    )?;

    if config.charts {
        plotting::generate_pond_charts(&output_dir, &store)?;
    }

    print_summary_report(&store, &outcome, &summaries, clock.now());
    println!("\nSession replay complete. Results are in '{}'", output_dir);
    Ok(())
}

fn print_summary_report(
    store: &MeasurementStore,
    outcome: &ReplayOutcome,
    summaries: &[PondSummary],
    final_height: u64,
) {
    println!("\n\n--- [Session Summary] ---");
    println!("========================================");
    println!("Measurements recorded:  {}", outcome.recorded.len());
    println!("Steps rejected:         {}", outcome.rejected.len());
    println!("Threshold updates:      {}", outcome.threshold_updates);
    println!("Ledger count:           {}", store.count());
    println!("Final logical height:   {}", final_height);
    println!("----------------------------------------");

    for summary in summaries {
        println!(
            "\nPond {:<6} | {:>4} measurements | {:>3} critical ({:.1}%)",
            summary.pond_id,
            summary.measurements,
            summary.critical,
            summary.critical_ratio * 100.0
        );
        for (parameter, stats) in &summary.parameters {
            println!(
                "  - {:<17} min {:>7.2}  max {:>7.2}  mean {:>7.2} {}",
                parameter.label(),
                stats.min,
                stats.max,
                stats.mean,
                parameter.unit()
            );
        }
        println!(
            "  - {:<17} min {:>7.0}  max {:>7.0}  mean {:>7.1} NTU",
            "turbidity", summary.turbidity.min, summary.turbidity.max, summary.turbidity.mean
        );
    }

    if !outcome.rejected.is_empty() {
        println!("\nRejected steps:");
        for rejection in &outcome.rejected {
            println!(
                "  - step {} (pond {}): {}",
                rejection.step, rejection.pond_id, rejection.reason
            );
        }
    }

    let t = store.thresholds();
    println!("\nThresholds in force:");
    println!(
        "  - temperature {}..{} °C, pH {}..{}, oxygen >= {} mg/L",
        Parameter::Temperature.format(t.min_temperature.into()),
        Parameter::Temperature.format(t.max_temperature.into()),
        Parameter::Ph.format(t.min_ph.into()),
        Parameter::Ph.format(t.max_ph.into()),
        Parameter::DissolvedOxygen.format(t.min_dissolved_oxygen.into()),
    );
    println!(
        "  - ammonia <= {}, nitrite <= {}, nitrate <= {} mg/L",
        Parameter::Ammonia.format(t.max_ammonia.into()),
        Parameter::Nitrite.format(t.max_nitrite.into()),
        Parameter::Nitrate.format(t.max_nitrate.into()),
    );
    println!("========================================");
}
