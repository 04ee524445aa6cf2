//! Command implementations

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::FileConfigAdapter;
use crate::app::{AppContainer, DefaultAppContainer};
use crate::cli::{Cli, Commands};
use crate::config_initialization::{initialize_configuration_hierarchy, ConfigOverrides, PipelineConfig};
use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::utils::Utils;

/// Execute the parsed command line
pub fn execute(cli: Cli) -> Result<PipelineReport> {
    let overrides = match &cli.command {
        Commands::Run(args) => args.overrides(),
        Commands::Stamp(args) => args.overrides(),
        Commands::Assemble(args) => args.overrides(),
    };
    let config = resolve_config(&cli, &overrides)?;
    let container = DefaultAppContainer::new(&config).context("Failed to initialize adapters")?;

    let started = Instant::now();
    let report = match &cli.command {
        Commands::Run(_) => run(&container, &config)?,
        Commands::Stamp(_) => stamp(&container, &config)?,
        Commands::Assemble(_) => assemble(&container, &config)?,
    };
    info!(elapsed = %Utils::format_duration(started.elapsed()), "Command finished");

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_summary(&report, &config);
    }
    Ok(report)
}

fn resolve_config(cli: &Cli, overrides: &ConfigOverrides) -> Result<PipelineConfig> {
    let config_port = FileConfigAdapter::new();
    let config =
        initialize_configuration_hierarchy(&config_port, cli.config.as_deref(), overrides)
            .context("Failed to resolve configuration")?;
    Ok(config)
}

/// Execute the run command
fn run(container: &dyn AppContainer, config: &PipelineConfig) -> Result<PipelineReport> {
    let stamp_request = config.stamp_request()?;
    let assembly_request = config.assembly_request()?;
    let report = container
        .pipeline_interactor()
        .execute(&stamp_request, &assembly_request)
        .context("Pipeline failed")?;
    Ok(report)
}

/// Execute the stamp command
fn stamp(container: &dyn AppContainer, config: &PipelineConfig) -> Result<PipelineReport> {
    let request = config.stamp_request()?;
    let outcome = container
        .stamp_interactor()
        .execute(&request)
        .context("Stamping failed")?;
    Ok(PipelineReport {
        stamp: Some(outcome),
        assemble: None,
    })
}

/// Execute the assemble command
fn assemble(container: &dyn AppContainer, config: &PipelineConfig) -> Result<PipelineReport> {
    let request = config.assembly_request()?;
    let outcome = container
        .assemble_interactor()
        .execute(&request)
        .context("Assembly failed")?;
    Ok(PipelineReport {
        stamp: None,
        assemble: Some(outcome),
    })
}

fn print_summary(report: &PipelineReport, config: &PipelineConfig) {
    match &report.stamp {
        Some(StageOutcome::Completed(stamp)) => {
            println!(
                "Stamped {} images into {}",
                stamp.images,
                stamp.dated_dir.display()
            );
            if stamp.raw_removed {
                println!("Removed raw folder");
            }
        }
        Some(StageOutcome::Skipped { reason }) => println!("Stamp skipped: {}", reason),
        None => {}
    }

    match &report.assemble {
        Some(StageOutcome::Completed(video)) => {
            let size = std::fs::metadata(&video.output_path)
                .map(|m| Utils::format_file_size(m.len()))
                .unwrap_or_else(|_| "unknown size".to_string());
            println!(
                "Assembled {} of {} images into {} ({}, {}, {} playback)",
                video.frames,
                video.candidates,
                video.output_path.display(),
                video.geometry,
                size,
                Utils::format_duration(Utils::playback_duration(
                    video.frames,
                    config.video.frame_rate
                ))
            );
        }
        Some(StageOutcome::Skipped { reason }) => println!("Assemble skipped: {}", reason),
        None => {}
    }
}

/// Process exit code for a failed command
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DomainError>())
        .map(DomainError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_exit_code_found_through_context() {
        let err = Err::<(), _>(DomainError::GeometryMismatch {
            path: "210523_1300.jpg".into(),
            expected: (1280, 720),
            actual: (640, 480),
        })
        .context("Assembly failed")
        .unwrap_err();
        assert_eq!(exit_code(&err), 7);
    }

    #[test]
    fn test_exit_code_defaults_to_internal() {
        assert_eq!(exit_code(&anyhow!("unexpected")), 1);
    }

    #[test]
    fn test_exit_code_for_config_errors() {
        let err = anyhow::Error::new(DomainError::ConfigFail("bad toml".to_string()))
            .context("Failed to resolve configuration");
        assert_eq!(exit_code(&err), 2);
    }
}
