//! Command runners behind `index-stress run` and `index-stress list`.

use anyhow::Context;
use index_stress_core::{DatabaseClient, MemoryClient};
use index_stress_mongodb::{MongoDBArgs, MongoDBClient};

use crate::args::{CommonRunArgs, OutputFormat};
use crate::logging::mask_connection_password;
use crate::scenario::{builtin_scenarios, RunSummary, Scenario, ScenarioFile, ScenarioRunner};

/// Load scenarios from `--scenarios` or the built-in catalog.
pub fn load_scenarios(path: Option<&std::path::Path>) -> anyhow::Result<ScenarioFile> {
    match path {
        Some(path) => ScenarioFile::from_file(path)
            .with_context(|| format!("Failed to load scenarios from {path:?}")),
        None => Ok(builtin_scenarios()),
    }
}

fn selected_scenarios(args: &CommonRunArgs) -> anyhow::Result<Vec<Scenario>> {
    let file = load_scenarios(args.scenarios.as_deref())?;
    let scenarios = file
        .select(&args.only)
        .context("Failed to select scenarios")?;
    Ok(scenarios)
}

/// Run the selected scenarios against `client` and print the summary.
pub async fn run_scenarios<C: DatabaseClient + ?Sized>(
    client: &C,
    args: &CommonRunArgs,
) -> anyhow::Result<RunSummary> {
    let options = args.run_options();
    options.validate().context("Invalid run options")?;
    let scenarios = selected_scenarios(args)?;

    tracing::info!(
        "Running {} scenario(s) (scale={}, dry_run={})",
        scenarios.len(),
        options.scale,
        options.dry_run
    );

    let summary = ScenarioRunner::new(client, options)
        .run_all(&scenarios)
        .await;

    match args.output {
        OutputFormat::Text => print!("{}", summary.to_text()),
        OutputFormat::Json => println!(
            "{}",
            summary.to_json().context("Failed to serialize run summary")?
        ),
    }

    Ok(summary)
}

fn ensure_success(summary: &RunSummary) -> anyhow::Result<()> {
    if summary.is_success() {
        Ok(())
    } else {
        anyhow::bail!("{} of {} scenarios failed", summary.failed(), summary.reports.len())
    }
}

/// `run mongodb`
pub async fn run_mongodb(mongodb: &MongoDBArgs, args: &CommonRunArgs) -> anyhow::Result<()> {
    tracing::info!(
        "Connection: {} (database '{}')",
        mask_connection_password(&mongodb.mongodb_connection_string),
        mongodb.mongodb_database
    );

    if args.dry_run {
        // No connection needed to validate scenarios.
        let summary = run_scenarios(&MemoryClient::new(), args).await?;
        return ensure_success(&summary);
    }

    let client = MongoDBClient::connect(
        &mongodb.mongodb_connection_string,
        &mongodb.mongodb_database,
    )
    .await
    .context("Failed to connect to MongoDB")?;

    let summary = run_scenarios(&client, args).await?;
    ensure_success(&summary)
}

/// `run memory`
pub async fn run_memory(args: &CommonRunArgs, storage_engine: Option<&str>) -> anyhow::Result<()> {
    let mut client = MemoryClient::new();
    if let Some(engine) = storage_engine {
        client = client.with_storage_engine(engine);
    }
    let summary = run_scenarios(&client, args).await?;
    ensure_success(&summary)
}

/// `list`: print the scenario catalog.
pub fn list_scenarios(path: Option<&std::path::Path>) -> anyhow::Result<()> {
    let file = load_scenarios(path)?;
    for scenario in &file.scenarios {
        println!(
            "{:<40} {:<36} {:>10} docs  chunk {:>7}  {:<22} expect {}{}",
            scenario.name,
            scenario.collection,
            scenario.target_count,
            scenario.chunk_size,
            scenario.generator.to_string(),
            scenario.expected_outcome(),
            if scenario.tags.is_empty() {
                String::new()
            } else {
                format!("  tags {:?}", scenario.tags)
            }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CommonRunArgs {
        CommonRunArgs {
            scenarios: None,
            only: vec!["stress_unique_index".to_string()],
            exclude_tags: Vec::new(),
            scale: 1.0,
            chunk_size: None,
            dry_run: false,
            output: OutputFormat::Json,
        }
    }

    #[tokio::test]
    async fn test_run_scenarios_in_memory() {
        let client = MemoryClient::new();
        let summary = run_scenarios(&client, &args()).await.unwrap();
        assert_eq!(summary.passed(), 1);
        assert!(ensure_success(&summary).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_scenario_is_error() {
        let mut args = args();
        args.only = vec!["nope".to_string()];
        let err = run_scenarios(&MemoryClient::new(), &args).await.unwrap_err();
        assert!(format!("{err:#}").contains("Scenario not found: nope"));
    }

    #[tokio::test]
    async fn test_invalid_scale_is_error() {
        let mut args = args();
        args.scale = 0.0;
        assert!(run_scenarios(&MemoryClient::new(), &args).await.is_err());
    }

    #[tokio::test]
    async fn test_negative_chunk_override_fails_scenarios() {
        let mut args = args();
        args.chunk_size = Some(-1);
        let summary = run_scenarios(&MemoryClient::new(), &args).await.unwrap();
        assert_eq!(summary.failed(), 1);
        assert!(ensure_success(&summary).is_err());
    }
}
