//! Battle simulator entry point.
use anyhow::Result;
use battle_sim::SimConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    let report = battle_sim::run(&config)?;

    match report.outcome {
        Some(outcome) => tracing::info!(%outcome, ticks = report.ticks, "simulation finished"),
        None => tracing::warn!(ticks = report.ticks, "simulation stopped without an outcome"),
    }

    if config.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
