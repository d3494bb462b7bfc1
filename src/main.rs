use anyhow::Context;
use clap::Parser;
use surge_readiness::app::dispatch::{persist_report, render_text, ReportEnvelope};
use surge_readiness::utils::error::ErrorSeverity;
use surge_readiness::utils::{logger, validation::Validate};
use surge_readiness::{CliConfig, FileRegistrySource, LocalStorage, SurgeEngine, SurgeError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file_config = match cli.load_file_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    let settings = match cli.resolve(&file_config) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    if settings.json_logs {
        logger::init_json_logger(settings.verbose, settings.log_level.as_deref());
    } else {
        logger::init_cli_logger(settings.verbose, settings.log_level.as_deref());
    }

    tracing::info!("Starting surge-readiness");
    tracing::debug!("Run settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        exit_with(&e);
    }

    let registry_path = settings.registry_path.clone().unwrap_or_default();
    let source = FileRegistrySource::new(&registry_path);
    let engine = match SurgeEngine::from_source(&source).await {
        Ok(engine) => engine.with_default_top_n(settings.top_n),
        Err(e) => {
            tracing::error!(
                "Registry load failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            exit_with(&e);
        }
    };

    let report = match engine.notify(&settings.severity, settings.latitude, settings.longitude) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Matching failed: {}", e);
            exit_with(&e);
        }
    };

    let envelope = ReportEnvelope::new(
        settings.severity.clone(),
        settings.latitude,
        settings.longitude,
        engine.registry().len(),
        report,
    );

    if settings.json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&envelope).context("serializing dispatch report")?
        );
    } else {
        print!("{}", render_text(&envelope.report));
    }

    if let Some(output_path) = &settings.output_path {
        let storage = LocalStorage::new(output_path.clone());
        persist_report(&storage, &envelope)
            .await
            .with_context(|| format!("writing report to {}", output_path))?;
        tracing::info!("Report saved to: {}", output_path);
    }

    Ok(())
}

fn exit_with(e: &SurgeError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
