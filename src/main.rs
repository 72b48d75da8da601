use anyhow::Context;
use clap::Parser;
use resume_gen::core::{ConfigProvider, TransformResult};
use resume_gen::utils::{logger, validation::Validate};
use resume_gen::{CliConfig, GeneratorEngine, LocalStorage, SectionPipeline, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting resume-gen");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let mut config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                    eprintln!("💡 {}", e.recovery_suggestion());
                    std::process::exit(1);
                }
            };
            config.apply_cli_overrides(&cli);

            if let Err(e) = config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }

            execute(config, cli.dry_run).await
        }
        None => {
            let dry_run = cli.dry_run;
            execute(cli, dry_run).await
        }
    }
}

async fn execute<C: ConfigProvider>(config: C, dry_run: bool) -> anyhow::Result<()> {
    tracing::info!(
        "📂 {} → {}",
        config.data_dir().display(),
        config.sections_dir().display()
    );

    let engine = GeneratorEngine::new(SectionPipeline::new(LocalStorage::new(), config));

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - no fragments will be written");
        let plan = engine
            .plan()
            .await
            .context("failed to read source documents")?;
        print_plan(&engine, &plan);
        return Ok(());
    }

    // Generation problems never change the exit status; they are reported and logged only.
    match engine.run().await {
        Ok(report) => {
            for path in &report.written {
                println!("✓ {}", path.display());
            }
            for (section, reason) in &report.skipped {
                println!("- {} skipped: {}", section, reason);
            }
            for path in &report.removed {
                println!("🗑️ removed stale {}", path.display());
            }
            for (section, error) in &report.failed {
                eprintln!("❌ {} not written: {}", section, error);
            }
            if report.nothing_written() {
                println!("✨ Nothing to generate");
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Generation stopped: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
        }
    }

    Ok(())
}

fn print_plan<C: ConfigProvider>(
    engine: &GeneratorEngine<SectionPipeline<LocalStorage, C>>,
    plan: &TransformResult,
) {
    let config = engine.pipeline().config();
    for fragment in plan.fragments() {
        println!(
            "would write {} ({} bytes)",
            config
                .sections_dir()
                .join(config.fragment_file(fragment.section))
                .display(),
            fragment.content.len()
        );
    }
    for (section, reason) in plan.skipped() {
        println!("would skip {}: {}", section, reason);
    }
}
