//! CV screener: internal analytics console for CV screening, dashboards and
//! ETL upload

use clap::Parser;
use cv_screener::batch::BatchOrchestrator;
use cv_screener::cli::{self, Cli, Commands, ConfigAction, DashboardView};
use cv_screener::config::Config;
use cv_screener::error::{Result, ScreenerError};
use cv_screener::external::auth::{require_elevated, CurrentUser, Role};
use cv_screener::external::dashboard::{KpiProvider, StaticKpiProvider};
use cv_screener::external::etl::{EtlEndpoint, EtlUploader, LocalEtlUploader};
use cv_screener::input::DocumentIntake;
use cv_screener::output::{render, ScreeningReport};
use cv_screener::scoring::backend::KeywordBackend;
use cv_screener::session::ScreeningSession;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Screen {
            job,
            cvs,
            select,
            output,
            detailed,
            concurrency,
            save,
        } => {
            cli::validate_file_extension(&job, &["txt", "md"])
                .map_err(|e| ScreenerError::InvalidInput(format!("Job description: {}", e)))?;
            for cv in &cvs {
                cli::validate_file_extension(cv, &["pdf", "txt", "md"])
                    .map_err(|e| ScreenerError::InvalidInput(format!("CV file: {}", e)))?;
            }
            if select.len() > 2 {
                return Err(ScreenerError::InvalidInput(
                    "--select can be given at most twice".to_string(),
                ));
            }
            let output_format = cli::parse_output_format(&output).map_err(ScreenerError::InvalidInput)?;

            let mut config = config;
            if let Some(bound) = concurrency {
                config.batch.max_concurrency = bound;
            }

            info!("screening {} CVs against {}", cvs.len(), job.display());

            let mut intake = DocumentIntake::new();
            let job_description = intake.extract_text(&job).await?;
            let documents = intake.intake_batch(&cvs).await?;

            let orchestrator = BatchOrchestrator::from_config(KeywordBackend::new()?, &config)?;
            let mut session = ScreeningSession::default();

            let spinner = ProgressBar::new_spinner().with_message(format!(
                "Scoring {} candidates...",
                documents.len()
            ));
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            let outcome = session.analyze(&orchestrator, &job_description, documents).await;
            spinner.finish_and_clear();
            outcome?;

            for candidate_id in &select {
                session.select(candidate_id)?;
            }

            let batch = session
                .batch()
                .ok_or_else(|| ScreenerError::InvalidInput("analysis produced no batch".to_string()))?;
            let report = ScreeningReport::new(batch, detailed);
            let color = config.output.color_output && save.is_none();
            let rendered = render(&report, &output_format, color)?;

            match save {
                Some(path) => {
                    tokio::fs::write(&path, rendered).await?;
                    println!("Report written to {}", path.display());
                }
                None => println!("{}", rendered),
            }
            Ok(())
        }

        Commands::Dashboard { view } => {
            let provider = StaticKpiProvider;
            match view {
                DashboardView::Pnl => {
                    let snapshot = provider.pnl()?;
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                }
                DashboardView::Headcount => {
                    let snapshot = provider.headcount()?;
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                }
            }
            Ok(())
        }

        Commands::Etl {
            endpoint,
            file,
            role,
        } => {
            let endpoint = EtlEndpoint::parse(&endpoint)?;
            let role = Role::parse(&role)?;
            let user = CurrentUser::new("local-operator", "Local Operator", role);
            require_elevated(&user)?;

            let uploader = LocalEtlUploader;
            let response = uploader.upload(&file, endpoint).await?;
            println!(
                "Accepted '{}' for endpoint '{}': job {}",
                response.file_name, endpoint, response.job_id
            );
            Ok(())
        }

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Reset) => {
                    let config = Config::default();
                    config.save()?;
                    println!("Configuration reset to defaults");
                }
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("{}", content);
                }
            }
            Ok(())
        }
    }
}
