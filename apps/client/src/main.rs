use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ats_client::config::Config;
use ats_client::models::DocumentHandle;
use ats_client::render::{render_history, render_session};
use ats_client::session::LifecyclePhase;
use ats_client::{HttpScanService, Session, SessionDriver};

#[derive(Debug, Parser)]
#[command(name = "ats-client", version, about = "Score a résumé against a job description")]
struct Cli {
    /// Base URL of the scan service (overrides ATS_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan a résumé, optionally requesting AI suggestions alongside
    Scan {
        #[command(flatten)]
        inputs: InputArgs,
        /// Also request the AI improvement report
        #[arg(long)]
        ai: bool,
    },
    /// Request only the AI improvement report
    Ai {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// List recent scans
    History,
    /// Open a past scan by id
    Show { id: String },
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Résumé PDF
    #[arg(long)]
    resume: Option<PathBuf>,
    /// File containing the job description
    #[arg(long, conflicts_with = "job_text")]
    job_file: Option<PathBuf>,
    /// Job description text
    #[arg(long)]
    job_text: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }

    // Logs go to stderr so rendered output stays clean on stdout
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting ATS client v{}", env!("CARGO_PKG_VERSION"));

    let service = HttpScanService::new(config.api_base.clone(), config.request_timeout)
        .context("Failed to build HTTP client")?;
    info!(
        "Scan service at {} (timeout {}s)",
        service.base_url(),
        config.request_timeout.as_secs()
    );

    let mut driver = SessionDriver::new(Session::new(config.features), Arc::new(service));

    let succeeded = match cli.command {
        Command::Scan { inputs, ai } => {
            stage(&mut driver, &inputs).await?;
            driver.submit_scan();
            if ai {
                driver.submit_ai();
            }
            driver.run_until_idle().await;

            let session = driver.session();
            print!("{}", render_session(session));
            if session.scan_phase() == LifecyclePhase::Succeeded && !session.history().is_empty()
            {
                println!("\n== Recent Scans ==");
                print!(
                    "{}",
                    render_history(session.history().entries(), config.history_limit)
                );
            }
            session.scan_phase() == LifecyclePhase::Succeeded
                && session.ai_phase() != LifecyclePhase::Failed
        }
        Command::Ai { inputs } => {
            stage(&mut driver, &inputs).await?;
            driver.submit_ai();
            driver.run_until_idle().await;

            print!("{}", render_session(driver.session()));
            driver.session().ai_phase() == LifecyclePhase::Succeeded
        }
        Command::History => {
            driver.start();
            driver.run_until_idle().await;

            let history = driver.session().history();
            if let Some(error) = history.last_refresh_error() {
                eprintln!("{error}");
                false
            } else {
                print!("{}", render_history(history.entries(), config.history_limit));
                true
            }
        }
        Command::Show { id } => {
            driver.open_entry(&id);
            driver.run_until_idle().await;

            let session = driver.session();
            print!("{}", render_session(session));
            session.history().open_error().is_none() && session.current_scan().is_some()
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Loads the CLI inputs into the session. Missing inputs are left empty so
/// the session reports them with its own validation messages.
async fn stage(driver: &mut SessionDriver, inputs: &InputArgs) -> Result<()> {
    if let Some(path) = &inputs.resume {
        let document = DocumentHandle::from_path(path)
            .await
            .with_context(|| format!("Failed to read résumé '{}'", path.display()))?;
        info!(
            "Loaded {} ({} bytes)",
            document.file_name(),
            document.len()
        );
        driver.set_document(Some(document));
    }

    if let Some(path) = &inputs.job_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description '{}'", path.display()))?;
        driver.set_job_description(text);
    } else if let Some(text) = &inputs.job_text {
        driver.set_job_description(text.clone());
    }

    Ok(())
}
