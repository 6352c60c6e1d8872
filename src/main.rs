use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::sync::watch;

use smart_tax_advisor::adapters::{
    ConsolePresenter, KeywordTextCleanup, ReplayClassifier, StdinTranscriber, TickFrameSource,
    TracingPresenter,
};
use smart_tax_advisor::application::{KioskRunner, SessionSummary};
use smart_tax_advisor::config::AppConfig;
use smart_tax_advisor::domain::foundation::ErrorCode;
use smart_tax_advisor::domain::questionnaire::{Modality, QuestionnaireController};
use smart_tax_advisor::ports::{Presenter, TextCleanup, Transcriber};

/// Smart Tax Advisor - accessible tax exemption kiosk
#[derive(Parser)]
#[command(name = "smart-tax-advisor", version, about)]
struct Cli {
    /// Input modality (gesture or speech); asked interactively when omitted
    #[arg(short, long)]
    modality: Option<Modality>,

    /// YAML question definitions
    #[arg(long)]
    questions: Option<PathBuf>,

    /// Detection script replayed in place of a camera model
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    json: bool,

    /// Log prompts and results instead of printing them
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    apply_overrides(&mut config, cli);

    init_tracing(&config);

    match run(config).await {
        Ok(summary) => {
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!("could not render summary: {e}"),
            }
            if summary.is_complete() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn apply_overrides(config: &mut AppConfig, cli: Cli) {
    if cli.modality.is_some() {
        config.kiosk.default_modality = cli.modality;
    }
    if cli.questions.is_some() {
        config.kiosk.questions_file = cli.questions;
    }
    if cli.replay.is_some() {
        config.gesture.replay_file = cli.replay;
    }
    config.logging.json |= cli.json;
    config.kiosk.headless |= cli.headless;
}

fn init_tracing(config: &AppConfig) {
    let filter = config.logging.env_filter();
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(config: AppConfig) -> anyhow::Result<SessionSummary> {
    config.validate().context("invalid configuration")?;
    let questions = config.question_set()?;

    let controller = QuestionnaireController::new(questions, config.gesture.stabilizer_settings());
    let presenter: Arc<dyn Presenter> = if config.kiosk.headless {
        Arc::new(TracingPresenter)
    } else {
        Arc::new(ConsolePresenter::stdout())
    };
    let mut runner = KioskRunner::new(controller, presenter, config.runner_config());

    let mut transcriber = StdinTranscriber::stdin(config.speech.max_transcript_len);
    if let Some(timeout) = config.speech.listen_timeout() {
        transcriber = transcriber.with_timeout(timeout);
    }
    let transcriber: Arc<dyn Transcriber> = Arc::new(transcriber);

    let modality = match config.kiosk.default_modality {
        Some(modality) => modality,
        None => match choose_modality(transcriber.as_ref()).await? {
            Some(modality) => modality,
            None => bail!("input closed before a modality was chosen"),
        },
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, ending session");
            shutdown_tx.send_replace(true);
        }
    });

    tracing::info!(%modality, "starting kiosk session");

    let summary = match modality {
        Modality::Speech => {
            let cleanup = config
                .speech
                .enable_cleanup
                .then(|| Arc::new(KeywordTextCleanup::new()) as Arc<dyn TextCleanup>);
            runner.run_speech(transcriber, cleanup, shutdown_rx).await?
        }
        Modality::Gesture => {
            let Some(script) = config.gesture.replay_file.as_ref() else {
                bail!("gesture mode needs a detection script (--replay or SMART_TAX__GESTURE__REPLAY_FILE)");
            };
            let classifier = ReplayClassifier::from_file(script)?;
            let frames = TickFrameSource::new(config.gesture.tick_interval())
                .with_limit(classifier.len() as u64 + 1);
            runner
                .run_gesture(Box::new(frames), Arc::new(classifier), shutdown_rx)
                .await?
        }
    };

    tracing::info!(
        session_id = %summary.session_id,
        outcome = ?summary.outcome,
        rejected = summary.rejected_attempts,
        "session finished"
    );
    Ok(summary)
}

/// Asks on the transcript input until a modality is named.
async fn choose_modality(transcriber: &dyn Transcriber) -> anyhow::Result<Option<Modality>> {
    println!("Choose how to answer: gesture or speech");
    loop {
        match transcriber.listen().await {
            Ok(Some(line)) => match line.parse::<Modality>() {
                Ok(modality) => return Ok(Some(modality)),
                Err(_) => println!("Please type gesture or speech"),
            },
            Ok(None) => continue,
            Err(e) if e.code == ErrorCode::InputClosed => return Ok(None),
            Err(e) => return Err(e.into()),
        }
    }
}
