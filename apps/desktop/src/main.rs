use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    HttpSubmitter, MoodClient, PlaylistSubmissionController, SimulatedSubmitter, SubmissionObserver,
    SubmitCollaborator, SubmitOutcome, VisualizationClient,
};
use shared::domain::{FailureReason, SubmissionState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Spotify playlist url to share.
    #[arg(long)]
    url: String,
    /// Backend base url; without it processing is simulated locally.
    #[arg(long, env = "PLAYLIST_SERVER_URL")]
    server_url: Option<String>,
    #[arg(long, default_value_t = 3000)]
    delay_ms: u64,
    /// Make the simulated backend fail, to exercise the error path.
    #[arg(long)]
    simulate_failure: bool,
    /// Where to write the visualization PNG (requires --server-url).
    #[arg(long)]
    visualization_out: Option<PathBuf>,
    /// Print the room's current mood after sharing (requires --server-url).
    #[arg(long)]
    show_mood: bool,
}

struct ConsoleObserver;

impl SubmissionObserver for ConsoleObserver {
    fn on_state_change(&self, state: &SubmissionState) {
        match state {
            SubmissionState::Idle => {}
            SubmissionState::Submitting => println!("Analyzing your playlist..."),
            SubmissionState::Succeeded => {
                println!("Playlist Added!");
                println!("Your musical vibes are now part of our community.");
            }
            SubmissionState::Failed(_) => {}
        }
    }

    fn on_error(&self, reason: FailureReason, message: &str) {
        eprintln!("{message} ({reason})");
    }
}

fn build_collaborator(args: &Args) -> Result<Arc<dyn SubmitCollaborator>> {
    let delay = Duration::from_millis(args.delay_ms);
    let collaborator: Arc<dyn SubmitCollaborator> = match (&args.server_url, args.simulate_failure)
    {
        (Some(server_url), false) => Arc::new(HttpSubmitter::new(server_url)?),
        (Some(_), true) => bail!("--simulate-failure only applies without --server-url"),
        (None, false) => Arc::new(SimulatedSubmitter::new(delay)),
        (None, true) => Arc::new(SimulatedSubmitter::failing(delay, "backend unavailable")),
    };
    Ok(collaborator)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();
    if args.visualization_out.is_some() && args.server_url.is_none() {
        bail!("--visualization-out requires --server-url");
    }
    if args.show_mood && args.server_url.is_none() {
        bail!("--show-mood requires --server-url");
    }

    let controller = PlaylistSubmissionController::new_with_observer(
        build_collaborator(&args)?,
        Arc::new(ConsoleObserver),
    );
    controller.set_url(args.url.as_str()).await;

    match controller.submit().await {
        SubmitOutcome::Completed(SubmissionState::Succeeded) => {}
        SubmitOutcome::Completed(state) | SubmitOutcome::Ignored(state) => {
            bail!("playlist was not shared (state: {state:?})")
        }
    }

    if let (Some(server_url), Some(out)) = (&args.server_url, &args.visualization_out) {
        let visualization = VisualizationClient::new(server_url)?
            .fetch()
            .await
            .context("failed to load visualization")?;
        tokio::fs::write(out, visualization.png_bytes())
            .await
            .with_context(|| format!("failed to write {}", out.display()))?;
        info!(
            path = %out.display(),
            bytes = visualization.png_bytes().len(),
            "visualization saved"
        );
        println!("Visualization written to {}", out.display());
    }

    if let (Some(server_url), true) = (&args.server_url, args.show_mood) {
        let mood = MoodClient::new(server_url)?.current_mood().await;
        println!("Current mood: {mood:.2}");
    }

    Ok(())
}
