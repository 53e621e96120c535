use anyhow::Result;
use tokio::sync::watch;
use tokio::time::{interval, Duration};

use crate::core::state::AppState;
use crate::tasks::maintenance;

pub(crate) async fn run(state: AppState) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut handles = Vec::with_capacity(2);
    handles.push(tokio::spawn(close_timed_out_loop(state.clone(), shutdown_rx.clone())));

    if state.settings().sessions().auto_scoring_enabled {
        handles.push(tokio::spawn(score_finished_loop(state.clone(), shutdown_rx.clone())));
    } else {
        tracing::info!("Automatic scoring disabled");
    }

    crate::core::shutdown::shutdown_signal().await;
    if shutdown_tx.send(true).is_err() {
        tracing::warn!("Failed to broadcast shutdown signal to background tasks");
    }

    for handle in handles {
        if let Err(err) = handle.await {
            tracing::error!(error = %err, "Background task join failed");
        }
    }

    Ok(())
}

async fn close_timed_out_loop(state: AppState, mut shutdown: watch::Receiver<bool>) {
    let period = state.settings().sessions().timeout_sweep_interval_seconds;
    let mut tick = interval(Duration::from_secs(period));
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tick.tick() => {
                if let Err(err) = maintenance::close_timed_out_sessions(&state).await {
                    tracing::error!(error = %err, "close_timed_out_sessions failed");
                }
            }
        }
    }
}

async fn score_finished_loop(state: AppState, mut shutdown: watch::Receiver<bool>) {
    let period = state.settings().sessions().scoring_sweep_interval_seconds;
    let mut tick = interval(Duration::from_secs(period));
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tick.tick() => {
                if let Err(err) = maintenance::score_finished_sessions(&state).await {
                    tracing::error!(error = %err, "score_finished_sessions failed");
                }
            }
        }
    }
}
