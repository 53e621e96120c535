use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) const SESSIONS_STARTED: &str = "exam_sessions_started_total";
pub(crate) const ANSWERS_SUBMITTED: &str = "exam_answers_submitted_total";
pub(crate) const SESSIONS_FINISHED: &str = "exam_sessions_finished_total";
pub(crate) const SESSIONS_TIMED_OUT: &str = "exam_sessions_timed_out_total";
pub(crate) const SCORES_CREATED: &str = "exam_scores_created_total";

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    // A second install (tests building several routers) keeps the first handle.
    if PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}
