use tracing_subscriber::EnvFilter;

use crate::{ChangeListener, OverlaySettings, SettingsChange};

const LOG_ENV: &str = "OVERLAYMGR_LOG";

pub(crate) fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Default)]
pub(crate) struct LoggingListener;

impl ChangeListener for LoggingListener {
    fn on_change(&self, _settings: &OverlaySettings, change: &SettingsChange) {
        match change.info() {
            Some(info) => tracing::info!(
                change = change.kind(),
                overlay = %info.key(),
                target_package_name = %info.target_package_name,
                state = info.state.as_str(),
                "overlay settings changed"
            ),
            None => tracing::info!(change = change.kind(), "overlay settings changed"),
        }
    }
}
