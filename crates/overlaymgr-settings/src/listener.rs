use std::fmt;
use std::sync::Arc;

use overlaymgr_core::OverlayInfo;

use crate::OverlaySettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsChange {
    SettingsChanged,
    OverlayAdded {
        info: Arc<OverlayInfo>,
        should_wait: bool,
    },
    OverlayRemoved {
        info: Arc<OverlayInfo>,
        should_wait: bool,
    },
    OverlayChanged {
        info: Arc<OverlayInfo>,
        previous: Arc<OverlayInfo>,
        should_wait: bool,
    },
    OverlayPriorityChanged {
        info: Arc<OverlayInfo>,
    },
}

impl SettingsChange {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SettingsChanged => "settings-changed",
            Self::OverlayAdded { .. } => "overlay-added",
            Self::OverlayRemoved { .. } => "overlay-removed",
            Self::OverlayChanged { .. } => "overlay-changed",
            Self::OverlayPriorityChanged { .. } => "overlay-priority-changed",
        }
    }

    pub fn info(&self) -> Option<&OverlayInfo> {
        match self {
            Self::SettingsChanged => None,
            Self::OverlayAdded { info, .. }
            | Self::OverlayRemoved { info, .. }
            | Self::OverlayChanged { info, .. }
            | Self::OverlayPriorityChanged { info } => Some(info),
        }
    }
}

/// Receives every committed change to an [`OverlaySettings`] registry.
///
/// Callbacks run synchronously on the mutating thread, in registration
/// order, after the mutation is visible through `settings`. The registry is
/// only borrowed shared for the duration of the callback, so a listener
/// that needs to mutate it in response has to defer that work until the
/// originating call returns.
pub trait ChangeListener: fmt::Debug + Send + Sync {
    fn on_change(&self, settings: &OverlaySettings, change: &SettingsChange);
}

#[derive(Debug, Default)]
pub(crate) struct ChangeNotifier {
    listeners: Vec<Arc<dyn ChangeListener>>,
}

impl ChangeNotifier {
    pub(crate) fn add(&mut self, listener: Arc<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    pub(crate) fn remove(&mut self, listener: &Arc<dyn ChangeListener>) -> bool {
        let Some(index) = self
            .listeners
            .iter()
            .position(|existing| Arc::ptr_eq(existing, listener))
        else {
            return false;
        };
        self.listeners.remove(index);
        true
    }

    pub(crate) fn listeners(&self) -> &[Arc<dyn ChangeListener>] {
        &self.listeners
    }

    pub(crate) fn dispatch(&self, settings: &OverlaySettings, change: &SettingsChange) {
        for listener in &self.listeners {
            listener.on_change(settings, change);
        }
    }
}
