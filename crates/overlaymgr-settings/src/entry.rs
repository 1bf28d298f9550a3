use std::sync::{Arc, OnceLock};

use overlaymgr_core::{OverlayInfo, OverlayState};

#[derive(Debug)]
pub(crate) struct SettingsEntry {
    pub(crate) package_name: String,
    pub(crate) user_id: i32,
    target_package_name: String,
    base_code_path: String,
    state: OverlayState,
    is_enabled: bool,
    is_upgrading: bool,
    cache: OnceLock<Arc<OverlayInfo>>,
}

impl SettingsEntry {
    pub(crate) fn new(
        package_name: impl Into<String>,
        user_id: i32,
        target_package_name: impl Into<String>,
        base_code_path: impl Into<String>,
    ) -> Self {
        Self::restored(
            package_name,
            user_id,
            target_package_name,
            base_code_path,
            OverlayState::NotApprovedUnknown,
            false,
            false,
        )
    }

    pub(crate) fn restored(
        package_name: impl Into<String>,
        user_id: i32,
        target_package_name: impl Into<String>,
        base_code_path: impl Into<String>,
        state: OverlayState,
        is_enabled: bool,
        is_upgrading: bool,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            user_id,
            target_package_name: target_package_name.into(),
            base_code_path: base_code_path.into(),
            state,
            is_enabled,
            is_upgrading,
            cache: OnceLock::new(),
        }
    }

    pub(crate) fn matches(&self, package_name: &str, user_id: i32) -> bool {
        self.user_id == user_id && self.package_name == package_name
    }

    pub(crate) fn target_package_name(&self) -> &str {
        &self.target_package_name
    }

    pub(crate) fn base_code_path(&self) -> &str {
        &self.base_code_path
    }

    // Returns whether the path changed.
    pub(crate) fn set_base_code_path(&mut self, path: &str) -> bool {
        if self.base_code_path == path {
            return false;
        }
        self.base_code_path = path.to_string();
        self.invalidate();
        true
    }

    pub(crate) fn state(&self) -> OverlayState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: OverlayState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        self.invalidate();
        true
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.is_enabled == enabled {
            return false;
        }
        self.is_enabled = enabled;
        self.invalidate();
        true
    }

    pub(crate) fn is_upgrading(&self) -> bool {
        self.is_upgrading
    }

    pub(crate) fn set_upgrading(&mut self, upgrading: bool) -> bool {
        if self.is_upgrading == upgrading {
            return false;
        }
        self.is_upgrading = upgrading;
        self.invalidate();
        true
    }

    // Absent while upgrading; otherwise built on first read and shared until
    // the next mutation.
    pub(crate) fn overlay_info(&self) -> Option<Arc<OverlayInfo>> {
        if self.is_upgrading {
            return None;
        }
        let info = self.cache.get_or_init(|| {
            Arc::new(OverlayInfo {
                package_name: self.package_name.clone(),
                target_package_name: self.target_package_name.clone(),
                base_code_path: self.base_code_path.clone(),
                state: self.state,
                is_enabled: self.is_enabled,
                user_id: self.user_id,
            })
        });
        Some(Arc::clone(info))
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    fn invalidate(&mut self) {
        self.cache.take();
    }
}
