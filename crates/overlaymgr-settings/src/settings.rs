use std::collections::BTreeMap;
use std::sync::Arc;

use overlaymgr_core::{OverlayInfo, OverlayState};

use crate::entry::SettingsEntry;
use crate::listener::{ChangeListener, ChangeNotifier, SettingsChange};
use crate::SettingsError;

pub type Result<T, E = SettingsError> = std::result::Result<T, E>;

/// Ordered overlay registry keyed by `(package_name, user_id)`.
///
/// Iteration order is priority order: later entries win over earlier ones
/// sharing the same target. Access is not synchronized internally; callers
/// serialize mutations themselves.
#[derive(Debug, Default)]
pub struct OverlaySettings {
    pub(crate) entries: Vec<SettingsEntry>,
    notifier: ChangeNotifier,
}

impl OverlaySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(
        &mut self,
        package_name: &str,
        user_id: i32,
        target_package_name: &str,
        base_code_path: &str,
    ) {
        self.remove(package_name, user_id);
        tracing::debug!(
            package_name,
            user_id,
            target_package_name,
            "registering overlay"
        );
        self.entries.push(SettingsEntry::new(
            package_name,
            user_id,
            target_package_name,
            base_code_path,
        ));
    }

    pub fn remove(&mut self, package_name: &str, user_id: i32) {
        let Some(index) = self.position(package_name, user_id) else {
            return;
        };
        let entry = self.entries.remove(index);
        tracing::debug!(package_name, user_id, "removed overlay");
        if let Some(info) = entry.overlay_info() {
            self.notify(SettingsChange::OverlayRemoved {
                info,
                should_wait: false,
            });
        }
    }

    pub fn contains(&self, package_name: &str, user_id: i32) -> bool {
        self.position(package_name, user_id).is_some()
    }

    /// `Ok(None)` means the overlay is registered but currently upgrading.
    pub fn get_overlay_info(
        &self,
        package_name: &str,
        user_id: i32,
    ) -> Result<Option<Arc<OverlayInfo>>> {
        Ok(self.select(package_name, user_id)?.overlay_info())
    }

    pub fn get_target_package_name(&self, package_name: &str, user_id: i32) -> Result<String> {
        Ok(self
            .select(package_name, user_id)?
            .target_package_name()
            .to_string())
    }

    pub fn get_base_code_path(&self, package_name: &str, user_id: i32) -> Result<String> {
        Ok(self
            .select(package_name, user_id)?
            .base_code_path()
            .to_string())
    }

    pub fn set_base_code_path(
        &mut self,
        package_name: &str,
        user_id: i32,
        path: &str,
    ) -> Result<()> {
        if self
            .select_mut(package_name, user_id)?
            .set_base_code_path(path)
        {
            self.notify(SettingsChange::SettingsChanged);
        }
        Ok(())
    }

    pub fn get_upgrading(&self, package_name: &str, user_id: i32) -> Result<bool> {
        Ok(self.select(package_name, user_id)?.is_upgrading())
    }

    pub fn set_upgrading(&mut self, package_name: &str, user_id: i32, upgrading: bool) -> Result<()> {
        let entry = self.select_mut(package_name, user_id)?;
        if entry.is_upgrading() == upgrading {
            return Ok(());
        }

        if upgrading {
            let previous = entry.overlay_info();
            entry.set_upgrading(true);
            entry.set_state(OverlayState::NotApprovedUnknown);
            if let Some(info) = previous {
                self.notify(SettingsChange::OverlayRemoved {
                    info,
                    should_wait: false,
                });
            }
        } else {
            entry.set_upgrading(false);
        }
        self.notify(SettingsChange::SettingsChanged);
        Ok(())
    }

    pub fn get_enabled(&self, package_name: &str, user_id: i32) -> Result<bool> {
        Ok(self.select(package_name, user_id)?.is_enabled())
    }

    // Only a settings-level change: listeners are not told the overlay info
    // changed even though the snapshot now carries the new flag.
    pub fn set_enabled(&mut self, package_name: &str, user_id: i32, enabled: bool) -> Result<()> {
        if self.select_mut(package_name, user_id)?.set_enabled(enabled) {
            self.notify(SettingsChange::SettingsChanged);
        }
        Ok(())
    }

    pub fn get_state(&self, package_name: &str, user_id: i32) -> Result<OverlayState> {
        Ok(self.select(package_name, user_id)?.state())
    }

    pub fn set_state(
        &mut self,
        package_name: &str,
        user_id: i32,
        state: OverlayState,
        should_wait: bool,
    ) -> Result<()> {
        let entry = self.select_mut(package_name, user_id)?;
        // An upgrading entry stays NotApprovedUnknown until the flag clears,
        // so the reinstall's first set_state re-adds it.
        let Some(previous) = entry.overlay_info() else {
            tracing::debug!(
                package_name,
                user_id,
                state = state.as_str(),
                "ignoring state for upgrading overlay"
            );
            return Ok(());
        };
        let changed = entry.set_state(state);
        let Some(current) = entry.overlay_info() else {
            return Ok(());
        };

        if previous.state == OverlayState::NotApprovedUnknown {
            self.notify(SettingsChange::OverlayAdded {
                info: current,
                should_wait,
            });
        } else if changed {
            self.notify(SettingsChange::OverlayChanged {
                info: current,
                previous,
                should_wait,
            });
        } else {
            return Ok(());
        }
        self.notify(SettingsChange::SettingsChanged);
        Ok(())
    }

    pub fn get_overlays_for_target(
        &self,
        target_package_name: &str,
        user_id: i32,
    ) -> Vec<Arc<OverlayInfo>> {
        self.entries
            .iter()
            .filter(|entry| {
                entry.user_id == user_id && entry.target_package_name() == target_package_name
            })
            .filter_map(SettingsEntry::overlay_info)
            .collect()
    }

    pub fn get_overlays_for_user(&self, user_id: i32) -> BTreeMap<String, Vec<Arc<OverlayInfo>>> {
        let mut out: BTreeMap<String, Vec<Arc<OverlayInfo>>> = BTreeMap::new();
        for entry in self.entries.iter().filter(|entry| entry.user_id == user_id) {
            let Some(info) = entry.overlay_info() else {
                continue;
            };
            out.entry(entry.target_package_name().to_string())
                .or_default()
                .push(info);
        }
        out
    }

    pub fn get_target_package_names_for_user(&self, user_id: i32) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for entry in &self.entries {
            if entry.user_id != user_id || entry.is_upgrading() {
                continue;
            }
            let target = entry.target_package_name();
            if !out.iter().any(|seen| seen == target) {
                out.push(target.to_string());
            }
        }
        out
    }

    pub fn get_users(&self) -> Vec<i32> {
        let mut users = Vec::new();
        for entry in &self.entries {
            if !users.contains(&entry.user_id) {
                users.push(entry.user_id);
            }
        }
        users
    }

    pub fn remove_user(&mut self, user_id: i32) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.user_id != user_id);
        tracing::debug!(
            user_id,
            removed = before - self.entries.len(),
            "removed overlays for user"
        );
    }

    pub fn set_priority(
        &mut self,
        package_name: &str,
        new_parent_package_name: &str,
        user_id: i32,
    ) -> bool {
        if package_name == new_parent_package_name {
            return false;
        }
        let Some(index) = self.movable_position(package_name, user_id) else {
            return false;
        };
        let Some(parent_index) = self.movable_position(new_parent_package_name, user_id) else {
            return false;
        };
        if self.entries[index].target_package_name()
            != self.entries[parent_index].target_package_name()
        {
            return false;
        }

        let entry = self.entries.remove(index);
        let Some(parent_index) = self.position(new_parent_package_name, user_id) else {
            tracing::error!(
                package_name,
                new_parent_package_name,
                user_id,
                "failed to find the parent overlay a second time"
            );
            self.entries.insert(index, entry);
            return false;
        };
        self.entries.insert(parent_index + 1, entry);
        tracing::debug!(
            package_name,
            new_parent_package_name,
            user_id,
            "moved overlay above parent"
        );
        self.notify_priority_changed(parent_index + 1);
        true
    }

    pub fn set_lowest_priority(&mut self, package_name: &str, user_id: i32) -> bool {
        let Some(index) = self.movable_position(package_name, user_id) else {
            return false;
        };
        let entry = self.entries.remove(index);
        self.entries.insert(0, entry);
        tracing::debug!(package_name, user_id, "moved overlay to lowest priority");
        self.notify_priority_changed(0);
        true
    }

    pub fn set_highest_priority(&mut self, package_name: &str, user_id: i32) -> bool {
        let Some(index) = self.movable_position(package_name, user_id) else {
            return false;
        };
        let entry = self.entries.remove(index);
        self.entries.push(entry);
        tracing::debug!(package_name, user_id, "moved overlay to highest priority");
        self.notify_priority_changed(self.entries.len() - 1);
        true
    }

    pub fn add_change_listener(&mut self, listener: Arc<dyn ChangeListener>) {
        self.notifier.add(listener);
    }

    pub fn remove_change_listener(&mut self, listener: &Arc<dyn ChangeListener>) -> bool {
        self.notifier.remove(listener)
    }

    pub(crate) fn listeners(&self) -> &[Arc<dyn ChangeListener>] {
        self.notifier.listeners()
    }

    pub(crate) fn replace_entries(&mut self, entries: Vec<SettingsEntry>) {
        self.entries = entries;
    }

    fn notify_priority_changed(&self, index: usize) {
        if let Some(info) = self.entries.get(index).and_then(SettingsEntry::overlay_info) {
            self.notify(SettingsChange::OverlayPriorityChanged { info });
        }
        self.notify(SettingsChange::SettingsChanged);
    }

    fn notify(&self, change: SettingsChange) {
        self.notifier.dispatch(self, &change);
    }

    fn position(&self, package_name: &str, user_id: i32) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.matches(package_name, user_id))
    }

    fn movable_position(&self, package_name: &str, user_id: i32) -> Option<usize> {
        self.position(package_name, user_id)
            .filter(|index| !self.entries[*index].is_upgrading())
    }

    fn select(&self, package_name: &str, user_id: i32) -> Result<&SettingsEntry> {
        self.entries
            .iter()
            .find(|entry| entry.matches(package_name, user_id))
            .ok_or_else(|| SettingsError::bad_key(package_name, user_id))
    }

    fn select_mut(&mut self, package_name: &str, user_id: i32) -> Result<&mut SettingsEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.matches(package_name, user_id))
            .ok_or_else(|| SettingsError::bad_key(package_name, user_id))
    }
}
