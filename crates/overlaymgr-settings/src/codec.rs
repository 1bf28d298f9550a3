use std::collections::HashSet;
use std::io::{Read, Write};

use overlaymgr_core::{OverlayKey, OverlayState};
use serde::{Deserialize, Serialize};

use crate::entry::SettingsEntry;
use crate::{OverlaySettings, PersistError};

pub const SETTINGS_FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    version: u32,
    #[serde(rename = "item", default)]
    items: Vec<SettingsRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsRecord {
    package_name: String,
    user_id: i32,
    target_package_name: String,
    base_code_path: String,
    state: i32,
    is_enabled: bool,
    is_upgrading: bool,
}

impl From<&SettingsEntry> for SettingsRecord {
    fn from(entry: &SettingsEntry) -> Self {
        Self {
            package_name: entry.package_name.clone(),
            user_id: entry.user_id,
            target_package_name: entry.target_package_name().to_string(),
            base_code_path: entry.base_code_path().to_string(),
            state: entry.state().code(),
            is_enabled: entry.is_enabled(),
            is_upgrading: entry.is_upgrading(),
        }
    }
}

impl TryFrom<SettingsRecord> for SettingsEntry {
    type Error = PersistError;

    fn try_from(record: SettingsRecord) -> Result<Self, Self::Error> {
        let Some(state) = OverlayState::from_code(record.state) else {
            return Err(PersistError::UnknownState {
                package_name: record.package_name,
                user_id: record.user_id,
                state: record.state,
            });
        };
        Ok(SettingsEntry::restored(
            record.package_name,
            record.user_id,
            record.target_package_name,
            record.base_code_path,
            state,
            record.is_enabled,
            record.is_upgrading,
        ))
    }
}

impl OverlaySettings {
    /// Replaces every entry with the ones read from `reader`, in file order.
    ///
    /// Nothing is applied unless the whole document is valid, and no change
    /// events are dispatched.
    pub fn restore<R: Read>(&mut self, mut reader: R) -> Result<(), PersistError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let entries = parse_settings_file(&content)?;
        tracing::debug!(entries = entries.len(), "restored overlay settings");
        self.replace_entries(entries);
        Ok(())
    }

    pub fn persist<W: Write>(&self, mut writer: W) -> Result<(), PersistError> {
        let content = render_settings_file(self)?;
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        tracing::debug!(entries = self.entries.len(), "persisted overlay settings");
        Ok(())
    }
}

pub(crate) fn parse_settings_file(content: &str) -> Result<Vec<SettingsEntry>, PersistError> {
    let value = toml::from_str::<toml::Value>(content)?;
    match value.get("version").and_then(toml::Value::as_integer) {
        Some(found) if found == i64::from(SETTINGS_FILE_VERSION) => {}
        Some(found) => {
            return Err(PersistError::UnsupportedVersion {
                found,
                expected: SETTINGS_FILE_VERSION,
            });
        }
        None => return Err(PersistError::MissingVersion),
    }

    let file = value.try_into::<SettingsFile>()?;
    let mut seen: HashSet<OverlayKey> = HashSet::with_capacity(file.items.len());
    let mut entries = Vec::with_capacity(file.items.len());
    for record in file.items {
        let key = OverlayKey::new(record.package_name.as_str(), record.user_id);
        if seen.contains(&key) {
            return Err(PersistError::DuplicateItem { key });
        }
        seen.insert(key);
        entries.push(SettingsEntry::try_from(record)?);
    }
    Ok(entries)
}

pub(crate) fn render_settings_file(settings: &OverlaySettings) -> Result<String, PersistError> {
    let file = SettingsFile {
        version: SETTINGS_FILE_VERSION,
        items: settings.entries.iter().map(SettingsRecord::from).collect(),
    };
    Ok(toml::to_string(&file)?)
}
