use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::OverlaySettings;

const SETTINGS_FILE_NAME: &str = "overlays.toml";

#[derive(Debug, Clone)]
pub struct SettingsStore {
    state_root: PathBuf,
}

impl SettingsStore {
    pub fn new(state_root: impl Into<PathBuf>) -> Self {
        Self {
            state_root: state_root.into(),
        }
    }

    pub fn state_root(&self) -> &Path {
        &self.state_root
    }

    pub fn settings_file_path(&self) -> PathBuf {
        self.state_root.join(SETTINGS_FILE_NAME)
    }

    pub fn load(&self) -> Result<OverlaySettings> {
        let mut settings = OverlaySettings::new();
        self.load_into(&mut settings)?;
        Ok(settings)
    }

    // Keeps the listeners already registered on `settings`.
    pub fn load_into(&self, settings: &mut OverlaySettings) -> Result<()> {
        let path = self.settings_file_path();
        if !path.exists() {
            settings.replace_entries(Vec::new());
            return Ok(());
        }

        let file = File::open(&path)
            .with_context(|| format!("failed reading overlay settings: {}", path.display()))?;
        settings
            .restore(file)
            .with_context(|| format!("failed parsing overlay settings: {}", path.display()))
    }

    pub fn save(&self, settings: &OverlaySettings) -> Result<()> {
        fs::create_dir_all(&self.state_root).with_context(|| {
            format!(
                "failed creating overlay state root: {}",
                self.state_root.display()
            )
        })?;

        let path = self.settings_file_path();
        let staging_path = self.state_root.join(format!("{SETTINGS_FILE_NAME}.new"));
        let mut content = Vec::new();
        settings
            .persist(&mut content)
            .with_context(|| format!("failed serializing overlay settings: {}", path.display()))?;
        fs::write(&staging_path, content).with_context(|| {
            format!(
                "failed writing overlay settings: {}",
                staging_path.display()
            )
        })?;
        fs::rename(&staging_path, &path).with_context(|| {
            format!(
                "failed replacing overlay settings: {} -> {}",
                staging_path.display(),
                path.display()
            )
        })
    }
}
