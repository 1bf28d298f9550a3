use overlaymgr_core::OverlayKey;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("bad key packageName={} userId={}", .key.package_name, .key.user_id)]
    BadKey { key: OverlayKey },
}

impl SettingsError {
    pub(crate) fn bad_key(package_name: &str, user_id: i32) -> Self {
        Self::BadKey {
            key: OverlayKey::new(package_name, user_id),
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed accessing overlay settings stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed overlay settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed serializing overlay settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("overlay settings are missing an integer version attribute")]
    MissingVersion,
    #[error("unrecognized version {found} (expected {expected})")]
    UnsupportedVersion { found: i64, expected: u32 },
    #[error("unknown overlay state {state} for {package_name}:{user_id}")]
    UnknownState {
        package_name: String,
        user_id: i32,
        state: i32,
    },
    #[error("duplicate overlay item {key}")]
    DuplicateItem { key: OverlayKey },
}
