mod codec;
mod dump;
mod entry;
mod error;
mod listener;
mod settings;
mod store;

pub use codec::SETTINGS_FILE_VERSION;
pub use error::{PersistError, SettingsError};
pub use listener::{ChangeListener, SettingsChange};
pub use settings::OverlaySettings;
pub use store::SettingsStore;
