mod info;
mod state;

pub use info::{OverlayInfo, OverlayKey};
pub use state::OverlayState;
