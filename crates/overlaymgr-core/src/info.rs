use std::fmt;

use serde::{Deserialize, Serialize};

use crate::OverlayState;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayKey {
    pub package_name: String,
    pub user_id: i32,
}

impl OverlayKey {
    pub fn new(package_name: impl Into<String>, user_id: i32) -> Self {
        Self {
            package_name: package_name.into(),
            user_id,
        }
    }
}

impl fmt::Display for OverlayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package_name, self.user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayInfo {
    pub package_name: String,
    pub target_package_name: String,
    pub base_code_path: String,
    pub state: OverlayState,
    pub is_enabled: bool,
    pub user_id: i32,
}

impl OverlayInfo {
    pub fn key(&self) -> OverlayKey {
        OverlayKey::new(self.package_name.clone(), self.user_id)
    }

    pub fn is_approved(&self) -> bool {
        self.state.is_approved()
    }
}

impl fmt::Display for OverlayInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OverlayInfo {{ overlay={}, target={}, state={}, enabled={}, user={} }}",
            self.package_name, self.target_package_name, self.state, self.is_enabled, self.user_id
        )
    }
}
