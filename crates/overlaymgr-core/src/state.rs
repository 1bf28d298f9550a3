use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum OverlayState {
    #[default]
    NotApprovedUnknown,
    NotApprovedComponentDisabled,
    NotApprovedMissingTarget,
    NotApprovedNoIdmap,
    NotApprovedDangerousOverlay,
    ApprovedDisabled,
    ApprovedEnabled,
}

impl OverlayState {
    pub const ALL: [OverlayState; 7] = [
        Self::NotApprovedUnknown,
        Self::NotApprovedComponentDisabled,
        Self::NotApprovedMissingTarget,
        Self::NotApprovedNoIdmap,
        Self::NotApprovedDangerousOverlay,
        Self::ApprovedDisabled,
        Self::ApprovedEnabled,
    ];

    pub fn code(self) -> i32 {
        match self {
            Self::NotApprovedUnknown => -1,
            Self::NotApprovedComponentDisabled => 0,
            Self::NotApprovedMissingTarget => 1,
            Self::NotApprovedNoIdmap => 2,
            Self::NotApprovedDangerousOverlay => 3,
            Self::ApprovedDisabled => 4,
            Self::ApprovedEnabled => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotApprovedUnknown => "STATE_NOT_APPROVED_UNKNOWN",
            Self::NotApprovedComponentDisabled => "STATE_NOT_APPROVED_COMPONENT_DISABLED",
            Self::NotApprovedMissingTarget => "STATE_NOT_APPROVED_MISSING_TARGET",
            Self::NotApprovedNoIdmap => "STATE_NOT_APPROVED_NO_IDMAP",
            Self::NotApprovedDangerousOverlay => "STATE_NOT_APPROVED_DANGEROUS_OVERLAY",
            Self::ApprovedDisabled => "STATE_APPROVED_DISABLED",
            Self::ApprovedEnabled => "STATE_APPROVED_ENABLED",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            Self::NotApprovedUnknown => "unknown",
            Self::NotApprovedComponentDisabled => "component-disabled",
            Self::NotApprovedMissingTarget => "missing-target",
            Self::NotApprovedNoIdmap => "no-idmap",
            Self::NotApprovedDangerousOverlay => "dangerous-overlay",
            Self::ApprovedDisabled => "approved-disabled",
            Self::ApprovedEnabled => "approved-enabled",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_ascii_lowercase().replace('_', "-");
        let normalized = normalized
            .strip_prefix("state-")
            .unwrap_or(normalized.as_str());
        let normalized = normalized.strip_prefix("not-approved-").unwrap_or(normalized);
        Self::ALL
            .into_iter()
            .find(|state| state.short_name() == normalized)
    }

    pub fn is_approved(self) -> bool {
        matches!(self, Self::ApprovedDisabled | Self::ApprovedEnabled)
    }
}

impl fmt::Display for OverlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OverlayState> for i32 {
    fn from(state: OverlayState) -> Self {
        state.code()
    }
}

impl TryFrom<i32> for OverlayState {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown overlay state {code}"))
    }
}
