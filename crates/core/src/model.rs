#![forbid(unsafe_code)]

/// Sites offered by the directory UI. Stored branches are free text and are
/// never checked against this list.
pub const KNOWN_BRANCHES: &[&str] = &["ankara merkez", "ankara ek", "istanbul"];

pub fn is_known_branch(value: &str) -> bool {
    let value = value.trim();
    KNOWN_BRANCHES.iter().any(|candidate| *candidate == value)
}

/// Where a sticker unit currently sits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CustodyState {
    Unassigned,
    Assigned { owner: String },
}

impl CustodyState {
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::Unassigned => None,
            Self::Assigned { owner } => Some(owner),
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned { .. })
    }
}

/// Result of a transfer: a fresh assignment, or a move away from the previous holder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    Assigned,
    ReassignedFrom { previous_owner: String },
}

impl TransferOutcome {
    pub fn previous_owner(&self) -> Option<&str> {
        match self {
            Self::Assigned => None,
            Self::ReassignedFrom { previous_owner } => Some(previous_owner),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::ReassignedFrom { .. } => "reassigned",
        }
    }
}
