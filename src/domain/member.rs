use serde::{Deserialize, Serialize};

/// Identifier assigned by the external bill-splitting service.
///
/// Opaque to this crate; stable within a group once loaded.
pub type MemberId = String;

/// A group member who can pay for or owe a share of an expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}
