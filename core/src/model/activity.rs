use serde::{Deserialize, Serialize};

/// A user-defined habit tracked per day. The id is an opaque identifier
/// minted by the backend; the client never generates or interprets it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: String,
    pub name: String,
}

impl Activity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
