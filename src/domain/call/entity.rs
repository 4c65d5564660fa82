//! Call entities

use crate::domain::shared::value_objects::UserId;
use serde::{Deserialize, Serialize};

/// Remote party of a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// User identifier
    id: UserId,
    /// Name shown in the call surfaces
    display_name: String,
    /// Avatar reference, resolved by the presentation layer
    avatar_ref: Option<String>,
}

impl Participant {
    pub fn new(id: UserId, display_name: String, avatar_ref: Option<String>) -> Self {
        Self {
            id,
            display_name,
            avatar_ref,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn avatar_ref(&self) -> Option<&str> {
        self.avatar_ref.as_deref()
    }
}
