//! Editor Errors

use menu_dragdrop::{CollectionError, SessionError};

use crate::models::{ContainerRef, ItemId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    /// A node or container vanished from the model mid-gesture
    #[error("Cannot resolve {0}")]
    Resolution(String),
    #[error("Saving the new order failed: {0}")]
    Persistence(String),
    /// Membership saved, order within the destination not saved
    #[error("{item} moved to {category} but its position was not saved: {reason}")]
    PartialTransfer {
        item: ItemId,
        category: String,
        reason: String,
    },
    #[error("Reloading the menu failed: {0}")]
    Refetch(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("No drag in progress")]
    NoSession,
    #[error("{0} is still saving")]
    ContainerBusy(ContainerRef),
    #[error("Sides of {0} can only be reordered while the item is being edited")]
    NotEditing(ItemId),
    #[error("No item is open for editing")]
    NoEditForm,
    #[error("Invalid menu: {0}")]
    Model(String),
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

pub type ReorderResult<T> = Result<T, ReorderError>;

impl ReorderError {
    /// Errors after which the model can no longer be trusted
    pub fn needs_refetch(&self) -> bool {
        matches!(
            self,
            ReorderError::Resolution(_)
                | ReorderError::Persistence(_)
                | ReorderError::PartialTransfer { .. }
                | ReorderError::Collection(_)
        )
    }
}
