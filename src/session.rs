//! Drag Session
//!
//! What is being dragged and where it started. Passed explicitly to every
//! transition instead of living in ambient "active"/"over" state.

use crate::error::{ReorderError, ReorderResult};
use crate::form::EditForm;
use crate::models::{ContainerRef, NodeKind, NodeRef};
use crate::resolver::{index_of, owning_container};
use crate::store::HierarchyModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub node: NodeRef,
    /// List the node was picked up from
    pub origin: ContainerRef,
    pub origin_index: usize,
}

impl DragSession {
    /// Record where `node` currently sits.
    ///
    /// Side nodes start from the edit form's draft and need their item open in `form`.
    pub fn open(node: NodeRef, model: &HierarchyModel, form: Option<&EditForm>) -> ReorderResult<Self> {
        if let NodeRef::Side { item, side } = &node {
            let form = form
                .filter(|form| form.item() == item)
                .ok_or_else(|| ReorderError::NotEditing(item.clone()))?;
            let origin_index = form
                .sides()
                .position(side)
                .ok_or_else(|| ReorderError::Resolution(node.to_string()))?;
            return Ok(Self {
                origin: ContainerRef::Item(item.clone()),
                node,
                origin_index,
            });
        }

        let origin = owning_container(&node, model)
            .ok_or_else(|| ReorderError::Resolution(node.to_string()))?;
        let origin_index =
            index_of(&node, model).ok_or_else(|| ReorderError::Resolution(node.to_string()))?;
        Ok(Self { node, origin, origin_index })
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }
}
