//! Commit Engine
//!
//! Turns the end of a gesture into the smallest set of store calls.
//! Cross-category moves need two calls (membership, then order) and the store
//! has no transactions spanning them, so a failure anywhere stops the sequence
//! and the caller reloads from the store instead of retrying piecemeal.

use crate::commands::MenuApi;
use crate::config::EditorConfig;
use crate::error::{ReorderError, ReorderResult};
use crate::form::{EditForm, SideDraft};
use crate::models::{CategoryId, ContainerRef, ItemId, NodeRef};
use crate::resolver::index_of;
use crate::session::DragSession;
use crate::store::HierarchyModel;

/// One write against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistCall {
    SetCategoryOrder(Vec<CategoryId>),
    SetItemOrder {
        category: CategoryId,
        items: Vec<ItemId>,
    },
    SetItemCategory {
        item: ItemId,
        category: CategoryId,
    },
}

impl PersistCall {
    async fn send<A: MenuApi + ?Sized>(&self, api: &A) -> Result<(), String> {
        match self {
            PersistCall::SetCategoryOrder(order) => api.set_category_order(order).await,
            PersistCall::SetItemOrder { category, items } => api.set_item_order(category, items).await,
            PersistCall::SetItemCategory { item, category } => api.set_item_category(item, category).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitPlan {
    /// Dropped where it started
    Unchanged,
    /// Calls to run in order; `touched` are promoted to canonical on success
    Persist {
        calls: Vec<PersistCall>,
        touched: Vec<ContainerRef>,
    },
    /// Side order stays in the edit form until the form is saved
    KeepDraft(SideDraft),
    /// Dropped outside any target
    Abandon { refetch: bool },
}

/// Diff the final position of the session's node against its origin.
///
/// `dropped` is false when the gesture ended without a target.
pub fn plan_commit(
    session: &DragSession,
    model: &HierarchyModel,
    form: Option<&EditForm>,
    dropped: bool,
    config: &EditorConfig,
) -> ReorderResult<CommitPlan> {
    if !dropped {
        return Ok(CommitPlan::Abandon { refetch: config.refetch_on_abandon });
    }

    let unresolved = || ReorderError::Resolution(session.node.to_string());

    match &session.node {
        NodeRef::Category(id) => {
            let index = model.category_order().position(id).ok_or_else(unresolved)?;
            if index == session.origin_index {
                return Ok(CommitPlan::Unchanged);
            }
            Ok(CommitPlan::Persist {
                calls: vec![PersistCall::SetCategoryOrder(model.category_order().ids_in_order())],
                touched: vec![ContainerRef::Menu],
            })
        }
        NodeRef::Item(id) => {
            let current = model.category_of(id).cloned().ok_or_else(unresolved)?;
            let destination = ContainerRef::Category(current.clone());
            let items = model.item_ids(&current).ok_or_else(unresolved)?;

            if destination == session.origin {
                let index = index_of(&session.node, model).ok_or_else(unresolved)?;
                if index == session.origin_index {
                    return Ok(CommitPlan::Unchanged);
                }
                return Ok(CommitPlan::Persist {
                    calls: vec![PersistCall::SetItemOrder { category: current, items }],
                    touched: vec![destination],
                });
            }

            let mut calls = vec![
                PersistCall::SetItemCategory { item: id.clone(), category: current.clone() },
                PersistCall::SetItemOrder { category: current, items },
            ];
            if config.persist_source_order_on_transfer {
                if let ContainerRef::Category(source) = &session.origin {
                    let remaining = model.item_ids(source).ok_or_else(unresolved)?;
                    // An emptied source has nothing to order
                    if !remaining.is_empty() {
                        calls.push(PersistCall::SetItemOrder { category: source.clone(), items: remaining });
                    }
                }
            }
            Ok(CommitPlan::Persist {
                calls,
                touched: vec![session.origin.clone(), destination],
            })
        }
        NodeRef::Side { item, side } => {
            let form = form
                .filter(|form| form.item() == item)
                .ok_or_else(|| ReorderError::NotEditing(item.clone()))?;
            let index = form.sides().position(side).ok_or_else(unresolved)?;
            if index == session.origin_index {
                return Ok(CommitPlan::Unchanged);
            }
            Ok(CommitPlan::KeepDraft(form.draft()))
        }
    }
}

/// Put the session's node back where it was picked up
pub fn restore_origin(
    session: &DragSession,
    model: &mut HierarchyModel,
    form: Option<&mut EditForm>,
) -> ReorderResult<()> {
    let unresolved = || ReorderError::Resolution(session.node.to_string());

    match &session.node {
        NodeRef::Category(id) => {
            let order = model.category_order_mut();
            let from = order.position(id).ok_or_else(unresolved)?;
            order.move_within(from, session.origin_index)?;
        }
        NodeRef::Item(id) => {
            let ContainerRef::Category(origin) = &session.origin else {
                return Err(unresolved());
            };
            let current = model.category_of(id).cloned().ok_or_else(unresolved)?;
            if &current == origin {
                let items = model.items_mut(origin).ok_or_else(unresolved)?;
                let from = items.position(id).ok_or_else(unresolved)?;
                items.move_within(from, session.origin_index)?;
            } else {
                let mut record = model
                    .items_mut(&current)
                    .and_then(|items| items.remove_by_id(id))
                    .ok_or_else(unresolved)?;
                record.category = origin.clone();
                let items = model.items_mut(origin).ok_or_else(unresolved)?;
                let index = session.origin_index.min(items.len());
                items.insert_at(index, record)?;
            }
        }
        NodeRef::Side { item, side } => {
            let form = form
                .filter(|form| form.item() == item)
                .ok_or_else(|| ReorderError::NotEditing(item.clone()))?;
            let sides = form.sides_mut();
            let from = sides.position(side).ok_or_else(unresolved)?;
            sides.move_within(from, session.origin_index)?;
        }
    }
    Ok(())
}

/// Run `calls` in order, stopping at the first failure
pub async fn execute<A: MenuApi + ?Sized>(api: &A, calls: &[PersistCall]) -> ReorderResult<()> {
    let mut moved: Option<(&ItemId, &CategoryId)> = None;

    for call in calls {
        if let Err(reason) = call.send(api).await {
            log::warn!("{:?} failed: {}", call, reason);
            return Err(match moved {
                Some((item, category)) => ReorderError::PartialTransfer {
                    item: item.clone(),
                    category: category.clone(),
                    reason,
                },
                None => ReorderError::Persistence(reason),
            });
        }
        log::debug!("{:?} saved", call);
        if let PersistCall::SetItemCategory { item, category } = call {
            moved = Some((item, category));
        }
    }
    Ok(())
}
