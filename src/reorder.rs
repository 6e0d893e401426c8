//! Live Reorderer
//!
//! Applies "dragged over X" events to the provisional model while a gesture is
//! in progress. Nothing here talks to the store.

use std::collections::HashSet;

use menu_dragdrop::{insert_index, reorder_index, DragOver, DropTarget, Keyed, OrderedCollection};

use crate::error::{ReorderError, ReorderResult};
use crate::form::EditForm;
use crate::models::{CategoryId, ContainerRef, ItemId, NodeRef, SideName};
use crate::session::DragSession;
use crate::store::HierarchyModel;

/// Over-event for menu nodes
pub type MenuDragOver = DragOver<NodeRef, ContainerRef>;

/// What an over-event did to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Moved {
        container: ContainerRef,
        from: usize,
        to: usize,
    },
    Transferred {
        from: ContainerRef,
        to: ContainerRef,
        index: usize,
    },
    /// Target not valid for this kind of node, or its container is saving
    Ignored,
}

pub struct LiveReorderer<'a> {
    in_flight: &'a HashSet<ContainerRef>,
}

impl<'a> LiveReorderer<'a> {
    /// Transfers into any container in `in_flight` are refused
    pub fn new(in_flight: &'a HashSet<ContainerRef>) -> Self {
        Self { in_flight }
    }

    pub fn apply(
        &self,
        session: &DragSession,
        event: &MenuDragOver,
        model: &mut HierarchyModel,
        form: Option<&mut EditForm>,
    ) -> ReorderResult<Transition> {
        if let DropTarget::Node(node) = &event.target {
            if *node == session.node {
                return Ok(Transition::Unchanged);
            }
        }

        let transition = match &session.node {
            NodeRef::Category(id) => self.category_over(id, event, model)?,
            NodeRef::Item(id) => self.item_over(id, event, model)?,
            NodeRef::Side { item, side } => side_over(item, side, event, form)?,
        };
        log::debug!("{} over {:?}: {:?}", session.node, event.target, transition);
        Ok(transition)
    }

    fn category_over(
        &self,
        id: &CategoryId,
        event: &MenuDragOver,
        model: &mut HierarchyModel,
    ) -> ReorderResult<Transition> {
        let order = model.category_order_mut();
        let from = order.position(id).ok_or_else(|| unresolved("category", id))?;
        let to = match &event.target {
            DropTarget::Node(NodeRef::Category(over)) => {
                let over_index = order.position(over).ok_or_else(|| unresolved("category", over))?;
                reorder_index(from, over_index, event.hint)
            }
            DropTarget::Container(ContainerRef::Menu) => order.len() - 1,
            _ => return Ok(Transition::Ignored),
        };
        move_in(ContainerRef::Menu, order, from, to)
    }

    /// Hovering an item's own category moves it to the end. Within one
    /// collection that is `len - 1`, the last slot once the item is lifted out;
    /// a transfer inserts at `len` of the destination.
    fn item_over(
        &self,
        id: &ItemId,
        event: &MenuDragOver,
        model: &mut HierarchyModel,
    ) -> ReorderResult<Transition> {
        let active = model
            .category_of(id)
            .cloned()
            .ok_or_else(|| unresolved("item", id))?;

        let (over, over_item) = match &event.target {
            DropTarget::Node(NodeRef::Item(other)) => {
                let category = model
                    .category_of(other)
                    .cloned()
                    .ok_or_else(|| unresolved("item", other))?;
                (category, Some(other.clone()))
            }
            DropTarget::Node(NodeRef::Category(category))
            | DropTarget::Container(ContainerRef::Category(category)) => {
                if !model.has_category(category) {
                    return Err(unresolved("category", category));
                }
                (category.clone(), None)
            }
            _ => return Ok(Transition::Ignored),
        };

        if over == active {
            let items = model
                .items_mut(&active)
                .ok_or_else(|| unresolved("category", &active))?;
            let from = items.position(id).ok_or_else(|| unresolved("item", id))?;
            let to = match over_item {
                Some(other) => {
                    let over_index = items.position(&other).ok_or_else(|| unresolved("item", &other))?;
                    reorder_index(from, over_index, event.hint)
                }
                None => items.len() - 1,
            };
            return move_in(ContainerRef::Category(active), items, from, to);
        }

        let destination = ContainerRef::Category(over.clone());
        if self.in_flight.contains(&destination) {
            log::debug!("{} is saving, not moving {} into it", destination, id);
            return Ok(Transition::Ignored);
        }

        let index = {
            let items = model.items(&over).ok_or_else(|| unresolved("category", &over))?;
            let over_index = match &over_item {
                Some(other) => Some(items.position(other).ok_or_else(|| unresolved("item", other))?),
                None => None,
            };
            insert_index(over_index, event.hint, items.len())
        };

        let mut record = model
            .items_mut(&active)
            .and_then(|items| items.remove_by_id(id))
            .ok_or_else(|| unresolved("item", id))?;
        record.category = over.clone();
        model
            .items_mut(&over)
            .ok_or_else(|| unresolved("category", &over))?
            .insert_at(index, record)?;

        Ok(Transition::Transferred {
            from: ContainerRef::Category(active),
            to: destination,
            index,
        })
    }
}

fn side_over(
    item: &ItemId,
    side: &SideName,
    event: &MenuDragOver,
    form: Option<&mut EditForm>,
) -> ReorderResult<Transition> {
    let form = form
        .filter(|form| form.item() == item)
        .ok_or_else(|| ReorderError::NotEditing(item.clone()))?;

    let sides = form.sides_mut();
    let from = sides.position(side).ok_or_else(|| unresolved("side", side))?;
    let to = match &event.target {
        DropTarget::Node(NodeRef::Side { item: owner, side: over }) if owner == item => {
            let over_index = sides.position(over).ok_or_else(|| unresolved("side", over))?;
            reorder_index(from, over_index, event.hint)
        }
        DropTarget::Container(ContainerRef::Item(owner)) if owner == item => sides.len() - 1,
        // Sides never leave their item
        _ => return Ok(Transition::Ignored),
    };

    let transition = move_in(ContainerRef::Item(item.clone()), sides, from, to)?;
    if matches!(transition, Transition::Moved { .. }) {
        form.mark_dirty();
    }
    Ok(transition)
}

fn move_in<T: Keyed>(
    container: ContainerRef,
    collection: &mut OrderedCollection<T>,
    from: usize,
    to: usize,
) -> ReorderResult<Transition> {
    let to = collection.move_within(from, to)?;
    if to == from {
        Ok(Transition::Unchanged)
    } else {
        Ok(Transition::Moved { container, from, to })
    }
}

fn unresolved(kind: &str, id: &str) -> ReorderError {
    ReorderError::Resolution(format!("{} {}", kind, id))
}
