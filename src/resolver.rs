//! Container Resolver
//!
//! Maps nodes and drop targets onto the container they belong to.

use menu_dragdrop::DropTarget;

use crate::models::{ContainerRef, NodeRef};
use crate::store::HierarchyModel;

/// Container a node resolves to when used as a drop target.
///
/// A category resolves to itself: hovering a category header targets its item list.
pub fn resolve(node: &NodeRef, model: &HierarchyModel) -> Option<ContainerRef> {
    match node {
        NodeRef::Category(id) => model
            .category_order()
            .contains(id)
            .then(|| ContainerRef::Category(id.clone())),
        NodeRef::Item(id) => model.category_of(id).map(|c| ContainerRef::Category(c.clone())),
        NodeRef::Side { item, side } => model
            .item(item)
            .filter(|record| record.has_side(side))
            .map(|_| ContainerRef::Item(item.clone())),
    }
}

/// Container a target resolves to: a container stands for itself when present
pub fn resolve_target(
    target: &DropTarget<NodeRef, ContainerRef>,
    model: &HierarchyModel,
) -> Option<ContainerRef> {
    match target {
        DropTarget::Node(node) => resolve(node, model),
        DropTarget::Container(container) => model
            .contains_container(container)
            .then(|| container.clone()),
    }
}

/// The list a dragged node is reordered within
pub fn owning_container(node: &NodeRef, model: &HierarchyModel) -> Option<ContainerRef> {
    match node {
        NodeRef::Category(id) => model.category_order().contains(id).then_some(ContainerRef::Menu),
        _ => resolve(node, model),
    }
}

/// Index of a node inside its owning list
pub fn index_of(node: &NodeRef, model: &HierarchyModel) -> Option<usize> {
    match node {
        NodeRef::Category(id) => model.category_order().position(id),
        NodeRef::Item(id) => {
            let category = model.category_of(id)?;
            model.items(category)?.position(id)
        }
        NodeRef::Side { item, side } => {
            let record = model.item(item)?;
            record.ordered_sides().iter().position(|name| name == side)
        }
    }
}
