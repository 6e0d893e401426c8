//! Item Edit Form
//!
//! Side options are reordered only while their item is open for editing.
//! The new order lives here as a draft until the form is saved.

use menu_dragdrop::OrderedCollection;

use crate::error::ReorderResult;
use crate::models::{ItemId, ItemRecord, SideName};

/// Side order waiting for the form's save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideDraft {
    pub item: ItemId,
    pub order: Vec<SideName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    item: ItemId,
    side_order: OrderedCollection<SideName>,
    dirty: bool,
}

impl EditForm {
    pub fn open(record: &ItemRecord) -> ReorderResult<Self> {
        Ok(Self {
            item: record.id.clone(),
            side_order: OrderedCollection::from_vec(record.ordered_sides())?,
            dirty: false,
        })
    }

    pub fn item(&self) -> &ItemId {
        &self.item
    }

    pub fn side_order(&self) -> Vec<SideName> {
        self.side_order.ids_in_order()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn draft(&self) -> SideDraft {
        SideDraft {
            item: self.item.clone(),
            order: self.side_order(),
        }
    }

    pub(crate) fn sides(&self) -> &OrderedCollection<SideName> {
        &self.side_order
    }

    pub(crate) fn sides_mut(&mut self) -> &mut OrderedCollection<SideName> {
        &mut self.side_order
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Adopt the order the store kept
    pub(crate) fn saved(&mut self, stored: Vec<SideName>) -> ReorderResult<()> {
        self.side_order = OrderedCollection::from_vec(stored)?;
        self.dirty = false;
        Ok(())
    }
}
