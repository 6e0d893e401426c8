//! Hierarchy Model
//!
//! Categories in order, each with its ordered items; each item with its sides.
//! The editor keeps two of these: a provisional one mutated during a gesture and
//! a canonical one that only changes when the store confirms a write.

use std::collections::{BTreeMap, HashMap};

use menu_dragdrop::OrderedCollection;

use crate::error::{ReorderError, ReorderResult};
use crate::models::{CategoryId, ContainerRef, ItemId, ItemRecord, MenuItem, MenuSnapshot};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchyModel {
    category_order: OrderedCollection<CategoryId>,
    items_by_category: HashMap<CategoryId, OrderedCollection<ItemRecord>>,
}

impl HierarchyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a fetch.
    ///
    /// Categories named in `order` come first, in that order; the rest follow by name.
    /// Ids in `order` without items get an empty list.
    pub fn from_parts(
        categories: BTreeMap<CategoryId, Vec<MenuItem>>,
        order: Vec<CategoryId>,
    ) -> ReorderResult<Self> {
        let mut model = Self::new();

        for id in order {
            if !model.category_order.contains(&id) {
                model.category_order.push(id)?;
            }
        }
        // BTreeMap keys iterate by name
        for id in categories.keys() {
            if !model.category_order.contains(id) {
                model.category_order.push(id.clone())?;
            }
        }
        for id in model.category_order.iter() {
            model.items_by_category.insert(id.clone(), OrderedCollection::new());
        }

        let mut seen: HashMap<ItemId, CategoryId> = HashMap::new();
        for (category, items) in categories {
            let collection = model
                .items_by_category
                .get_mut(&category)
                .ok_or_else(|| ReorderError::Model(format!("category {} not ordered", category)))?;
            for item in items {
                if let Some(other) = seen.insert(item.name.clone(), category.clone()) {
                    return Err(ReorderError::Model(format!(
                        "item {} listed in both {} and {}",
                        item.name, other, category
                    )));
                }
                let mut record = ItemRecord::from_wire(item)?;
                // The map key is authoritative
                record.category = category.clone();
                collection.push(record)?;
            }
        }

        Ok(model)
    }

    pub fn from_snapshot(snapshot: MenuSnapshot) -> ReorderResult<Self> {
        Self::from_parts(snapshot.categories, snapshot.category_order)
    }

    pub fn category_order(&self) -> &OrderedCollection<CategoryId> {
        &self.category_order
    }

    pub(crate) fn category_order_mut(&mut self) -> &mut OrderedCollection<CategoryId> {
        &mut self.category_order
    }

    pub fn has_category(&self, id: &CategoryId) -> bool {
        self.items_by_category.contains_key(id)
    }

    pub fn items(&self, category: &CategoryId) -> Option<&OrderedCollection<ItemRecord>> {
        self.items_by_category.get(category)
    }

    pub(crate) fn items_mut(&mut self, category: &CategoryId) -> Option<&mut OrderedCollection<ItemRecord>> {
        self.items_by_category.get_mut(category)
    }

    /// The category whose list holds `item`
    pub fn category_of(&self, item: &ItemId) -> Option<&CategoryId> {
        self.category_order
            .iter()
            .find(|id| self.items_by_category.get(*id).is_some_and(|items| items.contains(item)))
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemRecord> {
        let category = self.category_of(id)?;
        self.items_by_category.get(category)?.get(id)
    }

    pub(crate) fn item_mut(&mut self, id: &ItemId) -> Option<&mut ItemRecord> {
        let category = self.category_of(id)?.clone();
        self.items_by_category.get_mut(&category)?.get_mut(id)
    }

    pub fn item_ids(&self, category: &CategoryId) -> Option<Vec<ItemId>> {
        self.items(category).map(OrderedCollection::ids_in_order)
    }

    pub fn item_count(&self) -> usize {
        self.items_by_category.values().map(OrderedCollection::len).sum()
    }

    /// Whether `container` is present in this model
    pub fn contains_container(&self, container: &ContainerRef) -> bool {
        match container {
            ContainerRef::Menu => true,
            ContainerRef::Category(id) => self.has_category(id),
            ContainerRef::Item(id) => self.item(id).is_some(),
        }
    }

    /// Overwrite one container with its state in `source`.
    ///
    /// For a category, records that arrive here are first removed from wherever
    /// this model still holds them, so an item never sits in two lists.
    pub fn copy_container_from(&mut self, source: &HierarchyModel, container: &ContainerRef) {
        match container {
            ContainerRef::Menu => {
                self.category_order = source.category_order.clone();
            }
            ContainerRef::Category(id) => {
                let Some(items) = source.items_by_category.get(id) else {
                    return;
                };
                for record in items {
                    for (other, list) in self.items_by_category.iter_mut() {
                        if other != id {
                            list.remove_by_id(&record.id);
                        }
                    }
                }
                self.items_by_category.insert(id.clone(), items.clone());
            }
            ContainerRef::Item(id) => {
                let Some(record) = source.item(id) else {
                    return;
                };
                if let Some(target) = self.item_mut(id) {
                    target.sides = record.sides.clone();
                    target.side_order = record.side_order.clone();
                }
            }
        }
    }

    /// Structural invariants: every item in exactly one category list, cached
    /// categories matching their list, and order and lists naming the same categories
    pub fn check_invariants(&self) -> ReorderResult<()> {
        if self.category_order.len() != self.items_by_category.len() {
            return Err(ReorderError::Model(
                "category order and item lists disagree".to_string(),
            ));
        }
        let mut seen: HashMap<&ItemId, &CategoryId> = HashMap::new();
        for category in self.category_order.iter() {
            let items = self
                .items_by_category
                .get(category)
                .ok_or_else(|| ReorderError::Model(format!("no item list for {}", category)))?;
            for record in items {
                if record.category != *category {
                    return Err(ReorderError::Model(format!(
                        "{} cached as {} but held by {}",
                        record.id, record.category, category
                    )));
                }
                if let Some(other) = seen.insert(&record.id, category) {
                    return Err(ReorderError::Model(format!(
                        "{} held by both {} and {}",
                        record.id, other, category
                    )));
                }
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_from_snapshot_follows_order() {
        let model = sample_model();
        assert_eq!(model.category_order().ids_in_order(), vec!["mains", "sides"]);
        assert_eq!(model.item_ids(&"mains".into()).unwrap(), vec!["Burger", "Pizza"]);
        assert_eq!(model.category_of(&"Fries".into()), Some(&"sides".to_string()));
        assert!(model.check_invariants().is_ok());
    }

    #[test]
    fn test_unordered_categories_appended_by_name() {
        let mut snapshot = sample_snapshot();
        snapshot.categories.insert("drinks".into(), vec![wire_item("Cola", "drinks")]);
        snapshot.categories.insert("desserts".into(), vec![]);
        snapshot.category_order = vec!["sides".into(), "empty".into()];

        let model = HierarchyModel::from_snapshot(snapshot).unwrap();
        assert_eq!(
            model.category_order().ids_in_order(),
            vec!["sides", "empty", "desserts", "drinks", "mains"]
        );
        assert!(model.items(&"empty".into()).unwrap().is_empty());
        assert!(model.check_invariants().is_ok());
    }

    #[test]
    fn test_duplicate_item_is_model_error() {
        let mut snapshot = sample_snapshot();
        snapshot.categories.get_mut("sides").unwrap().push(wire_item("Burger", "sides"));
        assert!(matches!(
            HierarchyModel::from_snapshot(snapshot),
            Err(ReorderError::Model(_))
        ));
    }

    #[test]
    fn test_map_key_overrides_cached_category() {
        let mut snapshot = sample_snapshot();
        snapshot.categories.get_mut("sides").unwrap()[0].category = "mains".into();
        let model = HierarchyModel::from_snapshot(snapshot).unwrap();
        assert_eq!(model.item(&"Fries".into()).unwrap().category, "sides");
    }

    #[test]
    fn test_invariant_violation_detected() {
        let mut model = sample_model();
        model.item_mut(&"Pizza".into()).unwrap().category = "sides".into();
        assert!(model.check_invariants().is_err());
    }

    #[test]
    fn test_copy_category_moves_record_out_of_old_list() {
        let canonical = sample_model();
        let mut provisional = canonical.clone();

        let mut fries = provisional.items_mut(&"sides".into()).unwrap().remove_by_id(&"Fries".into()).unwrap();
        fries.category = "mains".into();
        provisional.items_mut(&"mains".into()).unwrap().push(fries).unwrap();

        let mut target = canonical.clone();
        target.copy_container_from(&provisional, &ContainerRef::Category("mains".into()));
        assert_eq!(target.item_ids(&"mains".into()).unwrap(), vec!["Burger", "Pizza", "Fries"]);
        assert!(target.item_ids(&"sides".into()).unwrap().is_empty());
        assert!(target.check_invariants().is_ok());
    }
}
