//! Device State Store
//!
//! Nested mapping Context -> Category -> Table | Record | GroupedRecord,
//! created lazily on first write. Writes merge; reads of a missing context
//! or category yield `None` ("no data"), never an error.
//!
//! One store belongs to one decoding pass. It is `Send` so a finished store
//! can be handed back from a worker, but it is never shared while written.

use super::category::{Category, Shape};
use crate::domain::model::{ContextId, GroupedRecord, Record, Table};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// Category View
// =============================================================================

/// Borrowed view of one category's data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategoryView<'a> {
    Table(&'a Table),
    Record(&'a Record),
    Grouped(&'a GroupedRecord),
}

impl CategoryView<'_> {
    /// True when the category carries no records or values
    pub fn is_empty(&self) -> bool {
        match self {
            CategoryView::Table(t) => t.is_empty(),
            CategoryView::Record(r) => r.is_empty(),
            CategoryView::Grouped(g) => g.is_empty(),
        }
    }
}

// =============================================================================
// Context State
// =============================================================================

/// All categories of one context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextState {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    tables: IndexMap<Category, Table>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    records: IndexMap<Category, Record>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    grouped: IndexMap<Category, GroupedRecord>,
}

impl ContextState {
    /// Table of a category, created on first access
    pub fn table_mut(&mut self, category: Category) -> &mut Table {
        debug_assert_eq!(category.shape(), Shape::Table, "{} is not a table", category);
        self.tables.entry(category).or_default()
    }

    /// Record of a category, created on first access
    pub fn record_mut(&mut self, category: Category) -> &mut Record {
        debug_assert_eq!(category.shape(), Shape::Record, "{} is not a record", category);
        self.records.entry(category).or_default()
    }

    /// Grouped record of a category, created on first access
    pub fn grouped_mut(&mut self, category: Category) -> &mut GroupedRecord {
        debug_assert_eq!(category.shape(), Shape::Grouped, "{} is not grouped", category);
        self.grouped.entry(category).or_default()
    }

    pub fn table(&self, category: Category) -> Option<&Table> {
        self.tables.get(&category)
    }

    pub fn record(&self, category: Category) -> Option<&Record> {
        self.records.get(&category)
    }

    pub fn grouped(&self, category: Category) -> Option<&GroupedRecord> {
        self.grouped.get(&category)
    }

    /// View of a category in its own shape
    pub fn get(&self, category: Category) -> Option<CategoryView<'_>> {
        match category.shape() {
            Shape::Table => self.table(category).map(CategoryView::Table),
            Shape::Record => self.record(category).map(CategoryView::Record),
            Shape::Grouped => self.grouped(category).map(CategoryView::Grouped),
        }
    }

    /// True when the category is absent or holds nothing
    pub fn is_empty(&self, category: Category) -> bool {
        self.get(category).map_or(true, |view| view.is_empty())
    }

    /// Categories holding data, in first-write order per shape
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.tables
            .keys()
            .chain(self.records.keys())
            .chain(self.grouped.keys())
            .copied()
    }
}

// =============================================================================
// Device State
// =============================================================================

/// Inventory of one device for one poll
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceState {
    contexts: IndexMap<ContextId, ContextState>,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty context if it does not exist yet
    pub fn register_context(&mut self, context: &ContextId) {
        self.context_mut(context);
    }

    /// Context state, created on first access
    pub fn context_mut(&mut self, context: &ContextId) -> &mut ContextState {
        self.contexts.entry(context.clone()).or_default()
    }

    pub fn context(&self, context: &ContextId) -> Option<&ContextState> {
        self.contexts.get(context)
    }

    pub fn contexts(&self) -> impl Iterator<Item = (&ContextId, &ContextState)> {
        self.contexts.iter()
    }

    /// Merge one keyed record into a table category
    pub fn merge_record(
        &mut self,
        context: &ContextId,
        category: Category,
        key: impl Into<String>,
        record: Record,
    ) {
        self.context_mut(context)
            .table_mut(category)
            .merge_record(key, record);
    }

    pub fn table(&self, context: &ContextId, category: Category) -> Option<&Table> {
        self.context(context)?.table(category)
    }

    pub fn record(&self, context: &ContextId, category: Category) -> Option<&Record> {
        self.context(context)?.record(category)
    }

    pub fn grouped(&self, context: &ContextId, category: Category) -> Option<&GroupedRecord> {
        self.context(context)?.grouped(category)
    }

    pub fn get(&self, context: &ContextId, category: Category) -> Option<CategoryView<'_>> {
        self.context(context)?.get(category)
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
