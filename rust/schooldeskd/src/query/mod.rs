//! Generic query engine: filter, sort, then paginate any `Record` collection.

pub mod filter;
pub mod page;
pub mod sort;
pub mod spec;
pub mod view;

use serde::Serialize;
use std::borrow::Cow;

use crate::calc::RangeBucket;
use crate::error::EngineError;
use crate::store::EntityStore;

pub use page::{paginate, Page};
pub use sort::SortDir;
pub use spec::QuerySpec;

/// A field value as seen by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    /// Nullable numbers compare as 0.
    Number(Option<f64>),
    Tags(Vec<&'a str>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    /// Exact tag equality; list fields match when they contain the tag.
    Tag(&'static [&'static str]),
    Range(&'static [RangeBucket]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDef {
    /// Name used in a query's `filters` object.
    pub name: &'static str,
    /// Record key the filter reads.
    pub key: &'static str,
    pub kind: FilterKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Text,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDef {
    pub name: &'static str,
    pub key: &'static str,
    pub kind: SortKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub key: &'static str,
    /// Values are enum tags and export through the label dictionary.
    pub labeled: bool,
}

/// Static description of what a collection can be searched, filtered, sorted and exported by.
#[derive(Debug)]
pub struct Schema {
    pub entity: &'static str,
    pub search_keys: &'static [&'static str],
    pub filters: &'static [FilterDef],
    pub sort_keys: &'static [SortDef],
    pub default_sort: &'static str,
    pub columns: &'static [ColumnDef],
}

impl Schema {
    pub fn filter(&self, name: &str) -> Result<&FilterDef, EngineError> {
        self.filters
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| EngineError::UnknownFilterField {
                entity: self.entity,
                field: name.to_string(),
                allowed: self.filters.iter().map(|f| f.name).collect(),
            })
    }

    pub fn sort_key(&self, name: &str) -> Result<&SortDef, EngineError> {
        self.sort_keys
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| EngineError::UnknownSortKey {
                entity: self.entity,
                key: name.to_string(),
                allowed: self.sort_keys.iter().map(|s| s.name).collect(),
            })
    }
}

pub trait Record: Clone + Serialize {
    fn schema() -> &'static Schema;

    fn collection(store: &dyn EntityStore) -> &[Self];

    fn id(&self) -> &str;

    /// Value for a key declared in the schema. Undeclared keys read as empty text.
    fn value(&self, key: &str) -> FieldValue<'_>;
}

pub fn find<'a, R: Record>(store: &'a dyn EntityStore, id: &str) -> Result<&'a R, EngineError> {
    R::collection(store)
        .iter()
        .find(|r| r.id() == id)
        .ok_or_else(|| EngineError::NotFound {
            entity: R::schema().entity,
            id: id.to_string(),
        })
}

/// Filtered and sorted view of `records`, unpaginated. Input order breaks sort ties.
pub fn select<'a, R: Record>(records: &'a [R], spec: &QuerySpec) -> Result<Vec<&'a R>, EngineError> {
    let schema = R::schema();
    let predicate = filter::Predicate::compile(schema, spec)?;
    let sort_by = spec.sort_by.as_deref().unwrap_or(schema.default_sort);
    let sort_def = schema.sort_key(sort_by)?;

    let mut rows = predicate.apply(records);
    sort::sort_records(&mut rows, sort_def, spec.sort_dir);
    Ok(rows)
}

/// Filter, sort and paginate in one pass over the collection.
pub fn run<R: Record>(records: &[R], spec: &QuerySpec) -> Result<Page<R>, EngineError> {
    let rows = select(records, spec)?;
    Ok(paginate(&rows, spec.page, spec.page_size))
}
