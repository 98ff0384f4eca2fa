//! View-state transitions driven by the list screens.

use serde::Deserialize;

use super::filter::Predicate;
use super::{sort, QuerySpec, Schema};
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViewAction {
    SetSearch { value: String },
    SetFilter { field: String, value: String },
    ClearFilters,
    SetPageSize { size: usize },
    ToggleSort { key: String },
    GoToPage { page: i64 },
}

impl QuerySpec {
    /// Next state after `action`. Search, filter and page-size changes go back to page 1.
    /// The page is not clamped here; that needs the row count.
    pub fn apply(
        &self,
        action: &ViewAction,
        schema: &'static Schema,
        max_page_size: usize,
    ) -> Result<QuerySpec, EngineError> {
        let mut next = self.clone();
        match action {
            ViewAction::SetSearch { value } => {
                let trimmed = value.trim();
                next.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
                next.page = 1;
            }
            ViewAction::SetFilter { field, value } => {
                schema.filter(field)?;
                next.filters.insert(field.clone(), value.trim().to_string());
                next.page = 1;
            }
            ViewAction::ClearFilters => {
                next.filters.clear();
                next.search = None;
                next.page = 1;
            }
            ViewAction::SetPageSize { size } => {
                if *size == 0 || *size > max_page_size {
                    return Err(EngineError::BadParams(format!(
                        "pageSize must be in range 1..={}",
                        max_page_size
                    )));
                }
                next.page_size = *size;
                next.page = 1;
            }
            ViewAction::ToggleSort { key } => {
                schema.sort_key(key)?;
                let current = self.sort_by.as_deref().unwrap_or(schema.default_sort);
                let (sort_by, sort_dir) = sort::toggle(Some(current), self.sort_dir, key);
                next.sort_by = Some(sort_by);
                next.sort_dir = sort_dir;
            }
            ViewAction::GoToPage { page } => {
                next.page = *page;
            }
        }
        Predicate::compile(schema, &next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Record, SortDir};
    use crate::store::Student;
    use serde_json::json;

    fn at_page_3() -> QuerySpec {
        QuerySpec {
            page: 3,
            ..QuerySpec::default()
        }
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let a: ViewAction =
            serde_json::from_value(json!({ "type": "setFilter", "field": "class", "value": "NS1" }))
                .expect("setFilter");
        assert_eq!(
            a,
            ViewAction::SetFilter {
                field: "class".into(),
                value: "NS1".into()
            }
        );
        let a: ViewAction = serde_json::from_value(json!({ "type": "clearFilters" })).expect("clear");
        assert_eq!(a, ViewAction::ClearFilters);
    }

    #[test]
    fn narrowing_resets_to_first_page() {
        let schema = Student::schema();
        let s = at_page_3();
        let next = s
            .apply(&ViewAction::SetSearch { value: "kon".into() }, schema, 500)
            .expect("search");
        assert_eq!(next.page, 1);
        assert_eq!(next.search.as_deref(), Some("kon"));

        let next = s
            .apply(
                &ViewAction::SetFilter {
                    field: "class".into(),
                    value: "NS1".into(),
                },
                schema,
                500,
            )
            .expect("filter");
        assert_eq!(next.page, 1);

        let next = s.apply(&ViewAction::SetPageSize { size: 25 }, schema, 500).expect("size");
        assert_eq!((next.page, next.page_size), (1, 25));
    }

    #[test]
    fn sort_toggle_keeps_page_and_flips_direction() {
        let schema = Student::schema();
        let s = at_page_3();
        let once = s
            .apply(&ViewAction::ToggleSort { key: "average".into() }, schema, 500)
            .expect("toggle");
        assert_eq!(once.sort_by.as_deref(), Some("average"));
        assert_eq!(once.sort_dir, SortDir::Asc);
        assert_eq!(once.page, 3);
        let twice = once
            .apply(&ViewAction::ToggleSort { key: "average".into() }, schema, 500)
            .expect("toggle");
        assert_eq!(twice.sort_dir, SortDir::Desc);

        let default_key = schema.default_sort.to_string();
        let flipped = QuerySpec::default()
            .apply(&ViewAction::ToggleSort { key: default_key }, schema, 500)
            .expect("toggle default");
        assert_eq!(flipped.sort_dir, SortDir::Desc);
    }

    #[test]
    fn invalid_actions_fail() {
        let schema = Student::schema();
        let s = QuerySpec::default();
        assert!(s.apply(&ViewAction::ToggleSort { key: "shoeSize".into() }, schema, 500).is_err());
        assert!(s.apply(&ViewAction::SetPageSize { size: 0 }, schema, 500).is_err());
        assert!(s
            .apply(
                &ViewAction::SetFilter {
                    field: "class".into(),
                    value: "XX9".into()
                },
                schema,
                500
            )
            .is_err());
    }
}
