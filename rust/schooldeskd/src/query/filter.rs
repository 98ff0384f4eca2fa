use super::{FieldValue, FilterKind, QuerySpec, Record, Schema};
use crate::calc::RangeBucket;
use crate::error::EngineError;

/// `""` and `"all"` leave a filter field unconstrained.
pub fn is_unconstrained(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case("all")
}

#[derive(Debug, Clone, PartialEq)]
enum Constraint {
    Tag { key: &'static str, tag: String },
    Range { key: &'static str, bucket: RangeBucket },
}

/// All active constraints of a query, validated against a schema and ANDed.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    search: Option<String>,
    search_keys: &'static [&'static str],
    constraints: Vec<Constraint>,
}

impl Predicate {
    pub fn compile(schema: &'static Schema, spec: &QuerySpec) -> Result<Self, EngineError> {
        let search = spec
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut constraints = Vec::new();
        for (name, value) in &spec.filters {
            let def = schema.filter(name)?;
            if is_unconstrained(value) {
                continue;
            }
            let value = value.trim();
            match def.kind {
                FilterKind::Tag(tags) => {
                    if !tags.iter().any(|t| *t == value) {
                        return Err(EngineError::UnknownFilterValue {
                            field: name.clone(),
                            value: value.to_string(),
                            allowed: tags.to_vec(),
                        });
                    }
                    constraints.push(Constraint::Tag {
                        key: def.key,
                        tag: value.to_string(),
                    });
                }
                FilterKind::Range(buckets) => {
                    let Some(bucket) = buckets.iter().find(|b| b.tag == value) else {
                        return Err(EngineError::UnknownFilterValue {
                            field: name.clone(),
                            value: value.to_string(),
                            allowed: buckets.iter().map(|b| b.tag).collect(),
                        });
                    };
                    constraints.push(Constraint::Range {
                        key: def.key,
                        bucket: *bucket,
                    });
                }
            }
        }

        Ok(Self {
            search,
            search_keys: schema.search_keys,
            constraints,
        })
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        if let Some(needle) = self.search.as_deref() {
            let hit = self
                .search_keys
                .iter()
                .any(|key| text_contains(&record.value(key), needle));
            if !hit {
                return false;
            }
        }
        self.constraints.iter().all(|c| match c {
            Constraint::Tag { key, tag } => match record.value(key) {
                FieldValue::Text(s) => s == tag.as_str(),
                FieldValue::Tags(list) => list.iter().any(|t| *t == tag.as_str()),
                FieldValue::Number(_) => false,
            },
            Constraint::Range { key, bucket } => match record.value(key) {
                FieldValue::Number(v) => bucket.contains(v.unwrap_or(0.0)),
                _ => false,
            },
        })
    }

    pub fn apply<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }
}

fn text_contains(value: &FieldValue<'_>, needle: &str) -> bool {
    match value {
        FieldValue::Text(s) => s.to_lowercase().contains(needle),
        FieldValue::Tags(list) => list.iter().any(|t| t.to_lowercase().contains(needle)),
        FieldValue::Number(Some(n)) => n.to_string().contains(needle),
        FieldValue::Number(None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockStore, Parent, Student, Teacher};
    use std::collections::BTreeMap;

    fn spec_with(filters: &[(&str, &str)]) -> QuerySpec {
        QuerySpec {
            filters: filters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            ..QuerySpec::default()
        }
    }

    #[test]
    fn blank_and_all_are_unconstrained() {
        let store = MockStore::generate();
        for v in ["", "all", "ALL", "  "] {
            let p = Predicate::compile(Student::schema(), &spec_with(&[("class", v)])).expect("compile");
            assert_eq!(p.apply(&store.students).len(), store.students.len());
        }
    }

    #[test]
    fn constraints_are_anded() {
        let store = MockStore::generate();
        let spec = spec_with(&[("class", "CP1"), ("gender", "female")]);
        let p = Predicate::compile(Student::schema(), &spec).expect("compile");
        let rows = p.apply(&store.students);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|s| s.class_name == "CP1" && s.gender == "female"));
        let expected = store
            .students
            .iter()
            .filter(|s| s.class_name == "CP1" && s.gender == "female")
            .count();
        assert_eq!(rows.len(), expected);
    }

    #[test]
    fn search_is_case_insensitive_over_search_keys() {
        let store = MockStore::generate();
        let spec = QuerySpec {
            search: Some("TRAORÉ".into()),
            ..QuerySpec::default()
        };
        let p = Predicate::compile(Student::schema(), &spec).expect("compile");
        let rows = p.apply(&store.students);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|s| s.last_name == "Traoré"));

        let by_id = QuerySpec {
            search: Some("st-007".into()),
            ..QuerySpec::default()
        };
        let p = Predicate::compile(Student::schema(), &by_id).expect("compile");
        let ids: Vec<&str> = p.apply(&store.students).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["ST-007"]);
    }

    #[test]
    fn list_fields_match_by_membership() {
        let store = MockStore::generate();
        let p = Predicate::compile(Teacher::schema(), &spec_with(&[("class", "CE2")])).expect("compile");
        let rows = p.apply(&store.teachers);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|t| t.classes.iter().any(|c| c == "CE2")));
    }

    #[test]
    fn engagement_range_bucket_filters_parents() {
        let store = MockStore::generate();
        let p = Predicate::compile(Parent::schema(), &spec_with(&[("engagement", "high")])).expect("compile");
        let rows = p.apply(&store.parents);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.engagement_score >= 70));

        let p = Predicate::compile(Parent::schema(), &spec_with(&[("engagement", "medium")])).expect("compile");
        assert!(p
            .apply(&store.parents)
            .iter()
            .all(|r| (40..70).contains(&r.engagement_score)));
    }

    #[test]
    fn unknown_field_and_value_fail_fast() {
        let err = Predicate::compile(Student::schema(), &spec_with(&[("shoeSize", "42")])).unwrap_err();
        assert!(matches!(err, EngineError::UnknownFilterField { .. }));

        let err = Predicate::compile(Student::schema(), &spec_with(&[("class", "XX9")])).unwrap_err();
        assert!(matches!(err, EngineError::UnknownFilterValue { .. }));

        let err = Predicate::compile(Parent::schema(), &spec_with(&[("engagement", "extreme")])).unwrap_err();
        assert!(matches!(err, EngineError::UnknownFilterValue { .. }));
    }

    #[test]
    fn filtering_leaves_input_untouched_and_is_idempotent() {
        let store = MockStore::generate();
        let before = store.students.clone();
        let spec = spec_with(&[("status", "active")]);
        let p = Predicate::compile(Student::schema(), &spec).expect("compile");
        let a: Vec<String> = p.apply(&store.students).iter().map(|s| s.id.clone()).collect();
        let b: Vec<String> = p.apply(&store.students).iter().map(|s| s.id.clone()).collect();
        assert_eq!(a, b);
        assert_eq!(before, store.students);
    }
}
