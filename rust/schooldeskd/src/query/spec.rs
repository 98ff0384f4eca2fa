use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::SortDir;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Combined search, filter, sort and pagination request for one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    pub search: Option<String>,
    /// Filter name -> required tag. `""` and `"all"` are unconstrained.
    pub filters: BTreeMap<String, String>,
    /// `None` falls back to the collection's default sort key.
    pub sort_by: Option<String>,
    pub sort_dir: SortDir,
    /// Requested page; clamped when the query runs.
    pub page: i64,
    pub page_size: usize,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            search: None,
            filters: BTreeMap::new(),
            sort_by: None,
            sort_dir: SortDir::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QuerySpec {
    /// Filters that actually constrain the result.
    pub fn applied_filters(&self) -> BTreeMap<&str, &str> {
        self.filters
            .iter()
            .filter(|(_, v)| !super::filter::is_unconstrained(v))
            .map(|(k, v)| (k.as_str(), v.trim()))
            .collect()
    }
}

fn parse_search(v: Option<&Value>) -> Result<Option<String>, String> {
    let Some(value) = v else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    let Some(raw) = value.as_str() else {
        return Err("query.search must be string or null".to_string());
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

fn parse_filters(v: Option<&Value>) -> Result<BTreeMap<String, String>, String> {
    let Some(value) = v else {
        return Ok(BTreeMap::new());
    };
    if value.is_null() {
        return Ok(BTreeMap::new());
    }
    let Some(obj) = value.as_object() else {
        return Err("query.filters must be an object".to_string());
    };
    let mut out = BTreeMap::new();
    for (field, raw) in obj {
        let tag = match raw {
            Value::Null => String::new(),
            Value::String(s) => s.trim().to_string(),
            _ => return Err(format!("query.filters.{} must be a string", field)),
        };
        out.insert(field.clone(), tag);
    }
    Ok(out)
}

fn parse_sort_by(v: Option<&Value>) -> Result<Option<String>, String> {
    let Some(value) = v else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    let Some(raw) = value.as_str() else {
        return Err("query.sortBy must be a string".to_string());
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

fn parse_sort_dir(v: Option<&Value>) -> Result<SortDir, String> {
    let Some(value) = v else {
        return Ok(SortDir::Asc);
    };
    let Some(raw) = value.as_str() else {
        return Err("query.sortDir must be a string".to_string());
    };
    SortDir::parse(raw).ok_or_else(|| "query.sortDir must be one of: asc, desc".to_string())
}

/// Any integer is accepted; out-of-range pages are clamped later.
fn parse_page(v: Option<&Value>) -> Result<i64, String> {
    let Some(value) = v else {
        return Ok(1);
    };
    if let Some(page) = value.as_i64() {
        return Ok(page);
    }
    if value.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    Err("query.page must be an integer".to_string())
}

pub fn parse_page_size(v: Option<&Value>, default: usize, max: usize) -> Result<usize, String> {
    let Some(value) = v else {
        return Ok(default);
    };
    let Some(size) = value.as_u64() else {
        return Err("query.pageSize must be a positive integer".to_string());
    };
    if size == 0 || size > max as u64 {
        return Err(format!("query.pageSize must be in range 1..={}", max));
    }
    Ok(size as usize)
}

/// Parse a `query` params object. A missing object is the default query.
pub fn parse_query(
    raw: Option<&Value>,
    default_page_size: usize,
    max_page_size: usize,
) -> Result<QuerySpec, String> {
    let empty = serde_json::Map::new();
    let obj = match raw {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(m)) => m,
        Some(_) => return Err("query must be an object".to_string()),
    };
    Ok(QuerySpec {
        search: parse_search(obj.get("search"))?,
        filters: parse_filters(obj.get("filters"))?,
        sort_by: parse_sort_by(obj.get("sortBy"))?,
        sort_dir: parse_sort_dir(obj.get("sortDir"))?,
        page: parse_page(obj.get("page"))?,
        page_size: parse_page_size(obj.get("pageSize"), default_page_size, max_page_size)?,
    })
}
