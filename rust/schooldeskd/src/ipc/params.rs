//! Request parameter parsing shared by handlers. Errors are ready-made envelopes.

use serde_json::{json, Value};

use super::error::err;
use super::types::{AppState, Request};
use crate::labels::Locale;
use crate::query::spec::parse_query;
use crate::query::QuerySpec;

pub fn required_str<'a>(req: &'a Request, key: &str) -> Result<&'a str, Value> {
    match req.params.get(key).and_then(|v| v.as_str()).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(err(&req.id, "bad_params", format!("missing {}", key), None)),
    }
}

/// `params.locale`, else the display setting.
pub fn locale(state: &AppState, req: &Request) -> Result<Locale, Value> {
    let Some(raw) = req.params.get("locale") else {
        return Ok(state.settings.locale());
    };
    if raw.is_null() {
        return Ok(state.settings.locale());
    }
    raw.as_str().and_then(Locale::parse).ok_or_else(|| {
        err(
            &req.id,
            "bad_params",
            "locale must be one of: fr, en",
            Some(json!({ "locale": raw })),
        )
    })
}

pub fn query(state: &AppState, req: &Request, key: &str) -> Result<QuerySpec, Value> {
    parse_query(
        req.params.get(key),
        state.settings.default_page_size(),
        state.settings.max_page_size(),
    )
    .map_err(|msg| err(&req.id, "bad_params", msg, None))
}

pub fn optional_bool(req: &Request, key: &str) -> Result<Option<bool>, Value> {
    match req.params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(err(&req.id, "bad_params", format!("{} must be boolean", key), None)),
    }
}
