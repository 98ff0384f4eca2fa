//! `<entity>.options|list|open|stats|export` for every collection.

use chrono::NaiveDateTime;
use serde_json::{json, Value};
use tracing::info;

use crate::derived::Derive;
use crate::export::{self, ExportFormat, ExportOptions};
use crate::ipc::error::{engine_err, err, ok};
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::labels::{column_label, entity_title, tag_label, Locale};
use crate::query::{self, FilterKind, Record};
use crate::stats::{self, Scope, Summarize};
use crate::store::{Exam, Message, Parent, Student, Subject, Teacher};

fn tag_options(locale: Locale, tags: &[&str]) -> Vec<Value> {
    tags.iter()
        .map(|t| json!({ "tag": t, "label": tag_label(locale, t) }))
        .collect()
}

fn handle_options<R: Record>(state: &mut AppState, req: &Request) -> Value {
    let locale = match params::locale(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let schema = R::schema();
    let filters: Vec<Value> = schema
        .filters
        .iter()
        .map(|f| {
            let (kind, values) = match f.kind {
                FilterKind::Tag(tags) => ("tag", tag_options(locale, tags)),
                FilterKind::Range(buckets) => (
                    "range",
                    buckets
                        .iter()
                        .map(|b| {
                            json!({
                                "tag": b.tag,
                                "label": tag_label(locale, b.tag),
                                "min": b.min,
                                "max": b.max,
                            })
                        })
                        .collect::<Vec<_>>(),
                ),
            };
            json!({
                "name": f.name,
                "label": column_label(locale, f.name),
                "kind": kind,
                "values": values,
            })
        })
        .collect();
    let sort_keys: Vec<Value> = schema
        .sort_keys
        .iter()
        .map(|s| json!({ "name": s.name, "label": column_label(locale, s.name) }))
        .collect();
    let columns: Vec<Value> = schema
        .columns
        .iter()
        .map(|c| json!({ "key": c.key, "label": column_label(locale, c.key) }))
        .collect();
    ok(
        &req.id,
        json!({
            "entity": schema.entity,
            "locale": locale,
            "filters": filters,
            "sortKeys": sort_keys,
            "defaultSort": schema.default_sort,
            "searchKeys": schema.search_keys,
            "columns": columns,
        }),
    )
}

fn handle_list<R: Record>(state: &mut AppState, req: &Request) -> Value {
    let spec = match params::query(state, req, "query") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let schema = R::schema();
    let page = match query::run(R::collection(state.store.as_ref()), &spec) {
        Ok(v) => v,
        Err(e) => return engine_err(&req.id, &e),
    };
    ok(
        &req.id,
        json!({
            "rows": page.rows,
            "totalCount": page.total_count,
            "totalPages": page.total_pages,
            "page": page.page,
            "pageSize": page.page_size,
            "rangeStart": page.range_start,
            "rangeEnd": page.range_end,
            "sortBy": spec.sort_by.as_deref().unwrap_or(schema.default_sort),
            "sortDir": spec.sort_dir,
            "search": spec.search,
            "appliedFilters": spec.applied_filters(),
        }),
    )
}

fn handle_open<R: Derive>(state: &mut AppState, req: &Request) -> Value {
    let id = match params::required_str(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let store = state.store.as_ref();
    let record: &R = match query::find(store, id) {
        Ok(v) => v,
        Err(e) => return engine_err(&req.id, &e),
    };
    let rules = state.settings.grading_rules();
    ok(
        &req.id,
        json!({
            "record": record,
            "detail": record.derive(store, &rules),
        }),
    )
}

fn handle_stats<R: Summarize>(state: &mut AppState, req: &Request) -> Value {
    let scope = match req.params.get("scope") {
        None | Some(Value::Null) => Scope::All,
        Some(raw) => match raw.as_str().and_then(Scope::parse) {
            Some(s) => s,
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "scope must be one of: all, filtered",
                    Some(json!({ "scope": raw })),
                )
            }
        },
    };
    let spec = match params::query(state, req, "query") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let rules = state.settings.grading_rules();
    let snapshot = match stats::snapshot::<R>(state.store.as_ref(), scope, &spec, &rules) {
        Ok(v) => v,
        Err(e) => return engine_err(&req.id, &e),
    };
    let mut result = json!(snapshot);
    result["scope"] = json!(scope.as_str());
    result["entity"] = json!(R::schema().entity);
    ok(&req.id, result)
}

fn parse_generated_at(req: &Request) -> Result<NaiveDateTime, Value> {
    match req.params.get("generatedAt").and_then(|v| v.as_str()) {
        None => Ok(chrono::Local::now().naive_local()),
        Some(raw) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map_err(|_| {
            err(
                &req.id,
                "bad_params",
                "generatedAt must look like 2025-03-11T14:05:00",
                Some(json!({ "generatedAt": raw })),
            )
        }),
    }
}

fn handle_export<R: Record>(state: &mut AppState, req: &Request) -> Value {
    let format_raw = match params::required_str(req, "format") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(format) = ExportFormat::parse(format_raw) else {
        return err(
            &req.id,
            "bad_params",
            "format must be one of: csv, html",
            Some(json!({ "format": format_raw })),
        );
    };
    let spec = match params::query(state, req, "query") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let locale = match params::locale(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let auto_print = match params::optional_bool(req, "autoPrint") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let generated_at = match parse_generated_at(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let rows = match query::select(R::collection(state.store.as_ref()), &spec) {
        Ok(v) => v,
        Err(e) => return engine_err(&req.id, &e),
    };

    let prefs = state.settings.export_prefs();
    let entity = R::schema().entity;
    let title = req
        .params
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| entity_title(locale, entity))
        .to_string();
    let opts = ExportOptions {
        title,
        locale,
        generated_at,
        auto_print: auto_print.unwrap_or(prefs.auto_print),
        show_generated_at: prefs.show_generated_at,
    };
    let doc = export::render(&rows, format, &opts, &prefs.file_name_prefix);
    info!(entity, format = format.extension(), records = doc.record_count, "export rendered");
    ok(&req.id, json!(doc))
}

fn dispatch<R: Derive + Summarize>(
    state: &mut AppState,
    req: &Request,
    action: &str,
) -> Option<Value> {
    match action {
        "options" => Some(handle_options::<R>(state, req)),
        "list" => Some(handle_list::<R>(state, req)),
        "open" => Some(handle_open::<R>(state, req)),
        "stats" => Some(handle_stats::<R>(state, req)),
        "export" => Some(handle_export::<R>(state, req)),
        "create" | "update" | "delete" => Some(err(
            &req.id,
            "not_implemented",
            format!("{} is read-only", R::schema().entity),
            None,
        )),
        _ => None,
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let (entity, action) = req.method.split_once('.')?;
    match entity {
        "students" => dispatch::<Student>(state, req, action),
        "teachers" => dispatch::<Teacher>(state, req, action),
        "parents" => dispatch::<Parent>(state, req, action),
        "exams" => dispatch::<Exam>(state, req, action),
        "subjects" => dispatch::<Subject>(state, req, action),
        "messages" => dispatch::<Message>(state, req, action),
        _ => None,
    }
}
