use crate::ipc::error::{engine_err, err, ok};
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::query::page::clamp_page;
use crate::query::view::ViewAction;
use crate::query::{self, Record};
use crate::store::{Exam, Message, Parent, Student, Subject, Teacher};
use serde_json::json;

/// Next state, with its page clamped against the rows it selects.
fn apply_view<R: Record>(state: &mut AppState, req: &Request) -> serde_json::Value {
    let current = match params::query(state, req, "state") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(raw_action) = req.params.get("action") else {
        return err(&req.id, "bad_params", "missing action", None);
    };
    let action: ViewAction = match serde_json::from_value(raw_action.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", format!("invalid action: {}", e), None),
    };
    let mut next = match current.apply(&action, R::schema(), state.settings.max_page_size()) {
        Ok(v) => v,
        Err(e) => return engine_err(&req.id, &e),
    };
    let matched = match query::select(R::collection(state.store.as_ref()), &next) {
        Ok(rows) => rows.len(),
        Err(e) => return engine_err(&req.id, &e),
    };
    next.page = clamp_page(next.page, matched, next.page_size) as i64;
    ok(&req.id, json!({ "state": next, "totalCount": matched }))
}

fn handle_view_apply(state: &mut AppState, req: &Request) -> serde_json::Value {
    let entity = match params::required_str(req, "entity") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match entity {
        "students" => apply_view::<Student>(state, req),
        "teachers" => apply_view::<Teacher>(state, req),
        "parents" => apply_view::<Parent>(state, req),
        "exams" => apply_view::<Exam>(state, req),
        "subjects" => apply_view::<Subject>(state, req),
        "messages" => apply_view::<Message>(state, req),
        _ => err(
            &req.id,
            "bad_params",
            "unknown entity",
            Some(json!({ "entity": entity })),
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "view.apply" => Some(handle_view_apply(state, req)),
        _ => None,
    }
}
