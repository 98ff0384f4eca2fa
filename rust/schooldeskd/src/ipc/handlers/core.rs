use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = state.store.as_ref();
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "locale": state.settings.locale(),
            "counts": {
                "students": store.students().len(),
                "teachers": store.teachers().len(),
                "parents": store.parents().len(),
                "exams": store.exams().len(),
                "subjects": store.subjects().len(),
                "messages": store.messages().len(),
            }
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        _ => None,
    }
}
