use crate::ipc::error::{engine_err, ok};
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::stats;
use serde_json::json;

fn handle_ranking(state: &mut AppState, req: &Request) -> serde_json::Value {
    let class_name = match params::required_str(req, "className") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match stats::class_ranking(state.store.as_ref(), class_name) {
        Ok(r) => ok(&req.id, json!(r)),
        Err(e) => engine_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.ranking" => Some(handle_ranking(state, req)),
        _ => None,
    }
}
