use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::stats;

fn handle_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let rules = state.settings.grading_rules();
    ok(&req.id, stats::dashboard_overview(state.store.as_ref(), &rules))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.overview" => Some(handle_overview(state, req)),
        _ => None,
    }
}
