mod calc;
mod config;
mod derived;
mod error;
mod export;
mod ipc;
mod labels;
mod query;
mod records;
mod stats;
mod store;

use std::io::{self, BufRead, Write};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::store::{EntityStore, MockStore};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCHOOLDESK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries responses only.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let store = MockStore::generate();
    info!(
        students = store.students().len(),
        teachers = store.teachers().len(),
        parents = store.parents().len(),
        exams = store.exams().len(),
        subjects = store.subjects().len(),
        messages = store.messages().len(),
        "schooldeskd {} ready",
        env!("CARGO_PKG_VERSION")
    );
    let mut state = ipc::AppState {
        store: Box::new(store),
        settings: Settings::from_env(),
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                error!("stdin closed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            // No id to echo back.
            Err(e) => ipc::bad_json(e.to_string()),
        };
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
