use serde::Deserialize;

use crate::config::Settings;
use crate::store::EntityStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub store: Box<dyn EntityStore>,
    pub settings: Settings,
}
