//! Sectioned settings: built-in defaults, an optional startup file, then
//! runtime patches from `setup.update` (kept in memory only).

use anyhow::Context;
use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::{info, warn};

use crate::calc::GradingRules;
use crate::labels::Locale;

/// Environment variable naming the startup settings file.
pub const CONFIG_ENV: &str = "SCHOOLDESK_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Query,
    Grading,
    Display,
    Export,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Query,
        Section::Grading,
        Section::Display,
        Section::Export,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "query" => Some(Self::Query),
            "grading" => Some(Self::Grading),
            "display" => Some(Self::Display),
            "export" => Some(Self::Export),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Grading => "grading",
            Self::Display => "display",
            Self::Export => "export",
        }
    }
}

fn default_section(section: Section) -> Value {
    match section {
        Section::Query => json!({
            "defaultPageSize": 10,
            "maxPageSize": 500
        }),
        Section::Grading => json!({
            "passThresholdPercent": 50
        }),
        Section::Display => json!({
            "locale": "fr"
        }),
        Section::Export => json!({
            "autoPrint": true,
            "showGeneratedAt": true,
            "fileNamePrefix": "export"
        }),
    }
}

fn as_object_mut(value: &mut Value) -> Result<&mut Map<String, Value>, String> {
    value
        .as_object_mut()
        .ok_or_else(|| "internal settings section must be a JSON object".to_string())
}

fn parse_bool(v: &Value, key: &str) -> Result<bool, String> {
    v.as_bool().ok_or_else(|| format!("{} must be boolean", key))
}

fn parse_i64_range(v: &Value, key: &str, min: i64, max: i64) -> Result<i64, String> {
    let n = v.as_i64().ok_or_else(|| format!("{} must be integer", key))?;
    if !(min..=max).contains(&n) {
        return Err(format!("{} must be in {}..={}", key, min, max));
    }
    Ok(n)
}

fn parse_string_max(v: &Value, key: &str, max_len: usize) -> Result<String, String> {
    let s = v.as_str().ok_or_else(|| format!("{} must be string", key))?;
    let s = s.trim();
    if s.len() > max_len {
        return Err(format!("{} length must be <= {}", key, max_len));
    }
    Ok(s.to_string())
}

fn merge_field(section: Section, obj: &mut Map<String, Value>, k: &str, v: &Value) -> Result<(), String> {
    match section {
        Section::Query => match k {
            "defaultPageSize" => {
                obj.insert(k.to_string(), Value::from(parse_i64_range(v, k, 1, 500)?));
            }
            "maxPageSize" => {
                obj.insert(k.to_string(), Value::from(parse_i64_range(v, k, 10, 500)?));
            }
            _ => return Err(format!("unknown query field: {}", k)),
        },
        Section::Grading => match k {
            "passThresholdPercent" => {
                obj.insert(k.to_string(), Value::from(parse_i64_range(v, k, 1, 100)?));
            }
            _ => return Err(format!("unknown grading field: {}", k)),
        },
        Section::Display => match k {
            "locale" => {
                let s = parse_string_max(v, k, 8)?;
                let Some(locale) = Locale::parse(&s) else {
                    return Err("locale must be one of: fr, en".into());
                };
                obj.insert(k.to_string(), Value::String(locale.as_str().to_string()));
            }
            _ => return Err(format!("unknown display field: {}", k)),
        },
        Section::Export => match k {
            "autoPrint" | "showGeneratedAt" => {
                obj.insert(k.to_string(), Value::Bool(parse_bool(v, k)?));
            }
            "fileNamePrefix" => {
                let s = parse_string_max(v, k, 40)?;
                if s.is_empty() {
                    return Err("fileNamePrefix must not be empty".into());
                }
                if s.chars().any(|c| matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')) {
                    return Err("fileNamePrefix must not contain path characters".into());
                }
                obj.insert(k.to_string(), Value::String(s));
            }
            _ => return Err(format!("unknown export field: {}", k)),
        },
    }
    Ok(())
}

fn check_section(section: Section, current: &Value) -> Result<(), String> {
    if section == Section::Query {
        let default = current.get("defaultPageSize").and_then(Value::as_i64).unwrap_or(0);
        let max = current.get("maxPageSize").and_then(Value::as_i64).unwrap_or(0);
        if default > max {
            return Err("defaultPageSize must be <= maxPageSize".into());
        }
    }
    Ok(())
}

/// Apply every field of `patch` or none of them.
fn merge_section_patch(section: Section, current: &mut Value, patch: &Map<String, Value>) -> Result<(), String> {
    let mut next = current.clone();
    let obj = as_object_mut(&mut next)?;
    for (k, v) in patch {
        merge_field(section, obj, k, v)?;
    }
    check_section(section, &next)?;
    *current = next;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportPrefs {
    pub auto_print: bool,
    pub show_generated_at: bool,
    pub file_name_prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    query: Value,
    grading: Value,
    display: Value,
    export: Value,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            query: default_section(Section::Query),
            grading: default_section(Section::Grading),
            display: default_section(Section::Display),
            export: default_section(Section::Export),
        }
    }
}

impl Settings {
    pub fn section(&self, section: Section) -> &Value {
        match section {
            Section::Query => &self.query,
            Section::Grading => &self.grading,
            Section::Display => &self.display,
            Section::Export => &self.export,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Value {
        match section {
            Section::Query => &mut self.query,
            Section::Grading => &mut self.grading,
            Section::Display => &mut self.display,
            Section::Export => &mut self.export,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        for s in Section::ALL {
            out.insert(s.key().to_string(), self.section(s).clone());
        }
        Value::Object(out)
    }

    /// Validate and apply a patch. On error the section is left untouched.
    pub fn update(&mut self, section: Section, patch: &Map<String, Value>) -> Result<(), String> {
        merge_section_patch(section, self.section_mut(section), patch)
    }

    /// Best-effort merge of a settings document: invalid fields are skipped with a warning.
    pub fn apply_document(&mut self, doc: &Value) -> anyhow::Result<()> {
        let obj = doc
            .as_object()
            .context("settings document must be a JSON object")?;
        for (name, fields) in obj {
            let Some(section) = Section::parse(name) else {
                warn!(section = %name, "ignoring unknown settings section");
                continue;
            };
            let Some(fields) = fields.as_object() else {
                warn!(section = %name, "settings section must be an object");
                continue;
            };
            for (k, v) in fields {
                let mut single = Map::new();
                single.insert(k.clone(), v.clone());
                if let Err(msg) = self.update(section, &single) {
                    warn!(section = %name, field = %k, "ignoring setting: {}", msg);
                }
            }
        }
        Ok(())
    }

    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let doc: Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        let mut settings = Self::default();
        settings.apply_document(&doc)?;
        Ok(settings)
    }

    /// Defaults, overlaid with the file named by `SCHOOLDESK_CONFIG` when it loads.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        let path = std::path::PathBuf::from(path);
        match Self::load_file(&path) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings file");
                settings
            }
            Err(e) => {
                warn!("using default settings: {:#}", e);
                Self::default()
            }
        }
    }

    fn int(&self, section: Section, key: &str) -> Option<i64> {
        self.section(section).get(key).and_then(Value::as_i64)
    }

    fn flag(&self, section: Section, key: &str) -> Option<bool> {
        self.section(section).get(key).and_then(Value::as_bool)
    }

    pub fn default_page_size(&self) -> usize {
        self.int(Section::Query, "defaultPageSize").unwrap_or(10).max(1) as usize
    }

    pub fn max_page_size(&self) -> usize {
        self.int(Section::Query, "maxPageSize").unwrap_or(500).max(1) as usize
    }

    pub fn grading_rules(&self) -> GradingRules {
        let defaults = GradingRules::default();
        GradingRules {
            pass_threshold: self
                .int(Section::Grading, "passThresholdPercent")
                .map(|v| v as f64 / 100.0)
                .unwrap_or(defaults.pass_threshold),
        }
    }

    pub fn locale(&self) -> Locale {
        self.display
            .get("locale")
            .and_then(Value::as_str)
            .and_then(Locale::parse)
            .unwrap_or_default()
    }

    pub fn export_prefs(&self) -> ExportPrefs {
        ExportPrefs {
            auto_print: self.flag(Section::Export, "autoPrint").unwrap_or(true),
            show_generated_at: self.flag(Section::Export, "showGeneratedAt").unwrap_or(true),
            file_name_prefix: self
                .export
                .get("fileNamePrefix")
                .and_then(Value::as_str)
                .unwrap_or("export")
                .to_string(),
        }
    }
}
