use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{FieldValue, Record, SortDef, SortKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDir::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDir::Desc)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Header-click rule: the same key flips direction, a new key starts ascending.
pub fn toggle(current_key: Option<&str>, current_dir: SortDir, clicked: &str) -> (String, SortDir) {
    if current_key == Some(clicked) {
        (clicked.to_string(), current_dir.flipped())
    } else {
        (clicked.to_string(), SortDir::Asc)
    }
}

fn fold_char(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'æ' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'œ' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Æ' => 'A',
        'Ç' => 'C',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'Ñ' => 'N',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Œ' => 'O',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        other => other,
    }
}

/// Replace accented Latin letters by their base letter.
pub fn ascii_fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

fn collation_key(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).map(fold_char).collect()
}

/// Locale-aware ordering: case and accents are ignored first, raw text breaks ties.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn as_text<'v>(v: &'v FieldValue<'_>) -> std::borrow::Cow<'v, str> {
    match v {
        FieldValue::Text(s) => std::borrow::Cow::Borrowed(s.as_ref()),
        FieldValue::Tags(list) => std::borrow::Cow::Owned(list.join(" ")),
        FieldValue::Number(n) => std::borrow::Cow::Owned(n.map(|n| n.to_string()).unwrap_or_default()),
    }
}

fn as_number(v: &FieldValue<'_>) -> f64 {
    match v {
        FieldValue::Number(n) => n.unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>, kind: SortKind) -> Ordering {
    match kind {
        SortKind::Text => collate(&as_text(a), &as_text(b)),
        SortKind::Number => as_number(a)
            .partial_cmp(&as_number(b))
            .unwrap_or(Ordering::Equal),
    }
}

/// Stable sort: rows with equal keys keep their incoming order in both directions.
pub fn sort_records<R: Record>(rows: &mut [&R], def: &SortDef, dir: SortDir) {
    rows.sort_by(|a, b| {
        let ord = compare_values(&a.value(def.key), &b.value(def.key), def.kind);
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
}
