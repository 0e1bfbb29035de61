//! Declarative per-field rules gating resume creation and updates.
//!
//! Rules are evaluated against the raw JSON body so that every violation can
//! be reported with its concrete field path, including bodies that would not
//! deserialize into [`ResumePatch`](crate::model::ResumePatch). Validation is
//! all-or-nothing: either the whole payload passes or every failure is
//! returned.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::section::Section;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// First save for a user: every field of a supplied section must be filled.
    Create,
    /// Later saves: blank fields are allowed, filled ones must be well-formed.
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rule table
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Record,
    Records,
    Text,
    /// Array of strings; `min` entries once supplied.
    TextList { min: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Digits(usize),
    Email,
    Url,
    Date,
    Decimal,
}

struct FieldRule {
    path: &'static str,
    label: &'static str,
    kind: Kind,
    required: bool,
    format: Option<Format>,
}

const fn rule(
    path: &'static str,
    label: &'static str,
    kind: Kind,
    required: bool,
    format: Option<Format>,
) -> FieldRule {
    FieldRule {
        path,
        label,
        kind,
        required,
        format,
    }
}

const TEXT: Kind = Kind::Text;
const NON_EMPTY: Kind = Kind::TextList { min: 1 };

static FIELD_RULES: &[FieldRule] = &[
    rule("basicInfo", "Basic info", Kind::Record, false, None),
    rule("basicInfo.name", "Name", TEXT, true, None),
    rule("basicInfo.contact", "Contact", TEXT, true, Some(Format::Digits(10))),
    rule("basicInfo.address", "Address", TEXT, true, None),
    rule("basicInfo.email", "Email", TEXT, true, Some(Format::Email)),
    rule("basicInfo.linkedin", "LinkedIn", TEXT, false, Some(Format::Url)),
    rule("basicInfo.github", "GitHub", TEXT, false, Some(Format::Url)),
    rule("basicInfo.objective", "Objective", TEXT, true, None),
    rule("education", "Education", Kind::Records, false, None),
    rule("education[*]", "Education entry", Kind::Record, false, None),
    rule("education[*].degree", "Degree", TEXT, true, None),
    rule("education[*].institute", "Institute", TEXT, true, None),
    rule("education[*].fieldOfStudy", "Field of study", TEXT, true, None),
    rule("education[*].location", "Location", TEXT, true, None),
    rule("education[*].startDate", "Start date", TEXT, true, Some(Format::Date)),
    rule("education[*].endDate", "End date", TEXT, true, Some(Format::Date)),
    rule("education[*].cgpa", "CGPA", TEXT, false, Some(Format::Decimal)),
    rule("workExperience", "Work experience", Kind::Records, false, None),
    rule("workExperience[*]", "Work experience entry", Kind::Record, false, None),
    rule("workExperience[*].company", "Company", TEXT, true, None),
    rule("workExperience[*].designation", "Designation", TEXT, true, None),
    rule("workExperience[*].startDate", "Start date", TEXT, true, Some(Format::Date)),
    rule("workExperience[*].endDate", "End date", TEXT, false, Some(Format::Date)),
    rule("skills", "Skills", Kind::Record, false, None),
    rule("skills.technical", "Technical skills", NON_EMPTY, true, None),
    rule("skills.soft", "Soft skills", NON_EMPTY, true, None),
    rule("skills.additional", "Additional skills", Kind::TextList { min: 0 }, false, None),
    rule("achievements", "Achievements", NON_EMPTY, true, None),
    rule("projects", "Projects", NON_EMPTY, true, None),
    rule("extracurricular", "Extracurricular activities", NON_EMPTY, true, None),
    rule("leadership", "Leadership", NON_EMPTY, true, None),
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

// ────────────────────────────────────────────────────────────────────────────
// Evaluation
// ────────────────────────────────────────────────────────────────────────────

/// Validates a create/update body. Returns every violation found.
pub fn validate(payload: &Value, mode: Mode) -> Result<(), Vec<FieldError>> {
    let Some(body) = payload.as_object() else {
        return Err(vec![FieldError::new("body", "Request body must be a JSON object")]);
    };

    let supplied: Vec<Section> = Section::ALL
        .into_iter()
        .filter(|s| body.get(s.key()).is_some_and(|v| !v.is_null()))
        .collect();
    if supplied.is_empty() {
        return Err(vec![FieldError::new(
            "body",
            "At least one resume section is required",
        )]);
    }

    let mut errors = Vec::new();

    for rule in FIELD_RULES {
        let root = rule_section(rule.path);
        if !supplied.iter().any(|s| s.key() == root) {
            continue;
        }
        for (path, value) in resolve(payload, rule.path) {
            check_field(rule, &path, value, mode, &mut errors);
        }
    }

    if supplied.contains(&Section::WorkExperience) {
        check_work_date_order(payload, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_field(
    rule: &FieldRule,
    path: &str,
    value: Option<&Value>,
    mode: Mode,
    errors: &mut Vec<FieldError>,
) {
    let is_entry = rule.path.ends_with("[*]");
    let value = match value {
        None => None,
        Some(Value::Null) if !is_entry => None,
        // Only text fields treat blank as empty; a blank list or record is a type error.
        Some(Value::String(s)) if rule.kind == Kind::Text && s.trim().is_empty() => {
            if rule.required {
                errors.push(FieldError::new(path, format!("{} is required", rule.label)));
            }
            return;
        }
        Some(v) => Some(v),
    };
    let Some(value) = value else {
        if rule.required && mode == Mode::Create {
            errors.push(FieldError::new(path, format!("{} is required", rule.label)));
        }
        return;
    };

    match rule.kind {
        Kind::Record => {
            if !value.is_object() {
                errors.push(FieldError::new(path, format!("{} must be an object", rule.label)));
            }
        }
        Kind::Records => {
            if !value.is_array() {
                errors.push(FieldError::new(path, format!("{} must be a list", rule.label)));
            }
        }
        Kind::TextList { min } => match value.as_array() {
            None => errors.push(FieldError::new(path, format!("{} must be a list", rule.label))),
            Some(items) => {
                let filled = items
                    .iter()
                    .filter(|item| item.as_str().is_some_and(|s| !s.trim().is_empty()))
                    .count();
                if items.iter().any(|item| !item.is_string()) {
                    errors.push(FieldError::new(
                        path,
                        format!("{} must contain only text entries", rule.label),
                    ));
                } else if filled < min {
                    errors.push(FieldError::new(
                        path,
                        format!("{} must have at least {min} non-blank entry", rule.label),
                    ));
                }
            }
        },
        Kind::Text => {
            let text = match (value, rule.format) {
                (Value::String(s), _) => s.clone(),
                (Value::Number(n), Some(Format::Decimal)) => n.to_string(),
                _ => {
                    errors.push(FieldError::new(path, format!("{} must be text", rule.label)));
                    return;
                }
            };
            if let Some(format) = rule.format {
                if let Some(message) = check_format(format, &text, rule.label) {
                    errors.push(FieldError::new(path, message));
                }
            }
        }
    }
}

fn check_format(format: Format, text: &str, label: &str) -> Option<String> {
    let ok = match format {
        Format::Digits(n) => is_digits(text, n),
        Format::Email => is_email(text),
        Format::Url => is_url(text),
        Format::Date => parse_date(text).is_some(),
        Format::Decimal => is_decimal(text),
    };
    if ok {
        return None;
    }
    Some(match format {
        Format::Digits(n) => format!("{label} must be exactly {n} digits"),
        Format::Email => format!("{label} must be a valid email address"),
        Format::Url => format!("{label} must be a valid URL"),
        Format::Date => format!("{label} must be a valid date"),
        Format::Decimal => format!("{label} must be a decimal number"),
    })
}

fn check_work_date_order(payload: &Value, errors: &mut Vec<FieldError>) {
    let Some(entries) = payload.get("workExperience").and_then(Value::as_array) else {
        return;
    };
    for (i, entry) in entries.iter().enumerate() {
        let date = |key: &str| entry.get(key).and_then(Value::as_str).and_then(parse_date);
        if let (Some(start), Some(end)) = (date("startDate"), date("endDate")) {
            if end < start {
                errors.push(FieldError::new(
                    format!("workExperience[{i}].endDate"),
                    "End date must not be before start date",
                ));
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Path resolution
// ────────────────────────────────────────────────────────────────────────────

enum Step<'p> {
    Key(&'p str),
    Each,
}

fn steps(path: &str) -> Vec<Step<'_>> {
    let mut out = Vec::new();
    for part in path.split('.') {
        match part.strip_suffix("[*]") {
            Some(key) => {
                out.push(Step::Key(key));
                out.push(Step::Each);
            }
            None => out.push(Step::Key(part)),
        }
    }
    out
}

fn rule_section(path: &str) -> &str {
    let end = path.find(|c| c == '.' || c == '[').unwrap_or(path.len());
    &path[..end]
}

/// Expands a rule path into concrete paths paired with the value found there.
/// Wildcards expand over array elements; a missing key yields `None`.
fn resolve<'a>(root: &'a Value, path: &str) -> Vec<(String, Option<&'a Value>)> {
    let mut nodes = vec![(String::new(), Some(root))];
    for step in steps(path) {
        nodes = match step {
            Step::Key(key) => nodes
                .into_iter()
                .map(|(p, v)| {
                    let p = if p.is_empty() {
                        key.to_string()
                    } else {
                        format!("{p}.{key}")
                    };
                    (p, v.and_then(|v| v.get(key)))
                })
                .collect(),
            Step::Each => nodes
                .into_iter()
                .flat_map(|(p, v)| {
                    v.and_then(Value::as_array)
                        .map(|items| {
                            items
                                .iter()
                                .enumerate()
                                .map(|(i, item)| (format!("{p}[{i}]"), Some(item)))
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default()
                })
                .collect(),
        };
    }
    nodes
}

// ────────────────────────────────────────────────────────────────────────────
// Format checks
// ────────────────────────────────────────────────────────────────────────────

pub fn is_digits(text: &str, len: usize) -> bool {
    text.len() == len && text.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

/// Absolute http(s) URL with a dotted host. A bare `host/path` is read as https.
pub fn is_url(text: &str) -> bool {
    let text = text.trim();
    if text.contains(char::is_whitespace) {
        return false;
    }
    let candidate = if text.contains("://") {
        text.to_string()
    } else {
        format!("https://{text}")
    };
    match Url::parse(&candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| h.contains('.'))
        }
        Err(_) => false,
    }
}

pub fn is_decimal(text: &str) -> bool {
    text.trim()
        .parse::<f64>()
        .is_ok_and(|v| v.is_finite() && v >= 0.0)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM` (first of the month) and RFC 3339 timestamps.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d").ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
