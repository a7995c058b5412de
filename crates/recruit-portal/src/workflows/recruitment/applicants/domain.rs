use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workflows::recruitment::departments::{DepartmentCode, DepartmentRegistry};

/// Identifier wrapper for applicant accounts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

/// Descriptive contact fields. Any of them may be missing in stored documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicantProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub registration_number: Option<String>,
    pub phone: Option<String>,
}

impl ApplicantProfile {
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    pub fn registration_number_or_empty(&self) -> &str {
        self.registration_number.as_deref().unwrap_or_default()
    }
}

/// Dynamic form field answer keyed by its field identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicField {
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Free-form answers for a single department form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBundle {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dynamic_fields: BTreeMap<String, DynamicField>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl AnswerBundle {
    /// True when at least one answer, static or dynamic, carries a non-blank value.
    pub fn has_content(&self) -> bool {
        self.fields.values().any(value_is_filled)
            || self
                .dynamic_fields
                .values()
                .any(|field| value_is_filled(&field.value))
    }
}

fn value_is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => items.iter().any(value_is_filled),
        Value::Object(map) => map.values().any(value_is_filled),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Review outcome for one department.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Rejected,
    /// Also what unrecognized stored values read as.
    #[default]
    #[serde(other)]
    Pending,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Reviewer decision for a department. A new write replaces the previous entry whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Status lookup result; a department without an entry reads as pending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepartmentStatus {
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&StatusEntry> for DepartmentStatus {
    fn from(entry: &StatusEntry) -> Self {
        Self {
            status: entry.status,
            feedback: entry.feedback.clone(),
            updated_at: Some(entry.updated_at),
        }
    }
}

/// Applicant document as stored. Department keys are kept exactly as they were written, which
/// includes legacy aliases; lookups go through the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRecord {
    pub id: ApplicantId,
    #[serde(default)]
    pub profile: ApplicantProfile,
    #[serde(default)]
    pub selected_departments: Vec<String>,
    #[serde(default)]
    pub department_answers: BTreeMap<String, AnswerBundle>,
    #[serde(default)]
    pub department_statuses: BTreeMap<String, StatusEntry>,
    #[serde(default)]
    pub application_submitted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Legacy single status written by older admin tooling. Never consulted for classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
}

impl ApplicantRecord {
    pub fn new(id: ApplicantId, profile: ApplicantProfile, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            profile,
            selected_departments: Vec::new(),
            department_answers: BTreeMap::new(),
            department_statuses: BTreeMap::new(),
            application_submitted: false,
            submitted_at: None,
            created_at: Some(created_at),
            status: None,
        }
    }

    /// Selected departments after normalization, first occurrence wins.
    pub fn selected_codes(&self, registry: &DepartmentRegistry) -> Vec<DepartmentCode> {
        registry.normalize_all(&self.selected_departments)
    }

    pub fn has_selected(&self, registry: &DepartmentRegistry, code: &DepartmentCode) -> bool {
        self.selected_departments
            .iter()
            .any(|raw| registry.normalize(raw) == *code)
    }

    /// Answers saved for a department, whatever spelling either side uses.
    pub fn answers(&self, registry: &DepartmentRegistry, raw_department: &str) -> Option<&AnswerBundle> {
        let code = registry.normalize(raw_department);
        find_by_code(registry, &self.department_answers, &code)
    }

    /// Status for a department, pending when no reviewer has written one.
    pub fn status(&self, registry: &DepartmentRegistry, raw_department: &str) -> DepartmentStatus {
        let code = registry.normalize(raw_department);
        self.status_for(registry, &code)
    }

    pub fn status_for(&self, registry: &DepartmentRegistry, code: &DepartmentCode) -> DepartmentStatus {
        find_by_code(registry, &self.department_statuses, code)
            .map(DepartmentStatus::from)
            .unwrap_or_default()
    }

    /// Every stored status entry keyed by normalized code. When two spellings of one department
    /// both carry an entry, the canonical spelling wins.
    pub fn status_entries(&self, registry: &DepartmentRegistry) -> BTreeMap<DepartmentCode, &StatusEntry> {
        let mut entries = BTreeMap::new();
        for (raw, entry) in &self.department_statuses {
            let code = registry.normalize(raw);
            let canonical = raw.as_str() == code.as_str();
            if canonical || !entries.contains_key(&code) {
                entries.insert(code, entry);
            }
        }
        entries
    }

    /// Submission time when present, account creation time otherwise.
    pub fn activity_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at.or(self.created_at)
    }
}

fn find_by_code<'a, T>(
    registry: &DepartmentRegistry,
    entries: &'a BTreeMap<String, T>,
    code: &DepartmentCode,
) -> Option<&'a T> {
    if let Some(entry) = entries.get(code.as_str()) {
        return Some(entry);
    }

    entries
        .iter()
        .find(|(raw, _)| registry.normalize(raw) == *code)
        .map(|(_, entry)| entry)
}
