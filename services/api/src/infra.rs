use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use recruit_portal::workflows::recruitment::applicants::{
    AnswerBundle, ApplicantId, ApplicantRecord, ApplicantRepository, RepositoryError, StatusEntry,
};
use recruit_portal::workflows::recruitment::DepartmentCode;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local applicant store.
///
/// Records keep their insertion order so listings break sort ties the same way on every run.
/// Department writes touch a single map entry under the lock, so reviews of different
/// departments for the same applicant never overwrite each other.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicantRepository {
    store: Arc<Mutex<ApplicantStore>>,
}

#[derive(Default)]
struct ApplicantStore {
    records: Vec<ApplicantRecord>,
    positions: HashMap<ApplicantId, usize>,
}

impl InMemoryApplicantRepository {
    fn modify(
        &self,
        id: &ApplicantId,
        apply: impl FnOnce(&mut ApplicantRecord),
    ) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        let position = *guard.positions.get(id).ok_or(RepositoryError::NotFound)?;
        apply(&mut guard.records[position]);
        Ok(())
    }
}

impl ApplicantRepository for InMemoryApplicantRepository {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        if guard.positions.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        let position = guard.records.len();
        guard.positions.insert(record.id.clone(), position);
        guard.records.push(record.clone());
        Ok(record)
    }

    fn load_all(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.records.clone())
    }

    fn load(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard
            .positions
            .get(id)
            .map(|position| guard.records[*position].clone()))
    }

    fn write_selected_departments(
        &self,
        id: &ApplicantId,
        departments: &[DepartmentCode],
    ) -> Result<(), RepositoryError> {
        self.modify(id, |record| {
            record.selected_departments = departments
                .iter()
                .map(|code| code.as_str().to_string())
                .collect();
        })
    }

    fn write_department_status(
        &self,
        id: &ApplicantId,
        department: &DepartmentCode,
        entry: StatusEntry,
    ) -> Result<(), RepositoryError> {
        self.modify(id, |record| {
            record
                .department_statuses
                .insert(department.as_str().to_string(), entry);
        })
    }

    fn write_department_answers(
        &self,
        id: &ApplicantId,
        department: &DepartmentCode,
        answers: AnswerBundle,
    ) -> Result<(), RepositoryError> {
        self.modify(id, |record| {
            record
                .department_answers
                .insert(department.as_str().to_string(), answers);
        })
    }

    fn mark_submitted(&self, id: &ApplicantId, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        self.modify(id, |record| {
            if !record.application_submitted {
                record.application_submitted = true;
                record.submitted_at = Some(at);
            }
        })
    }
}
