//! In-memory job registry.
//!
//! One writer per job id (the render task); the poll path only reads.
//! Job state lives for the process lifetime.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use renderhub_core::model::{JobPayload, JobRecord, JobStatus, OutputFormat};

/// Map from job id to registry-owned job state.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<Uuid, JobRecord>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh pending record and return a snapshot of it.
    pub fn insert_pending(&self, payload: JobPayload) -> JobRecord {
        let record = JobRecord::pending(payload);
        self.jobs.insert(record.id, record.clone());
        record
    }

    /// Snapshot the current record for a job.
    pub fn get(&self, id: Uuid) -> Option<JobRecord> {
        self.jobs.get(&id).map(|entry| entry.value().clone())
    }

    /// Transition a job to `done` with its artifact URL and format.
    pub fn mark_done(&self, id: Uuid, url: String, format: OutputFormat) {
        if let Some(mut entry) = self.jobs.get_mut(&id) {
            entry.status = JobStatus::Done;
            entry.finished_at = Some(Utc::now());
            entry.url = Some(url);
            entry.format = Some(format);
        }
    }

    /// Transition a job to `error` with a message.
    pub fn mark_error(&self, id: Uuid, message: String) {
        if let Some(mut entry) = self.jobs.get_mut(&id) {
            entry.status = JobStatus::Error;
            entry.finished_at = Some(Utc::now());
            entry.error = Some(message);
        }
    }

    /// Number of known jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
