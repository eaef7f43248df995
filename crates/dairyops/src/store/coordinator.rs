//! Process log plus dependent test report, committed as one workflow.
//!
//! The backend has no transaction spanning both resources. The log is created
//! first; if the report then fails the caller chooses whether the log stays or
//! is deleted again.

use std::sync::Arc;

use log::{error, info, warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info_span, Instrument};

use super::error::StoreError;
use super::resource_store::ResourceStore;
use crate::entities::{
    SteriMilkProcessLog, SteriMilkProcessLogSpec, SteriMilkTestReport, SteriMilkTestReportSpec,
};

/// What to do with a committed log when its report fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compensation {
    /// Leave the log in place; the report can be submitted later.
    #[default]
    KeepCommitted,
    /// Delete the log so neither record exists.
    Rollback,
}

#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// Nothing was written.
    #[error("Process log was not saved: {0}")]
    LogFailed(#[source] StoreError),

    /// The log exists but its report does not.
    #[error("Process log {} was saved but its test report failed: {source}", .log.id)]
    PartiallyCommitted {
        log: Box<SteriMilkProcessLog>,
        #[source]
        source: StoreError,
    },

    /// The report failed and the log was deleted again, unless `rollback_error` says otherwise.
    #[error("Test report failed and process log {log_id} was rolled back: {source}")]
    RolledBack {
        log_id: String,
        #[source]
        source: StoreError,
        rollback_error: Option<String>,
    },
}

impl CoordinatorError {
    /// True when a process log was left behind on the server.
    pub fn left_log_behind(&self) -> bool {
        match self {
            CoordinatorError::LogFailed(_) => false,
            CoordinatorError::PartiallyCommitted { .. } => true,
            CoordinatorError::RolledBack { rollback_error, .. } => rollback_error.is_some(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchRecords {
    pub log: SteriMilkProcessLog,
    pub report: SteriMilkTestReport,
}

pub struct SteriMilkBatchCoordinator {
    logs: Arc<ResourceStore<SteriMilkProcessLogSpec>>,
    reports: Arc<ResourceStore<SteriMilkTestReportSpec>>,
    compensation: Compensation,
}

impl SteriMilkBatchCoordinator {
    pub fn new(
        logs: Arc<ResourceStore<SteriMilkProcessLogSpec>>,
        reports: Arc<ResourceStore<SteriMilkTestReportSpec>>,
    ) -> Self {
        Self {
            logs,
            reports,
            compensation: Compensation::default(),
        }
    }

    pub fn with_compensation(mut self, compensation: Compensation) -> Self {
        self.compensation = compensation;
        self
    }

    pub fn compensation(&self) -> Compensation {
        self.compensation
    }

    /// Creates the log, then the report built from it.
    ///
    /// `build_report` sees the committed log; its `process_log_id` is always
    /// overwritten with the log's id.
    pub async fn record_batch<F>(
        &self,
        log_spec: SteriMilkProcessLogSpec,
        build_report: F,
        cancel: &CancellationToken,
    ) -> Result<BatchRecords, CoordinatorError>
    where
        F: FnOnce(&SteriMilkProcessLog) -> SteriMilkTestReportSpec,
    {
        let batch_number = log_spec.batch.batch_number;
        let span = info_span!("steri_milk_batch", batch_number);

        async move {
            let log = self
                .logs
                .create(log_spec, cancel)
                .await
                .map_err(CoordinatorError::LogFailed)?;
            info!("Committed process log {} for batch {}", log.id, batch_number);

            let mut report_spec = build_report(&log);
            report_spec.process_log_id = log.id.clone();

            match self.reports.create(report_spec, cancel).await {
                Ok(report) => {
                    info!("Committed test report {} for log {}", report.id, log.id);
                    Ok(BatchRecords { log, report })
                }
                Err(source) => self.compensate(log, source).await,
            }
        }
        .instrument(span)
        .await
    }

    async fn compensate(
        &self,
        log: SteriMilkProcessLog,
        source: StoreError,
    ) -> Result<BatchRecords, CoordinatorError> {
        match self.compensation {
            Compensation::KeepCommitted => {
                warn!(
                    "Test report for process log {} failed, keeping the log: {}",
                    log.id, source
                );
                Err(CoordinatorError::PartiallyCommitted {
                    log: Box::new(log),
                    source,
                })
            }
            Compensation::Rollback => {
                warn!(
                    "Test report for process log {} failed, rolling back: {}",
                    log.id, source
                );
                // The caller's token may already be cancelled; the rollback must still run.
                let rollback = self.logs.delete(&log.id, &CancellationToken::new()).await;
                let rollback_error = match rollback {
                    Ok(()) => None,
                    Err(e) => {
                        error!("Rollback of process log {} failed: {}", log.id, e);
                        Some(e.user_message())
                    }
                };
                Err(CoordinatorError::RolledBack {
                    log_id: log.id,
                    source,
                    rollback_error,
                })
            }
        }
    }
}
