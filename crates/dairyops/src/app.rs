//! Composition root: everything a front end needs, wired from one config.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::broadcast::{StoreEventBroadcaster, ToastBroadcaster};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::forms::{process_log_form, test_report_form, ProcessLogForm, TestReportForm};
use crate::store::{Compensation, SteriMilkBatchCoordinator, Stores};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub client: ApiClient,
    pub stores: Stores,
    pub events: StoreEventBroadcaster,
    pub toasts: ToastBroadcaster,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api)?;
        let events = StoreEventBroadcaster::default();
        let toasts = ToastBroadcaster::default();
        let stores = Stores::new(&client, config.cache.fetch_window(), &events);

        log::info!("Connected stores to {}", client.base_url());

        Ok(Self {
            config: Arc::new(config),
            client,
            stores,
            events,
            toasts,
        })
    }

    pub fn process_log_form(&self) -> ProcessLogForm {
        process_log_form(&self.stores, self.toasts.clone(), &self.config.forms)
    }

    pub fn test_report_form(&self) -> TestReportForm {
        test_report_form(&self.stores, self.toasts.clone(), &self.config.forms)
    }

    pub fn batch_coordinator(&self, compensation: Compensation) -> SteriMilkBatchCoordinator {
        SteriMilkBatchCoordinator::new(
            Arc::clone(&self.stores.steri_milk_process_logs),
            Arc::clone(&self.stores.steri_milk_test_reports),
        )
        .with_compensation(compensation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DairyError;

    #[test]
    fn test_context_wires_forms() {
        let ctx = AppContext::new(ClientConfig::with_base_url("http://localhost:9/api")).unwrap();

        let form = ctx.process_log_form();
        assert_eq!(form.step_count(), 3);
        assert!(!form.is_open());
        assert_eq!(ctx.test_report_form().step_count(), 6);
        assert_eq!(
            ctx.batch_coordinator(Compensation::Rollback).compensation(),
            Compensation::Rollback
        );
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        let result = AppContext::new(ClientConfig::with_base_url("not a url"));
        assert!(matches!(result, Err(DairyError::Api(_))));
    }
}
