//! One store per backend resource, sharing a client and an event channel.

use std::sync::Arc;
use std::time::Duration;

use super::resource_store::ResourceStore;
use crate::api::ApiClient;
use crate::broadcast::StoreEventBroadcaster;
use crate::entities::{
    DriversFormSpec, FilmaticLinesFormSpec, MachineSpec, ProcessSpec, ProductionPlanSpec,
    RawMaterialSpec, ResourceKind, SiloSpec, SteriMilkProcessLogSpec, SteriMilkTestReportSpec,
    SupplierSpec, TankerSpec, UserRoleSpec, UserSpec,
};

#[derive(Clone)]
pub struct Stores {
    pub users: Arc<ResourceStore<UserSpec>>,
    pub user_roles: Arc<ResourceStore<UserRoleSpec>>,
    pub machines: Arc<ResourceStore<MachineSpec>>,
    pub silos: Arc<ResourceStore<SiloSpec>>,
    pub suppliers: Arc<ResourceStore<SupplierSpec>>,
    pub raw_materials: Arc<ResourceStore<RawMaterialSpec>>,
    pub processes: Arc<ResourceStore<ProcessSpec>>,
    pub production_plans: Arc<ResourceStore<ProductionPlanSpec>>,
    pub drivers_forms: Arc<ResourceStore<DriversFormSpec>>,
    pub tankers: Arc<ResourceStore<TankerSpec>>,
    pub filmatic_lines_forms: Arc<ResourceStore<FilmaticLinesFormSpec>>,
    pub steri_milk_process_logs: Arc<ResourceStore<SteriMilkProcessLogSpec>>,
    pub steri_milk_test_reports: Arc<ResourceStore<SteriMilkTestReportSpec>>,
}

impl Stores {
    pub fn new(client: &ApiClient, cache_window: Duration, events: &StoreEventBroadcaster) -> Self {
        fn store<T: crate::entities::ResourceSpec>(
            client: &ApiClient,
            cache_window: Duration,
            events: &StoreEventBroadcaster,
        ) -> Arc<ResourceStore<T>> {
            Arc::new(ResourceStore::from_client(
                client,
                cache_window,
                events.clone(),
            ))
        }

        let stores = Self {
            users: store(client, cache_window, events),
            user_roles: store(client, cache_window, events),
            machines: store(client, cache_window, events),
            silos: store(client, cache_window, events),
            suppliers: store(client, cache_window, events),
            raw_materials: store(client, cache_window, events),
            processes: store(client, cache_window, events),
            production_plans: store(client, cache_window, events),
            drivers_forms: store(client, cache_window, events),
            tankers: store(client, cache_window, events),
            filmatic_lines_forms: store(client, cache_window, events),
            steri_milk_process_logs: store(client, cache_window, events),
            steri_milk_test_reports: store(client, cache_window, events),
        };

        log::debug!(
            "Initialized {} resource stores with a {:?} fetch window",
            ResourceKind::all().len(),
            cache_window
        );
        stores
    }

    /// Marks every store stale.
    pub fn invalidate_all(&self) {
        self.users.invalidate();
        self.user_roles.invalidate();
        self.machines.invalidate();
        self.silos.invalidate();
        self.suppliers.invalidate();
        self.raw_materials.invalidate();
        self.processes.invalidate();
        self.production_plans.invalidate();
        self.drivers_forms.invalidate();
        self.tankers.invalidate();
        self.filmatic_lines_forms.invalidate();
        self.steri_milk_process_logs.invalidate();
        self.steri_milk_test_reports.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiSettings;
    use crate::entities::InsertPosition;

    fn client() -> ApiClient {
        ApiClient::new(&ApiSettings {
            base_url: "http://localhost:9".to_string(),
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_stores_carry_per_kind_policy() {
        let stores = Stores::new(&client(), Duration::from_secs(5), &StoreEventBroadcaster::default());

        assert_eq!(stores.silos.kind(), ResourceKind::Silo);
        assert!(!stores.silos.policy().invalidate_on_create);
        assert_eq!(
            stores.tankers.policy().insert_position,
            InsertPosition::Append
        );
        assert_eq!(
            stores.steri_milk_process_logs.policy().insert_position,
            InsertPosition::Prepend
        );
        assert!(stores.users.items().is_empty());
    }
}
