pub mod api;
pub mod app;
pub mod broadcast;
pub mod config;
pub mod entities;
pub mod error;
pub mod forms;
pub mod logging;
pub mod store;
pub mod wizard;

pub use api::{ApiClient, ListFilters, ResourceApi, RestResource};
pub use app::AppContext;
pub use broadcast::{StoreEventBroadcaster, Toast, ToastBroadcaster};
pub use config::{load_config, ClientConfig};
pub use entities::{NewRecord, Record, ResourceKind, ResourceSpec};
pub use error::{ApiError, ConfigError, CoordinatorError, DairyError, Result, StoreError, WizardError};
pub use forms::{ProcessLogForm, TestReportForm};
pub use logging::init_logging;
pub use store::{Compensation, ResourceStore, SteriMilkBatchCoordinator, Stores};
pub use wizard::{FormMode, WizardDraft, WizardForm};
