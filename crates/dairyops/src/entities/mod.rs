//! Backend resources as typed records.
//!
//! Every resource is a [`Record<T>`]: server identity and timestamps around a
//! resource-specific spec `T` implementing [`ResourceSpec`].

pub mod kind;
pub mod people;
pub mod plant;
pub mod production;
pub mod record;
pub mod steri_milk;
pub mod supply;

pub use kind::{InsertPosition, ResourceKind, StorePolicy};
pub use people::{User, UserRole, UserRoleSpec, UserSpec};
pub use plant::{Machine, MachineSpec, Silo, SiloSpec, Tanker, TankerSpec};
pub use production::{
    FilmaticLinesForm, FilmaticLinesFormSpec, PlannedMaterial, Process, ProcessSpec,
    ProductionPlan, ProductionPlanSpec,
};
pub use record::{NewRecord, Record, ResourceSpec};
pub use steri_milk::{
    IncubationResult, OrganolepticResult, ProcessStage, SampleDetails, StageReading, StageSet,
    SteriMilkBatch, SteriMilkProcessLog, SteriMilkProcessLogSpec, SteriMilkTestReport,
    SteriMilkTestReportSpec,
};
pub use supply::{
    CollectedProduct, DriversForm, DriversFormSpec, RawMaterial, RawMaterialSpec, Supplier,
    SupplierSpec,
};
