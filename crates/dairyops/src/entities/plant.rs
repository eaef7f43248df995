//! Plant equipment: machines, silos and tankers.

use serde::{Deserialize, Serialize};

use super::kind::ResourceKind;
use super::record::{Record, ResourceSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSpec {
    pub name: String,
    pub category: String,
    pub location: String,
    pub serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ResourceSpec for MachineSpec {
    const KIND: ResourceKind = ResourceKind::Machine;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiloSpec {
    pub name: String,
    pub serial_number: String,
    pub location: String,
    /// Litres currently held.
    #[serde(default)]
    pub milk_volume: f64,
    /// Litres.
    pub capacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ResourceSpec for SiloSpec {
    const KIND: ResourceKind = ResourceKind::Silo;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankerSpec {
    pub reg_number: String,
    pub capacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
}

impl ResourceSpec for TankerSpec {
    const KIND: ResourceKind = ResourceKind::Tanker;
}

pub type Machine = Record<MachineSpec>;
pub type Silo = Record<SiloSpec>;
pub type Tanker = Record<TankerSpec>;
