//! Production processes, plans and filmatic line forms.

use serde::{Deserialize, Serialize};

use super::kind::ResourceKind;
use super::record::{Record, ResourceSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub name: String,
    #[serde(default)]
    pub raw_material_ids: Vec<String>,
}

impl ResourceSpec for ProcessSpec {
    const KIND: ResourceKind = ResourceKind::Process;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMaterial {
    pub raw_material_id: String,
    pub requested_amount: f64,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlanSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub supervisor: String,
    #[serde(default)]
    pub raw_materials: Vec<PlannedMaterial>,
}

impl ResourceSpec for ProductionPlanSpec {
    const KIND: ResourceKind = ResourceKind::ProductionPlan;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmaticLinesFormSpec {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holding_tank_bmt: Option<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_id: Option<String>,
}

impl ResourceSpec for FilmaticLinesFormSpec {
    const KIND: ResourceKind = ResourceKind::FilmaticLinesForm;
}

pub type Process = Record<ProcessSpec>;
pub type ProductionPlan = Record<ProductionPlanSpec>;
pub type FilmaticLinesForm = Record<FilmaticLinesFormSpec>;
