//! Milk supply: suppliers, raw materials and driver collection forms.

use serde::{Deserialize, Serialize};

use super::kind::ResourceKind;
use super::record::{Record, ResourceSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierSpec {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_supplied: Option<f64>,
}

impl ResourceSpec for SupplierSpec {
    const KIND: ResourceKind = ResourceKind::Supplier;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMaterialSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unit_of_measure: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_stock_level: Option<f64>,
}

impl ResourceSpec for RawMaterialSpec {
    const KIND: ResourceKind = ResourceKind::RawMaterial;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedProduct {
    pub raw_material_id: String,
    pub supplier_id: String,
    pub collected_amount: f64,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriversFormSpec {
    pub driver_id: String,
    pub tanker_id: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub delivered: bool,
    #[serde(default)]
    pub rejected: bool,
    #[serde(default)]
    pub drivers_form_collected_products: Vec<CollectedProduct>,
}

impl ResourceSpec for DriversFormSpec {
    const KIND: ResourceKind = ResourceKind::DriversForm;
}

pub type Supplier = Record<SupplierSpec>;
pub type RawMaterial = Record<RawMaterialSpec>;
pub type DriversForm = Record<DriversFormSpec>;
