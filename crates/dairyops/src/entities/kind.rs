//! Resource kinds known to the backend.

use serde::{Deserialize, Serialize};

/// Where a freshly created record lands in a store's item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Prepend,
    Append,
}

/// Per-resource store behaviour after a successful create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorePolicy {
    pub insert_position: InsertPosition,
    /// Clear `last_fetched` so the next list fetch goes to the network.
    pub invalidate_on_create: bool,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            insert_position: InsertPosition::Prepend,
            invalidate_on_create: true,
        }
    }
}

/// The kind of backend resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    UserRole,
    Machine,
    Silo,
    Supplier,
    RawMaterial,
    Process,
    ProductionPlan,
    DriversForm,
    Tanker,
    FilmaticLinesForm,
    SteriMilkProcessLog,
    SteriMilkTestReport,
}

impl ResourceKind {
    /// Path segment of the resource below the API base URL.
    pub fn segment(&self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::UserRole => "user-roles",
            ResourceKind::Machine => "machine",
            ResourceKind::Silo => "silo",
            ResourceKind::Supplier => "supplier",
            ResourceKind::RawMaterial => "raw-material",
            ResourceKind::Process => "process",
            ResourceKind::ProductionPlan => "production-plan",
            ResourceKind::DriversForm => "drivers-form",
            ResourceKind::Tanker => "tanker",
            ResourceKind::FilmaticLinesForm => "filmatic-lines-form",
            ResourceKind::SteriMilkProcessLog => "steri-milk-process-log",
            ResourceKind::SteriMilkTestReport => "steri-milk-test-report",
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segment())
    }

    /// Plural noun used in user-facing messages.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::User => "users",
            ResourceKind::UserRole => "user roles",
            ResourceKind::Machine => "machines",
            ResourceKind::Silo => "silos",
            ResourceKind::Supplier => "suppliers",
            ResourceKind::RawMaterial => "raw materials",
            ResourceKind::Process => "processes",
            ResourceKind::ProductionPlan => "production plans",
            ResourceKind::DriversForm => "driver forms",
            ResourceKind::Tanker => "tankers",
            ResourceKind::FilmaticLinesForm => "filmatic lines forms",
            ResourceKind::SteriMilkProcessLog => "steri milk process logs",
            ResourceKind::SteriMilkTestReport => "steri milk test reports",
        }
    }

    /// Whether the backend exposes a `/<resource>/filter` query endpoint.
    pub fn supports_filter(&self) -> bool {
        matches!(self, ResourceKind::Supplier)
    }

    /// Create behaviour as each resource has always behaved.
    ///
    /// Roles, raw materials and tankers append; the rest prepend. Silos and
    /// tankers keep their fetch timestamp after a create.
    pub fn default_policy(&self) -> StorePolicy {
        match self {
            ResourceKind::UserRole | ResourceKind::RawMaterial => StorePolicy {
                insert_position: InsertPosition::Append,
                invalidate_on_create: true,
            },
            ResourceKind::Tanker => StorePolicy {
                insert_position: InsertPosition::Append,
                invalidate_on_create: false,
            },
            ResourceKind::Silo => StorePolicy {
                insert_position: InsertPosition::Prepend,
                invalidate_on_create: false,
            },
            _ => StorePolicy::default(),
        }
    }

    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::User,
            ResourceKind::UserRole,
            ResourceKind::Machine,
            ResourceKind::Silo,
            ResourceKind::Supplier,
            ResourceKind::RawMaterial,
            ResourceKind::Process,
            ResourceKind::ProductionPlan,
            ResourceKind::DriversForm,
            ResourceKind::Tanker,
            ResourceKind::FilmaticLinesForm,
            ResourceKind::SteriMilkProcessLog,
            ResourceKind::SteriMilkTestReport,
        ]
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segment())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('/').to_lowercase();
        ResourceKind::all()
            .iter()
            .copied()
            .find(|kind| kind.segment() == normalized)
            .ok_or_else(|| format!("Unknown resource kind: {}", s))
    }
}
