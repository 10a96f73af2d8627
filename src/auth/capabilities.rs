use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Roles a lab account can hold. Stored lowercase in the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Dentist,
    Technician,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Dentist => "dentist",
            Role::Technician => "technician",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dentist" => Ok(Role::Dentist),
            "technician" => Ok(Role::Technician),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Fine-grained actions gated per role. The wire form matches the
/// serialized names below, e.g. "cases:update-status".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Capability {
    #[serde(rename = "cases:read")]
    CasesRead,
    #[serde(rename = "cases:create")]
    CasesCreate,
    #[serde(rename = "cases:update")]
    CasesUpdate,
    #[serde(rename = "cases:update-status")]
    CasesUpdateStatus,
    #[serde(rename = "cases:delete")]
    CasesDelete,
    #[serde(rename = "invoices:read")]
    InvoicesRead,
    #[serde(rename = "invoices:manage")]
    InvoicesManage,
    #[serde(rename = "invoices:record-payment")]
    InvoicesRecordPayment,
    #[serde(rename = "inventory:read")]
    InventoryRead,
    #[serde(rename = "inventory:manage")]
    InventoryManage,
    #[serde(rename = "patients:read")]
    PatientsRead,
    #[serde(rename = "patients:manage")]
    PatientsManage,
    #[serde(rename = "dentists:read")]
    DentistsRead,
    #[serde(rename = "messages:use")]
    MessagesUse,
    #[serde(rename = "appointments:read")]
    AppointmentsRead,
    #[serde(rename = "appointments:manage")]
    AppointmentsManage,
    #[serde(rename = "reports:read")]
    ReportsRead,
    #[serde(rename = "users:manage")]
    UsersManage,
}

/// The full grant list for a role. Middleware and the capabilities
/// endpoint both read from this table so they can never disagree.
pub fn capabilities_for(role: Role) -> &'static [Capability] {
    use Capability::*;

    match role {
        Role::Dentist => &[
            CasesRead,
            CasesCreate,
            CasesUpdate,
            InvoicesRead,
            PatientsRead,
            PatientsManage,
            DentistsRead,
            MessagesUse,
            AppointmentsRead,
            AppointmentsManage,
        ],
        Role::Technician => &[
            CasesRead,
            CasesUpdate,
            CasesUpdateStatus,
            InventoryRead,
            InventoryManage,
            PatientsRead,
            DentistsRead,
            MessagesUse,
            AppointmentsRead,
        ],
        Role::Admin => &[
            CasesRead,
            CasesCreate,
            CasesUpdate,
            CasesUpdateStatus,
            CasesDelete,
            InvoicesRead,
            InvoicesManage,
            InvoicesRecordPayment,
            InventoryRead,
            InventoryManage,
            PatientsRead,
            PatientsManage,
            DentistsRead,
            MessagesUse,
            AppointmentsRead,
            AppointmentsManage,
            ReportsRead,
            UsersManage,
        ],
    }
}

pub fn role_has_capability(role: Role, capability: Capability) -> bool {
    capabilities_for(role).contains(&capability)
}
