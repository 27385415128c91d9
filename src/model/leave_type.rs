use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Vacation,
    Sick,
    Personal,
    Emergency,
    Maternity,
    Paternity,
    Bereavement,
    Other,
}

/// Static entitlement policy for a leave type. Allocations are in days;
/// semi-annual types split the annual allocation evenly across H1/H2.
#[derive(Debug, Clone, Copy)]
pub struct LeavePolicy {
    pub label: &'static str,
    pub annual_allocation: f64,
    pub semi_annual: bool,
    pub requires_admin_approval: bool,
    pub requires_document: bool,
}

const VACATION: LeavePolicy = LeavePolicy {
    label: "Vacation",
    annual_allocation: 24.0,
    semi_annual: true,
    requires_admin_approval: false,
    requires_document: false,
};

const SICK: LeavePolicy = LeavePolicy {
    label: "Sick Leave",
    annual_allocation: 10.0,
    semi_annual: false,
    requires_admin_approval: true,
    requires_document: true,
};

const PERSONAL: LeavePolicy = LeavePolicy {
    label: "Personal Leave",
    annual_allocation: 5.0,
    semi_annual: false,
    requires_admin_approval: false,
    requires_document: false,
};

const EMERGENCY: LeavePolicy = LeavePolicy {
    label: "Emergency Leave",
    annual_allocation: 3.0,
    semi_annual: false,
    requires_admin_approval: true,
    requires_document: false,
};

const MATERNITY: LeavePolicy = LeavePolicy {
    label: "Maternity Leave",
    annual_allocation: 90.0,
    semi_annual: false,
    requires_admin_approval: true,
    requires_document: true,
};

const PATERNITY: LeavePolicy = LeavePolicy {
    label: "Paternity Leave",
    annual_allocation: 10.0,
    semi_annual: false,
    requires_admin_approval: true,
    requires_document: true,
};

const BEREAVEMENT: LeavePolicy = LeavePolicy {
    label: "Bereavement Leave",
    annual_allocation: 5.0,
    semi_annual: false,
    requires_admin_approval: true,
    requires_document: true,
};

const OTHER: LeavePolicy = LeavePolicy {
    label: "Other Leave",
    annual_allocation: 5.0,
    semi_annual: false,
    requires_admin_approval: false,
    requires_document: false,
};

impl LeaveType {
    pub const fn policy(self) -> &'static LeavePolicy {
        match self {
            LeaveType::Vacation => &VACATION,
            LeaveType::Sick => &SICK,
            LeaveType::Personal => &PERSONAL,
            LeaveType::Emergency => &EMERGENCY,
            LeaveType::Maternity => &MATERNITY,
            LeaveType::Paternity => &PATERNITY,
            LeaveType::Bereavement => &BEREAVEMENT,
            LeaveType::Other => &OTHER,
        }
    }
}
