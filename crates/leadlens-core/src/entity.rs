//! Record shapes of the five entity collections.
//!
//! Field names follow the data source's column names so snapshots can be
//! deserialised as delivered. All categorical attributes are optional; `null`,
//! a missing column and the empty string are all treated as blank by
//! [`non_blank`].

use serde::{Deserialize, Serialize};

use crate::filter::FilterField;
use crate::ids::{AccountKey, CenterKey};
use crate::revenue::RawRevenue;

/// The five entity types of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Account,
    Center,
    Function,
    Service,
    Prospect,
}

impl EntityKind {
    /// Every entity kind in pipeline order.
    pub const ALL: [EntityKind; 5] = [
        Self::Account,
        Self::Center,
        Self::Function,
        Self::Service,
        Self::Prospect,
    ];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Center => "center",
            Self::Function => "function",
            Self::Service => "service",
            Self::Prospect => "prospect",
        }
    }
}

/// Returns the value as a string slice unless it is missing or empty.
#[must_use]
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A company, keyed by its global legal name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "account_global_legal_name")]
    pub key: AccountKey,
    #[serde(rename = "account_hq_country", default)]
    pub country: Option<String>,
    #[serde(rename = "account_hq_region", default)]
    pub region: Option<String>,
    #[serde(rename = "account_hq_industry", default)]
    pub industry: Option<String>,
    #[serde(rename = "account_hq_sub_industry", default)]
    pub sub_industry: Option<String>,
    #[serde(rename = "account_primary_category", default)]
    pub primary_category: Option<String>,
    #[serde(rename = "account_primary_nature", default)]
    pub primary_nature: Option<String>,
    #[serde(rename = "account_nasscom_status", default)]
    pub nasscom_status: Option<String>,
    #[serde(rename = "account_hq_employee_range", default)]
    pub employee_range: Option<String>,
    #[serde(rename = "account_center_employees_range", default)]
    pub center_employee_range: Option<String>,
    /// Raw revenue as delivered; normalised through a [`crate::RevenueParser`].
    #[serde(rename = "account_hq_revenue", default)]
    pub revenue: Option<RawRevenue>,
    #[serde(rename = "account_hq_city", default)]
    pub hq_city: Option<String>,
    #[serde(rename = "account_hq_website", default)]
    pub website: Option<String>,
}

impl Account {
    /// Creates an account with every attribute blank.
    #[must_use]
    pub fn new(key: impl Into<AccountKey>) -> Self {
        Self {
            key: key.into(),
            country: None,
            region: None,
            industry: None,
            sub_industry: None,
            primary_category: None,
            primary_nature: None,
            nasscom_status: None,
            employee_range: None,
            center_employee_range: None,
            revenue: None,
            hq_city: None,
            website: None,
        }
    }

    /// Value of an account-level facet field; `None` for blanks and for
    /// fields that belong to another entity.
    #[must_use]
    pub fn field(&self, field: FilterField) -> Option<&str> {
        let value = match field {
            FilterField::AccountCountry => &self.country,
            FilterField::AccountRegion => &self.region,
            FilterField::AccountIndustry => &self.industry,
            FilterField::AccountSubIndustry => &self.sub_industry,
            FilterField::AccountPrimaryCategory => &self.primary_category,
            FilterField::AccountPrimaryNature => &self.primary_nature,
            FilterField::AccountNasscomStatus => &self.nasscom_status,
            FilterField::AccountEmployeesRange => &self.employee_range,
            FilterField::AccountCenterEmployees => &self.center_employee_range,
            _ => return None,
        };
        non_blank(value)
    }
}

/// An operating center owned by an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Center {
    #[serde(rename = "cn_unique_key")]
    pub key: CenterKey,
    #[serde(rename = "account_global_legal_name")]
    pub account: AccountKey,
    #[serde(rename = "center_name", default)]
    pub name: Option<String>,
    #[serde(rename = "center_type", default)]
    pub center_type: Option<String>,
    #[serde(rename = "center_focus", default)]
    pub focus: Option<String>,
    #[serde(rename = "center_city", default)]
    pub city: Option<String>,
    #[serde(rename = "center_state", default)]
    pub state: Option<String>,
    #[serde(rename = "center_country", default)]
    pub country: Option<String>,
    #[serde(rename = "center_employees_range", default)]
    pub employee_range: Option<String>,
    #[serde(rename = "center_status", default)]
    pub status: Option<String>,
}

impl Center {
    /// Creates a center with every attribute blank.
    #[must_use]
    pub fn new(key: impl Into<CenterKey>, account: impl Into<AccountKey>) -> Self {
        Self {
            key: key.into(),
            account: account.into(),
            name: None,
            center_type: None,
            focus: None,
            city: None,
            state: None,
            country: None,
            employee_range: None,
            status: None,
        }
    }

    /// Value of a center-level facet field.
    #[must_use]
    pub fn field(&self, field: FilterField) -> Option<&str> {
        let value = match field {
            FilterField::CenterType => &self.center_type,
            FilterField::CenterFocus => &self.focus,
            FilterField::CenterCity => &self.city,
            FilterField::CenterState => &self.state,
            FilterField::CenterCountry => &self.country,
            FilterField::CenterEmployees => &self.employee_range,
            FilterField::CenterStatus => &self.status,
            _ => return None,
        };
        non_blank(value)
    }
}

/// A business function performed at a center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(rename = "cn_unique_key")]
    pub center: CenterKey,
    #[serde(rename = "function_name", default)]
    pub name: Option<String>,
}

impl Function {
    #[must_use]
    pub fn new(center: impl Into<CenterKey>, name: impl Into<String>) -> Self {
        Self {
            center: center.into(),
            name: Some(name.into()),
        }
    }

    /// Value of the function facet field.
    #[must_use]
    pub fn field(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::FunctionType => non_blank(&self.name),
            _ => None,
        }
    }
}

/// Display-only service description attached to a center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "cn_unique_key")]
    pub center: CenterKey,
    #[serde(default)]
    pub primary_service: Option<String>,
    #[serde(default)]
    pub focus_region: Option<String>,
    #[serde(default)]
    pub software_vendor: Option<String>,
    #[serde(default)]
    pub software_in_use: Option<String>,
}

impl Service {
    #[must_use]
    pub fn new(center: impl Into<CenterKey>) -> Self {
        Self {
            center: center.into(),
            primary_service: None,
            focus_region: None,
            software_vendor: None,
            software_in_use: None,
        }
    }
}

/// A contact person at an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    #[serde(rename = "account_global_legal_name")]
    pub account: AccountKey,
    #[serde(rename = "prospect_first_name", default)]
    pub first_name: Option<String>,
    #[serde(rename = "prospect_last_name", default)]
    pub last_name: Option<String>,
    #[serde(rename = "prospect_title", default)]
    pub title: Option<String>,
    #[serde(rename = "prospect_department", default)]
    pub department: Option<String>,
    #[serde(rename = "prospect_level", default)]
    pub level: Option<String>,
    #[serde(rename = "prospect_city", default)]
    pub city: Option<String>,
    #[serde(rename = "prospect_country", default)]
    pub country: Option<String>,
}

impl Prospect {
    /// Creates a prospect with every attribute blank.
    #[must_use]
    pub fn new(account: impl Into<AccountKey>) -> Self {
        Self {
            account: account.into(),
            first_name: None,
            last_name: None,
            title: None,
            department: None,
            level: None,
            city: None,
            country: None,
        }
    }

    /// Value of a prospect-level facet field.
    #[must_use]
    pub fn field(&self, field: FilterField) -> Option<&str> {
        let value = match field {
            FilterField::ProspectDepartment => &self.department,
            FilterField::ProspectLevel => &self.level,
            FilterField::ProspectCity => &self.city,
            _ => return None,
        };
        non_blank(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_from_source_columns() {
        let account: Account = serde_json::from_value(json!({
            "account_global_legal_name": "Acme Corp",
            "account_hq_country": "India",
            "account_hq_industry": "",
            "account_hq_revenue": "$1,250.5",
        }))
        .unwrap();

        assert_eq!(account.key.as_str(), "Acme Corp");
        assert_eq!(account.field(FilterField::AccountCountry), Some("India"));
        // Empty strings read as blank.
        assert_eq!(account.field(FilterField::AccountIndustry), None);
        assert_eq!(account.field(FilterField::AccountRegion), None);
        assert_eq!(account.revenue, Some(RawRevenue::Text("$1,250.5".into())));
    }

    #[test]
    fn test_foreign_fields_are_none() {
        let center = Center {
            center_type: Some("GCC".into()),
            ..Center::new("CN-1", "Acme Corp")
        };
        assert_eq!(center.field(FilterField::CenterType), Some("GCC"));
        assert_eq!(center.field(FilterField::AccountCountry), None);
    }
}
