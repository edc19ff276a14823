//! Site Registry Asset
//!
//! A Site is the physical connection point every other document hangs
//! off: it names its owning DSO and Producer and is wired to exactly one
//! Aggregator. HV sites are managed by the TSO, MV sites by their DSO.

use serde::{Deserialize, Serialize};

use super::LedgerAsset;
use crate::selector::Selector;

/// Voltage class of a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoltageType {
    /// High voltage (transmission grid)
    HV,
    /// Medium voltage (distribution grid)
    MV,
}

impl VoltageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HV => "HV",
            Self::MV => "MV",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "HV" => Some(Self::HV),
            "MV" => Some(Self::MV),
            _ => None,
        }
    }
}

impl std::fmt::Display for VoltageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Site asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Unique site id, also the ledger key
    pub site_id: String,
    /// Voltage class (decides the managing operator)
    pub voltage_type: VoltageType,
    /// Owning DSO registry id
    pub a04_registered_resource_mrid: String,
    /// Owning producer registry id
    pub producer_mrid: String,
    /// Linked Aggregator (EDA) registry id
    pub eda_registered_resource_id: String,
    /// Metering point code
    pub metering_point_mrid: String,
}

impl LedgerAsset for Site {
    fn asset_id(&self) -> &str {
        &self.site_id
    }
}

/// Explicit query filter for sites; absent fields match any value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteFilter {
    pub a04_registered_resource_mrid: Option<String>,
    pub producer_mrid: Option<String>,
    pub eda_registered_resource_id: Option<String>,
    pub voltage_type: Option<VoltageType>,
}

impl SiteFilter {
    pub fn to_selector(&self) -> Selector {
        let mut selector = Selector::new();
        if let Some(v) = &self.a04_registered_resource_mrid {
            selector = selector.eq("a04RegisteredResourceMrid", v.clone());
        }
        if let Some(v) = &self.producer_mrid {
            selector = selector.eq("producerMrid", v.clone());
        }
        if let Some(v) = &self.eda_registered_resource_id {
            selector = selector.eq("edaRegisteredResourceId", v.clone());
        }
        if let Some(v) = &self.voltage_type {
            selector = selector.eq("voltageType", v.as_str());
        }
        selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_wire_format() {
        let site = Site {
            site_id: "S1".to_string(),
            voltage_type: VoltageType::MV,
            a04_registered_resource_mrid: "dso-a".to_string(),
            producer_mrid: "prod-a".to_string(),
            eda_registered_resource_id: "eda-1".to_string(),
            metering_point_mrid: "MP-0001".to_string(),
        };
        let json = serde_json::to_value(&site).unwrap();
        assert_eq!(json["siteId"], "S1");
        assert_eq!(json["voltageType"], "MV");
        assert_eq!(json["a04RegisteredResourceMrid"], "dso-a");
        assert_eq!(json["edaRegisteredResourceId"], "eda-1");
    }

    #[test]
    fn test_filter_skips_absent_fields() {
        let filter = SiteFilter {
            a04_registered_resource_mrid: Some("dso-a".to_string()),
            ..Default::default()
        };
        let selector = filter.to_selector();
        assert_eq!(selector.len(), 1);
    }
}
