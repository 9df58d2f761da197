//! On-disk shape of a catalogue file.
//!
//! These types mirror the JSON document field for field. Module identity is
//! still a name here; a missing `from_step` means Start and a missing
//! `to_step` means End.

use serde::{Deserialize, Serialize};

use pathway_core::{Catalogue, Process, Product};

use crate::error::{JsonError, JsonResult};

/// Top-level document: `{ "catalogue": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueFile {
    pub catalogue: CatalogueData,
}

/// Catalogue header plus its processes and products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueData {
    #[serde(default = "default_pipeline")]
    pub pipeline: String,

    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_lims_id")]
    pub lims_id: String,

    #[serde(default)]
    pub processes: Vec<ProcessData>,

    #[serde(default)]
    pub products: Vec<ProductData>,
}

/// One process and its routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessData {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub uuid: String,

    /// Turnaround time
    #[serde(rename = "TAT", default = "default_tat")]
    pub tat: IntValue,

    #[serde(default = "default_process_class")]
    pub process_class: String,

    /// Parameter ranges, one entry per module with a parameter
    #[serde(default)]
    pub module_parameters: Vec<ParameterData>,

    #[serde(default)]
    pub process_module_pairings: Vec<PairingData>,
}

/// Parameter range of a named module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterData {
    pub name: String,

    #[serde(default)]
    pub min_value: Option<IntValue>,

    #[serde(default)]
    pub max_value: Option<IntValue>,
}

/// One route. Absent (or null) endpoints stand for the sentinels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_step: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_step: Option<String>,

    #[serde(default)]
    pub default_path: bool,
}

/// One product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductData {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub uuid: String,

    #[serde(default = "default_product_version")]
    pub product_version: IntValue,

    #[serde(default = "default_availability")]
    pub availability: IntValue,

    #[serde(default = "default_bio_type")]
    pub requested_biomaterial_type: String,

    /// Identifiers of the product's processes, in order
    #[serde(default)]
    pub process_uuids: Vec<String>,
}

/// An integer written either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntValue {
    Number(i64),
    Text(String),
}

impl IntValue {
    /// The value as an `i32`, or [`JsonError::InvalidInteger`] naming `key`.
    pub fn to_i32(&self, key: &'static str) -> JsonResult<i32> {
        let invalid = || JsonError::InvalidInteger {
            key,
            value: match self {
                IntValue::Number(n) => n.to_string(),
                IntValue::Text(s) => format!("\"{s}\""),
            },
        };
        match self {
            IntValue::Number(n) => i32::try_from(*n).map_err(|_| invalid()),
            IntValue::Text(s) => s.trim().parse().map_err(|_| invalid()),
        }
    }
}

impl From<i32> for IntValue {
    fn from(value: i32) -> Self {
        IntValue::Number(i64::from(value))
    }
}

fn default_pipeline() -> String {
    Catalogue::DEFAULT_PIPELINE.to_string()
}

fn default_url() -> String {
    Catalogue::DEFAULT_URL.to_string()
}

fn default_lims_id() -> String {
    Catalogue::DEFAULT_LIMS_ID.to_string()
}

fn default_tat() -> IntValue {
    Process::DEFAULT_TAT.into()
}

fn default_process_class() -> String {
    Process::DEFAULT_CLASS.to_string()
}

fn default_product_version() -> IntValue {
    Product::DEFAULT_VERSION.into()
}

fn default_availability() -> IntValue {
    Product::DEFAULT_AVAILABILITY.into()
}

fn default_bio_type() -> String {
    Product::DEFAULT_BIO_TYPE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_value_accepts_numeric_strings() {
        let value: IntValue = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(value.to_i32("TAT").unwrap(), 42);
        let value: IntValue = serde_json::from_str("7").unwrap();
        assert_eq!(value.to_i32("TAT").unwrap(), 7);
    }

    #[test]
    fn test_int_value_rejects_words() {
        let value = IntValue::Text("soon".to_string());
        let err = value.to_i32("TAT").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected an integer for key TAT but got \"soon\""
        );
        assert!(IntValue::Number(i64::MAX).to_i32("TAT").is_err());
    }

    #[test]
    fn test_null_endpoints_read_as_absent() {
        let pairing: PairingData =
            serde_json::from_str(r#"{"from_step": null, "to_step": "A"}"#).unwrap();
        assert_eq!(pairing.from_step, None);
        assert_eq!(pairing.to_step.as_deref(), Some("A"));
        assert!(!pairing.default_path);
    }
}
