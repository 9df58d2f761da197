//! Catalogue file format for Pathway.
//!
//! Converts between the JSON catalogue document and the `pathway-core` model.
//!
//! # Architecture
//!
//! ```text
//! catalogue.json ──► CatalogueFile ──► import_catalogue ──► Catalogue
//!                         ▲                                     │
//!                         └───────── export_catalogue ◄─────────┘
//! ```
//!
//! Route endpoints are module names in the file. A missing `from_step` is
//! Start and a missing `to_step` is End; nothing past this crate sees that
//! encoding.

mod error;
mod export;
mod import;
mod wire;

pub use error::{JsonError, JsonResult};
pub use export::export_catalogue;
pub use import::import_catalogue;
pub use wire::{
    CatalogueData, CatalogueFile, IntValue, PairingData, ParameterData, ProcessData, ProductData,
};

use std::fs;
use std::path::Path;

use pathway_core::Catalogue;

/// Parse a catalogue from JSON text.
pub fn from_json_str(json: &str) -> JsonResult<Catalogue> {
    let file: CatalogueFile = serde_json::from_str(json)?;
    import_catalogue(file)
}

/// Render a catalogue as pretty-printed JSON.
pub fn to_json_string(catalogue: &Catalogue) -> JsonResult<String> {
    Ok(serde_json::to_string_pretty(&export_catalogue(catalogue))?)
}

/// Read a catalogue file.
pub fn load_catalogue(path: impl AsRef<Path>) -> JsonResult<Catalogue> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| JsonError::ReadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let catalogue = from_json_str(&content)?;

    tracing::info!(
        "Loaded {} ({} processes, {} products)",
        path.display(),
        catalogue.processes.len(),
        catalogue.products.len()
    );
    Ok(catalogue)
}

/// Write a catalogue file, replacing any existing one.
pub fn save_catalogue(catalogue: &Catalogue, path: impl AsRef<Path>) -> JsonResult<()> {
    let path = path.as_ref();
    let json = to_json_string(catalogue)?;
    fs::write(path, json).map_err(|e| JsonError::WriteError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::info!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathway_core::Module;

    #[test]
    fn test_sentinels_are_absent_endpoints() {
        let catalogue = from_json_str(
            r#"{"catalogue": {"processes": [{
                "name": "P",
                "process_module_pairings": [
                    {"to_step": "A", "default_path": true},
                    {"from_step": "A", "to_step": null, "default_path": true}
                ]
            }]}}"#,
        )
        .unwrap();
        let a = catalogue.find_module("A").unwrap();
        let pairs = &catalogue.processes[0].pairs;
        assert_eq!(pairs[0].from, Module::Start);
        assert_eq!(pairs[0].to, a);
        assert_eq!(pairs[1].to, Module::End);

        let json = to_json_string(&catalogue).unwrap();
        assert!(!json.contains("from_step\": null"));
        assert!(json.contains("\"to_step\": \"A\""));
    }

    #[test]
    fn test_missing_catalogue_key() {
        let err = from_json_str(r#"{"processes": []}"#).unwrap_err();
        assert!(matches!(err, JsonError::JsonError(_)));
    }
}
