//! Writing a [`Catalogue`] back to its file form.

use rustc_hash::FxHashSet;

use pathway_core::{Catalogue, Module, Process, Product};

use crate::wire::{
    CatalogueData, CatalogueFile, PairingData, ParameterData, ProcessData, ProductData,
};

/// Convert the model into its file form.
pub fn export_catalogue(catalogue: &Catalogue) -> CatalogueFile {
    let processes = catalogue
        .processes
        .iter()
        .map(|process| export_process(catalogue, process))
        .collect();
    let products = catalogue
        .products
        .iter()
        .map(|product| export_product(catalogue, product))
        .collect();

    CatalogueFile {
        catalogue: CatalogueData {
            pipeline: catalogue.pipeline.clone(),
            url: catalogue.url.clone(),
            lims_id: catalogue.lims_id.clone(),
            processes,
            products,
        },
    }
}

/// Name written for a route endpoint; sentinels are left out.
fn step_name(catalogue: &Catalogue, module: Module) -> Option<String> {
    match module {
        Module::Start | Module::End => None,
        Module::Step(_) => Some(catalogue.module_name(module).to_string()),
    }
}

fn export_process(catalogue: &Catalogue, process: &Process) -> ProcessData {
    let mut seen = FxHashSet::default();
    let mut module_parameters = Vec::new();
    let mut pairings = Vec::with_capacity(process.pairs.len());

    for pair in &process.pairs {
        pairings.push(PairingData {
            from_step: step_name(catalogue, pair.from),
            to_step: step_name(catalogue, pair.to),
            default_path: pair.is_default,
        });

        // Parameters travel once per module, with the first route into it
        let Some(info) = pair.to.step_id().and_then(|id| catalogue.module(id)) else {
            continue;
        };
        if seen.insert(info.name.as_str()) && info.has_parameter() {
            module_parameters.push(ParameterData {
                name: info.name.clone(),
                min_value: info.min_value.map(Into::into),
                max_value: info.max_value.map(Into::into),
            });
        }
    }

    ProcessData {
        name: process.name.clone(),
        uuid: process.uuid.clone(),
        tat: process.tat.into(),
        process_class: process.process_class.clone(),
        module_parameters,
        process_module_pairings: pairings,
    }
}

fn export_product(catalogue: &Catalogue, product: &Product) -> ProductData {
    ProductData {
        name: product.name.clone(),
        description: product.description.clone(),
        uuid: product.uuid.clone(),
        product_version: product.product_version.into(),
        availability: product.availability.into(),
        requested_biomaterial_type: product.bio_type.clone(),
        process_uuids: product
            .processes
            .iter()
            .filter_map(|id| catalogue.process(*id))
            .map(|process| process.uuid.clone())
            .collect(),
    }
}
