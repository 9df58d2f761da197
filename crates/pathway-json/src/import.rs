//! Building a [`Catalogue`] from its file form.

use rustc_hash::FxHashMap;

use pathway_core::{Catalogue, Module, ModulePair, Process, ProcessId, Product};

use crate::error::{JsonError, JsonResult};
use crate::wire::{CatalogueFile, ProcessData, ProductData};

/// Convert a parsed catalogue file into the model.
///
/// Modules are identified by name across the whole file: every route naming
/// the same module refers to the same node.
pub fn import_catalogue(file: CatalogueFile) -> JsonResult<Catalogue> {
    let data = file.catalogue;
    let mut catalogue = Catalogue::new();
    catalogue.pipeline = data.pipeline;
    catalogue.url = data.url;
    catalogue.lims_id = data.lims_id;

    let mut names: FxHashMap<String, Module> = FxHashMap::default();
    for process in data.processes {
        let process = import_process(process, &mut catalogue, &mut names)?;
        catalogue.add_process(process);
    }

    // First process wins when identifiers repeat
    let mut uuids: FxHashMap<&str, ProcessId> = FxHashMap::default();
    for (id, process) in catalogue.iter_processes() {
        uuids.entry(process.uuid.as_str()).or_insert(id);
    }
    let products = data
        .products
        .into_iter()
        .map(|product| import_product(product, &uuids))
        .collect::<JsonResult<Vec<_>>>()?;
    catalogue.products = products;

    tracing::debug!(
        "Imported {} modules, {} processes, {} products",
        catalogue.modules().len(),
        catalogue.processes.len(),
        catalogue.products.len()
    );
    Ok(catalogue)
}

/// The module called `name`, creating it on first sight.
fn module_named(
    name: Option<String>,
    sentinel: Module,
    catalogue: &mut Catalogue,
    names: &mut FxHashMap<String, Module>,
) -> Module {
    let Some(name) = name else {
        return sentinel;
    };
    if let Some(module) = names.get(&name) {
        return *module;
    }
    let module = catalogue.add_module(name.clone());
    names.insert(name, module);
    module
}

fn import_process(
    data: ProcessData,
    catalogue: &mut Catalogue,
    names: &mut FxHashMap<String, Module>,
) -> JsonResult<Process> {
    let mut process = Process::new(data.name);
    process.uuid = data.uuid;
    process.tat = data.tat.to_i32("TAT")?;
    process.process_class = data.process_class;

    for pairing in data.process_module_pairings {
        // Targets are resolved first so module ids follow the order routes lead into them
        let to = module_named(pairing.to_step, Module::End, catalogue, names);
        let from = module_named(pairing.from_step, Module::Start, catalogue, names);
        process
            .pairs
            .push(ModulePair::new(from, to, pairing.default_path));
    }

    for param in data.module_parameters {
        let min_value = param
            .min_value
            .as_ref()
            .map(|v| v.to_i32("min_value"))
            .transpose()?;
        let max_value = param
            .max_value
            .as_ref()
            .map(|v| v.to_i32("max_value"))
            .transpose()?;
        if min_value.is_none() && max_value.is_none() {
            continue;
        }
        let info = names
            .get(&param.name)
            .and_then(Module::step_id)
            .and_then(|id| catalogue.module_mut(id))
            .ok_or_else(|| JsonError::UnknownModule {
                process: process.name.clone(),
                module: param.name.clone(),
            })?;
        info.min_value = min_value;
        info.max_value = max_value;
    }
    Ok(process)
}

fn import_product(data: ProductData, uuids: &FxHashMap<&str, ProcessId>) -> JsonResult<Product> {
    let mut product = Product::new(data.name);
    product.description = data.description;
    product.uuid = data.uuid;
    product.product_version = data.product_version.to_i32("product_version")?;
    product.availability = data.availability.to_i32("availability")?;
    product.bio_type = data.requested_biomaterial_type;

    for uuid in data.process_uuids {
        let Some(id) = uuids.get(uuid.as_str()) else {
            return Err(JsonError::UnknownProcess {
                product: product.name,
                uuid,
            });
        };
        product.processes.push(*id);
    }
    Ok(product)
}
