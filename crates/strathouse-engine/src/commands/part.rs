//! Part resolver operations

use std::path::Path;

use strathouse_core::errors::HouseError;
use strathouse_core::model::{Category, Part, PartInfo};
use strathouse_core::naming::{infer_house_from_path, parse_part_name, ParsedPartName};
use strathouse_core::{log_op_end, log_op_error, log_op_start, Component, Params};
use strathouse_store::errors::Result;
use strathouse_store::SqliteRepo;

use crate::manager::HouseManager;

impl HouseManager {
    /// Build a live instance of the part named `<house>.<category>.<entry>`
    ///
    /// The instance's name is set to the fully-qualified part name.
    ///
    /// # Errors
    ///
    /// - `PartNameInvalid`: no recognized category segment
    /// - `PartNotFound`: the name has no house, is not registered, or its
    ///   component no longer loads
    /// - `PartConstruction`: the factory rejected `params`
    pub fn get_part(&self, name: &str, params: &Params) -> Result<Box<dyn Component>> {
        self.get_part_logged(name, None, params)
    }

    /// Like `get_part`, inferring a missing house from `caller`
    ///
    /// `caller` is the path of a file inside a part directory; a two-segment
    /// name such as `sg.cross` then resolves within that file's house.
    pub fn get_part_from(
        &self,
        name: &str,
        caller: &Path,
        params: &Params,
    ) -> Result<Box<dyn Component>> {
        self.get_part_logged(name, Some(caller), params)
    }

    fn get_part_logged(
        &self,
        name: &str,
        caller: Option<&Path>,
        params: &Params,
    ) -> Result<Box<dyn Component>> {
        log_op_start!("part_get", part = name);
        let start = std::time::Instant::now();

        let part = self.get_part_impl(name, caller, params).map_err(|e| {
            log_op_error!(
                "part_get",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                part = name
            );
            e
        })?;

        log_op_end!(
            "part_get",
            duration_ms = start.elapsed().as_millis() as u64,
            part = part.name()
        );
        Ok(part)
    }

    fn get_part_impl(
        &self,
        name: &str,
        caller: Option<&Path>,
        params: &Params,
    ) -> Result<Box<dyn Component>> {
        let parsed = parse_part_name(name)?;
        let qualified = qualify(name, &parsed, caller)?;

        let part = self.find_part(&qualified)?;
        let not_found = |cause: String| HouseError::PartNotFound {
            name: qualified.clone(),
            cause,
        };

        let module = self
            .loader
            .load(&part.module_locator)
            .map_err(|e| not_found(format!("please check the path: {}", e)))?;
        let factory = module
            .part
            .ok_or_else(|| not_found("the part module has no `part` factory".to_string()))?;

        let mut instance = factory
            .call(params)
            .map_err(|reason| HouseError::PartConstruction {
                name: qualified.clone(),
                reason,
            })?;
        instance.set_name(part.name);
        Ok(instance)
    }

    /// Registered metadata of a part, without loading its component
    ///
    /// # Errors
    ///
    /// `PartNotFound` if the name is not registered.
    pub fn get_part_info(&self, name: &str) -> Result<PartInfo> {
        Ok(self.find_part(name)?.info())
    }

    /// Part info as the boxed table printed by `print_part_info`
    pub fn format_part_info(&self, name: &str) -> Result<String> {
        Ok(self.get_part_info(name)?.render_table())
    }

    pub fn print_part_info(&self, name: &str) -> Result<()> {
        println!("{}", self.format_part_info(name)?);
        Ok(())
    }

    /// Registered part names, optionally restricted to a house and/or category
    pub fn get_part_name_list(
        &self,
        house: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<String>> {
        SqliteRepo::list_part_names(&self.conn, house, category)
    }

    fn find_part(&self, name: &str) -> Result<Part> {
        SqliteRepo::find_part_by_name(&self.conn, name)?.ok_or_else(|| {
            HouseError::PartNotFound {
                name: name.to_string(),
                cause: "not in repository".to_string(),
            }
            .into()
        })
    }
}

fn qualify(name: &str, parsed: &ParsedPartName, caller: Option<&Path>) -> Result<String> {
    if parsed.house.is_some() {
        return Ok(parsed.qualified_with(""));
    }

    let house = caller
        .and_then(|path| infer_house_from_path(parsed.category, path))
        .ok_or_else(|| HouseError::PartNotFound {
            name: name.to_string(),
            cause: "the house cannot be inferred, please use the full name <house>.<category>.<entry>"
                .to_string(),
        })?;
    Ok(parsed.qualified_with(&house))
}
