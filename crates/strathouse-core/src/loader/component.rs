use std::collections::BTreeMap;
use std::fmt;

/// Named parameters passed to a part factory
pub type Params = BTreeMap<String, serde_json::Value>;

/// A live strategy component returned by part resolution
pub trait Component: fmt::Debug + Send {
    /// Fully-qualified part name, stamped by the resolver
    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);

    /// Effective parameters the component was built with
    fn params(&self) -> &Params;
}

/// Overlay `overrides` on `defaults`
pub fn merge_params(defaults: &Params, overrides: &Params) -> Params {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Generic component for parts that only carry parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredPart {
    name: String,
    params: Params,
}

impl ConfiguredPart {
    pub fn new(params: Params) -> Self {
        Self {
            name: String::new(),
            params,
        }
    }

    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.params.get(key)
    }
}

impl Component for ConfiguredPart {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn params(&self) -> &Params {
        &self.params
    }
}
