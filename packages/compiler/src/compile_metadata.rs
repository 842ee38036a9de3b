/**
 * Compile Metadata
 *
 * Directive, component and pipe descriptions consumed by the template
 * parser. Everything here can be loaded from JSON.
 */
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A named declaration in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticSymbol {
    pub file_path: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl StaticSymbol {
    pub fn new(file_path: impl Into<String>, name: impl Into<String>) -> Self {
        StaticSymbol {
            file_path: file_path.into(),
            name: name.into(),
            members: Vec::new(),
        }
    }
}

impl fmt::Display for StaticSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file_path, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompileTypeMetadata {
    pub reference: StaticSymbol,
}

impl CompileTypeMetadata {
    pub fn new(reference: StaticSymbol) -> Self {
        CompileTypeMetadata { reference }
    }

    pub fn name(&self) -> &str {
        &self.reference.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileDirectiveMetadata {
    #[serde(rename = "type")]
    pub type_: CompileTypeMetadata,
    #[serde(default)]
    pub is_component: bool,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub export_as: Option<String>,
    /// Directive property -> bound element property.
    #[serde(default, deserialize_with = "deserialize_binding_map")]
    pub inputs: IndexMap<String, String>,
    /// Directive property -> emitted event name.
    #[serde(default, deserialize_with = "deserialize_binding_map")]
    pub outputs: IndexMap<String, String>,
}

impl CompileDirectiveMetadata {
    pub fn new(type_: CompileTypeMetadata, selector: Option<&str>) -> Self {
        CompileDirectiveMetadata {
            type_,
            is_component: false,
            selector: selector.map(str::to_string),
            export_as: None,
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }

    pub fn component(mut self) -> Self {
        self.is_component = true;
        self
    }

    pub fn with_export_as(mut self, export_as: &str) -> Self {
        self.export_as = Some(export_as.to_string());
        self
    }

    /// Accepts `prop` or `prop: binding` entries.
    pub fn with_inputs(mut self, inputs: &[&str]) -> Self {
        self.inputs = binding_map(inputs.iter().copied());
        self
    }

    pub fn with_outputs(mut self, outputs: &[&str]) -> Self {
        self.outputs = binding_map(outputs.iter().copied());
        self
    }

    pub fn name(&self) -> &str {
        self.type_.name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilePipeMetadata {
    #[serde(rename = "type")]
    pub type_: CompileTypeMetadata,
    pub name: String,
    #[serde(default = "default_pure")]
    pub pure: bool,
}

impl CompilePipeMetadata {
    pub fn new(type_: CompileTypeMetadata, name: &str) -> Self {
        CompilePipeMetadata {
            type_,
            name: name.to_string(),
            pure: true,
        }
    }
}

fn default_pure() -> bool {
    true
}

fn binding_map<'a>(entries: impl Iterator<Item = &'a str>) -> IndexMap<String, String> {
    entries
        .map(|entry| match entry.split_once(':') {
            Some((prop, binding)) => (prop.trim().to_string(), binding.trim().to_string()),
            None => (entry.trim().to_string(), entry.trim().to_string()),
        })
        .collect()
}

/// Bindings are written either as a map or as a list of `prop: binding`.
fn deserialize_binding_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Bindings {
        Map(IndexMap<String, String>),
        List(Vec<String>),
    }

    Ok(match Bindings::deserialize(deserializer)? {
        Bindings::Map(map) => map,
        Bindings::List(list) => binding_map(list.iter().map(String::as_str)),
    })
}
