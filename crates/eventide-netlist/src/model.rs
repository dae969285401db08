//! Netlist data model.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::options::SimOptions;
use crate::quantity::{opt_flag, opt_quantity, quantities};

/// Waveform descriptor of a voltage source, e.g.
/// `{"type": "pwl", "args": [0, 0, "1n", 1]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceValue {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "quantities")]
    pub args: Vec<f64>,
}

impl SourceValue {
    pub fn dc(v: f64) -> Self {
        Self {
            kind: "dc".to_string(),
            args: vec![v],
        }
    }

    pub fn pwl(points: &[(f64, f64)]) -> Self {
        Self {
            kind: "pwl".to_string(),
            args: points.iter().flat_map(|&(t, v)| [t, v]).collect(),
        }
    }
}

/// Component properties. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Properties {
    pub name: Option<String>,
    #[serde(deserialize_with = "opt_quantity")]
    pub tcd: Option<f64>,
    #[serde(deserialize_with = "opt_quantity")]
    pub tpdr: Option<f64>,
    #[serde(deserialize_with = "opt_quantity")]
    pub tpdf: Option<f64>,
    #[serde(deserialize_with = "opt_quantity")]
    pub tr: Option<f64>,
    #[serde(deserialize_with = "opt_quantity")]
    pub tf: Option<f64>,
    #[serde(deserialize_with = "opt_quantity")]
    pub cin: Option<f64>,
    #[serde(deserialize_with = "opt_quantity")]
    pub cout: Option<f64>,
    #[serde(deserialize_with = "opt_flag")]
    pub lenient: Option<bool>,
    pub value: Option<SourceValue>,
}

/// One netlist entry: a device type, its terminal-to-node map and its
/// properties.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub connections: IndexMap<String, String>,
    #[serde(default)]
    pub properties: Properties,
}

impl Component {
    /// Start a component of the given type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            connections: IndexMap::new(),
            properties: Properties::default(),
        }
    }

    /// Set the instance name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.properties.name = Some(name.into());
        self
    }

    /// Connect `terminal` to the node called `node`.
    pub fn connect(mut self, terminal: impl Into<String>, node: impl Into<String>) -> Self {
        self.connections.insert(terminal.into(), node.into());
        self
    }

    /// Set gate timing: contamination delay plus rising and falling
    /// propagation delays.
    pub fn delays(mut self, tcd: f64, tpdr: f64, tpdf: f64) -> Self {
        self.properties.tcd = Some(tcd);
        self.properties.tpdr = Some(tpdr);
        self.properties.tpdf = Some(tpdf);
        self
    }

    /// Set terminal capacitances.
    pub fn loading(mut self, cin: f64, cout: f64) -> Self {
        self.properties.cin = Some(cin);
        self.properties.cout = Some(cout);
        self
    }

    /// Set a source waveform.
    pub fn value(mut self, value: SourceValue) -> Self {
        self.properties.value = Some(value);
        self
    }

    /// Instance name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.properties.name.as_deref()
    }

    /// Node connected to `terminal`.
    pub fn node(&self, terminal: &str) -> Option<&str> {
        self.connections.get(terminal).map(String::as_str)
    }
}

/// On-disk layouts: a bare component list or an object with options.
#[derive(Deserialize)]
#[serde(untagged)]
enum NetlistFile {
    Components(Vec<Component>),
    Full {
        #[serde(default)]
        options: SimOptions,
        components: Vec<Component>,
    },
}

/// A parsed netlist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Netlist {
    /// Options carried by the file, defaulted when absent.
    pub options: SimOptions,
    /// Components in declaration order.
    pub components: Vec<Component>,
}

impl Netlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component.
    pub fn push(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, component: Component) -> Self {
        self.push(component);
        self
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Parse a netlist from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: NetlistFile = serde_json::from_str(json)?;
        Ok(match file {
            NetlistFile::Components(components) => Self {
                options: SimOptions::default(),
                components,
            },
            NetlistFile::Full {
                options,
                components,
            } => Self {
                options,
                components,
            },
        })
    }

    /// Read and parse a netlist file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_component_list() {
        let json = r#"[
            {"type": "nand2",
             "connections": {"a": "x", "b": "y", "z": "out"},
             "properties": {"name": "U1", "tcd": "10p", "tpdr": 3e-11, "tpdf": "25ps"}}
        ]"#;
        let netlist = Netlist::from_json(json).unwrap();
        assert_eq!(netlist.len(), 1);
        assert_eq!(netlist.options, SimOptions::default());

        let c = &netlist.components[0];
        assert_eq!(c.kind, "nand2");
        assert_eq!(c.name(), Some("U1"));
        assert_eq!(c.node("z"), Some("out"));
        assert!((c.properties.tcd.unwrap() - 10e-12).abs() < 1e-24);
        assert_eq!(c.properties.tpdr, Some(3e-11));
        assert!((c.properties.tpdf.unwrap() - 25e-12).abs() < 1e-24);
        assert_eq!(c.properties.cin, None);
    }

    #[test]
    fn test_object_with_options() {
        let json = r#"{
            "options": {"vih": 0.8},
            "components": [
                {"type": "voltage source",
                 "connections": {"nplus": "clk", "nminus": "gnd"},
                 "properties": {"name": "Vclk", "value": {"type": "pwl", "args": [0, 0, "1n", 1]}}},
                {"type": "ground", "connections": {"gnd": "gnd"}}
            ]
        }"#;
        let netlist = Netlist::from_json(json).unwrap();
        assert_eq!(netlist.options.vih, 0.8);
        assert_eq!(netlist.options.vil, 0.1);
        assert_eq!(netlist.len(), 2);

        let value = netlist.components[0].properties.value.as_ref().unwrap();
        assert_eq!(value.kind, "pwl");
        assert_eq!(value.args.len(), 4);
        assert!((value.args[2] - 1e-9).abs() < 1e-21);
        assert_eq!(netlist.components[1].properties, Properties::default());
    }

    #[test]
    fn test_lenient_forms() {
        let parse = |v: &str| {
            let json = format!(r#"[{{"type": "inv", "properties": {{"lenient": {v}}}}}]"#);
            Netlist::from_json(&json).unwrap().components[0].properties.lenient
        };
        assert_eq!(parse("true"), Some(true));
        assert_eq!(parse("false"), Some(false));
        assert_eq!(parse("1"), Some(true));
        assert_eq!(parse("0"), Some(false));
        assert_eq!(parse("null"), None);
    }

    #[test]
    fn test_unknown_properties_are_ignored() {
        let json = r#"[{"type": "and2", "properties": {"size": 4, "comment": "x"}}]"#;
        assert!(Netlist::from_json(json).is_ok());
    }

    #[test]
    fn test_bad_quantity_is_rejected() {
        let json = r#"[{"type": "and2", "properties": {"tcd": "fast"}}]"#;
        assert!(matches!(Netlist::from_json(json), Err(Error::Json(_))));
        assert!(matches!(Netlist::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_builder() {
        let netlist = Netlist::new()
            .with(
                Component::new("and2")
                    .named("U1")
                    .connect("a", "a")
                    .connect("b", "b")
                    .connect("z", "z")
                    .delays(1e-12, 2e-12, 3e-12),
            )
            .with(
                Component::new("voltage source")
                    .connect("nplus", "a")
                    .value(SourceValue::pwl(&[(0.0, 0.0), (1e-9, 1.0)])),
            );
        assert_eq!(netlist.len(), 2);
        assert_eq!(netlist.components[0].properties.tpdf, Some(3e-12));
        assert_eq!(
            netlist.components[1].properties.value.as_ref().unwrap().args,
            vec![0.0, 0.0, 1e-9, 1.0]
        );
    }
}
