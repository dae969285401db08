//! JSON netlist model for Eventide.
//!
//! A netlist is either a bare list of components or an object carrying
//! simulation options alongside the components. Numeric properties accept
//! plain numbers or SI-suffixed strings.
//!
//! # Example
//!
//! ```
//! use eventide_netlist::Netlist;
//!
//! let netlist = Netlist::from_json(r#"[
//!     {"type": "inv", "connections": {"a": "in", "z": "out"},
//!      "properties": {"name": "U1", "tpdr": "20p", "tpdf": "15p"}}
//! ]"#).unwrap();
//!
//! assert_eq!(netlist.len(), 1);
//! assert_eq!(netlist.components[0].node("z"), Some("out"));
//! ```

pub mod error;
pub mod model;
pub mod options;
mod quantity;

pub use error::{Error, Result};
pub use model::{Component, Netlist, Properties, SourceValue};
pub use options::SimOptions;
