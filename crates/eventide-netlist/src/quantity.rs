//! Serde helpers for numeric netlist fields.
//!
//! Netlists written by hand (or by schematic tools) mix plain numbers with
//! SI-suffixed strings such as `"10p"` or `"1.5ns"`. These helpers accept
//! either form.

use eventide_core::units::parse_value;
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Quantity {
    Number(f64),
    Text(String),
}

impl Quantity {
    fn resolve<E: de::Error>(self) -> Result<f64, E> {
        match self {
            Quantity::Number(v) => Ok(v),
            Quantity::Text(s) => {
                parse_value(&s).ok_or_else(|| E::custom(format!("invalid number {s:?}")))
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Number(f64),
}

pub(crate) fn quantity<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Quantity::deserialize(d)?.resolve()
}

pub(crate) fn opt_quantity<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Option::<Quantity>::deserialize(d)?
        .map(Quantity::resolve)
        .transpose()
}

pub(crate) fn quantities<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
    Vec::<Quantity>::deserialize(d)?
        .into_iter()
        .map(Quantity::resolve)
        .collect()
}

/// `true`/`false`, or a number where non-zero means true.
pub(crate) fn opt_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(Option::<Flag>::deserialize(d)?.map(|f| match f {
        Flag::Bool(b) => b,
        Flag::Number(n) => n != 0.0,
    }))
}
