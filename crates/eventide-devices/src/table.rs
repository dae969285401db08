//! Decision tables for gate evaluation.
//!
//! A table maps a gate's ordered input values to an output value. Each
//! input selects the next table to consult; after the last input the
//! current table's `result` is the output. A [`Table::Constant`] ends the
//! walk early: once a prefix of the inputs decides the output the rest are
//! never read. Tables refer to themselves and to each other, which is how
//! one table handles any number of inputs (AND of 2, 3 or 4 inputs, or a
//! bus of any width, all share one table).
//!
//! Every table is a `static`; gates hold `&'static Table` and nothing is
//! ever copied per instance.

use std::fmt;

use eventide_core::Value;
use eventide_core::Value::{One, X, Z, Zero};

/// One node of a decision table.
pub enum Table {
    /// Output is decided; remaining inputs are ignored.
    Constant(Value),
    /// Consult the next input.
    Branch {
        /// Name used in debug output.
        name: &'static str,
        /// Table to use next, indexed by the current input's value.
        next: [&'static Table; 4],
        /// Output if there are no more inputs.
        result: Value,
    },
}

impl Table {
    /// Output when no inputs remain.
    pub fn result(&self) -> Value {
        match self {
            Table::Constant(v) => *v,
            Table::Branch { result, .. } => *result,
        }
    }

    /// Evaluate against inputs in terminal order.
    ///
    /// The iterator is consumed lazily; inputs after a deciding prefix are
    /// not pulled.
    pub fn eval<I>(&self, inputs: I) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        let mut inputs = inputs.into_iter();
        let mut table = self;
        while let Table::Branch { next, result, .. } = table {
            match inputs.next() {
                Some(v) => table = next[v.index()],
                None => return *result,
            }
        }
        table.result()
    }
}

impl fmt::Debug for Table {
    // Tables are cyclic; never recurse into `next`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Constant(v) => write!(f, "Constant({v})"),
            Table::Branch { name, result, .. } => write!(f, "Table({name}, {result})"),
        }
    }
}

const fn branch(name: &'static str, next: [&'static Table; 4], result: Value) -> Table {
    Table::Branch { name, next, result }
}

// Constants.
pub static LOW: Table = Table::Constant(Zero);
pub static HIGH: Table = Table::Constant(One);
pub static UNKNOWN: Table = Table::Constant(X);
pub static FLOAT: Table = Table::Constant(Z);

// Pass the next input through; skip forward to pass a later one.
pub static SELECT: Table = branch("select", [&LOW, &HIGH, &UNKNOWN, &UNKNOWN], X);
pub static SELECT_2ND: Table = branch("select2", [&SELECT; 4], X);
pub static SELECT_3RD: Table = branch("select3", [&SELECT_2ND; 4], X);
pub static SELECT_4TH: Table = branch("select4", [&SELECT_3RD; 4], X);

// Next input must equal a known value, else X.
static ENSURE_0: Table = branch("ensure0", [&LOW, &UNKNOWN, &UNKNOWN, &UNKNOWN], X);
static ENSURE_1: Table = branch("ensure1", [&UNKNOWN, &HIGH, &UNKNOWN, &UNKNOWN], X);

// Value of the next two inputs if they agree, else X.
pub static EQUAL: Table = branch("equal", [&ENSURE_0, &ENSURE_1, &UNKNOWN, &UNKNOWN], X);
static SKIP1_EQUAL: Table = branch("skip1-equal", [&EQUAL; 4], X);
static SKIP2_EQUAL: Table = branch("skip2-equal", [&SKIP1_EQUAL; 4], X);

// Value of inputs 1 and 3 of the next three if they agree, else X.
static ENSURE_0_SKIP1: Table = branch("ensure0-skip1", [&ENSURE_0; 4], X);
static ENSURE_1_SKIP1: Table = branch("ensure1-skip1", [&ENSURE_1; 4], X);
static EQUAL_SKIP1: Table = branch(
    "equal-skip1",
    [&ENSURE_0_SKIP1, &ENSURE_1_SKIP1, &UNKNOWN, &UNKNOWN],
    X,
);
static SKIP1_EQUAL_SKIP1: Table = branch("skip1-equal-skip1", [&EQUAL_SKIP1; 4], X);

/// Tristate bus resolution.
///
/// Z if every input is Z; 0 (or 1) if at least one input is 0 (or 1) and
/// the rest are the same or Z; X otherwise.
pub static BUS: Table = branch("bus", [&BUS_0, &BUS_1, &UNKNOWN, &BUS], Z);
static BUS_0: Table = branch("bus0", [&BUS_0, &UNKNOWN, &UNKNOWN, &BUS_0], Zero);
static BUS_1: Table = branch("bus1", [&UNKNOWN, &BUS_1, &UNKNOWN, &BUS_1], One);

/// Tristate buffer, inputs `(e, a)`.
pub static TRISTATE_BUFFER: Table = branch("tristate", [&FLOAT, &SELECT, &UNKNOWN, &UNKNOWN], X);

pub static AND: Table = branch("and", [&LOW, &AND, &AND_X, &AND_X], One);
static AND_X: Table = branch("and-x", [&LOW, &AND_X, &AND_X, &AND_X], X);

pub static NAND: Table = branch("nand", [&HIGH, &NAND, &NAND_X, &NAND_X], Zero);
static NAND_X: Table = branch("nand-x", [&HIGH, &NAND_X, &NAND_X, &NAND_X], X);

pub static OR: Table = branch("or", [&OR, &HIGH, &OR_X, &OR_X], Zero);
static OR_X: Table = branch("or-x", [&OR_X, &HIGH, &OR_X, &OR_X], X);

pub static NOR: Table = branch("nor", [&NOR, &LOW, &NOR_X, &NOR_X], One);
static NOR_X: Table = branch("nor-x", [&NOR_X, &LOW, &NOR_X, &NOR_X], X);

pub static XOR: Table = branch("xor", [&XOR, &XOR_1, &UNKNOWN, &UNKNOWN], Zero);
static XOR_1: Table = branch("xor1", [&XOR_1, &XOR, &UNKNOWN, &UNKNOWN], One);

pub static XNOR: Table = branch("xnor", [&XNOR, &XNOR_1, &UNKNOWN, &UNKNOWN], One);
static XNOR_1: Table = branch("xnor1", [&XNOR_1, &XNOR, &UNKNOWN, &UNKNOWN], Zero);

/// 2:1 mux, inputs `(s, d0, d1)`.
pub static MUX2: Table = branch("mux2", [&SELECT, &SELECT_2ND, &EQUAL, &EQUAL], X);

/// 4:1 mux, inputs `(s0, s1, d0, d1, d2, d3)`; selects `d[2*s1 + s0]`.
pub static MUX4: Table = branch("mux4", [&MUX4_S0_LOW, &MUX4_S0_HIGH, &MUX4_S0_X, &MUX4_S0_X], X);
static MUX4_S0_LOW: Table = branch(
    "mux4-s0=0",
    [&SELECT, &SELECT_3RD, &EQUAL_SKIP1, &EQUAL_SKIP1],
    X,
);
static MUX4_S0_HIGH: Table = branch(
    "mux4-s0=1",
    [&SELECT_2ND, &SELECT_4TH, &SKIP1_EQUAL_SKIP1, &SKIP1_EQUAL_SKIP1],
    X,
);
static MUX4_S0_X: Table = branch("mux4-s0=x", [&EQUAL, &SKIP2_EQUAL, &UNKNOWN, &UNKNOWN], X);
