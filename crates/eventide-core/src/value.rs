//! Four-valued logic and node history records.

use std::fmt;

/// A logic value carried by a node.
///
/// The discriminants are the indices used by decision tables and by the
/// transition code stored in node history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Value {
    /// Driven low.
    Zero = 0,
    /// Driven high.
    One = 1,
    /// Unknown or contended.
    #[default]
    X = 2,
    /// Not driven (tristate).
    Z = 3,
}

impl Value {
    /// All values in table-index order.
    pub const ALL: [Value; 4] = [Value::Zero, Value::One, Value::X, Value::Z];

    /// Table index of this value.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Value::index`]; indices above 3 wrap into range.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index & 3]
    }

    /// Whether this is a driven 0 or 1.
    pub fn is_known(self) -> bool {
        matches!(self, Value::Zero | Value::One)
    }

    /// Character used when printing waveforms and histories.
    pub fn symbol(self) -> char {
        match self {
            Value::Zero => '0',
            Value::One => '1',
            Value::X => 'X',
            Value::Z => 'Z',
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b { Value::One } else { Value::Zero }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One entry in a node's history: the node changed from `from` to `to` at `time`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Simulated time of the change (s).
    pub time: f64,
    /// Value before the change.
    pub from: Value,
    /// Value after the change.
    pub to: Value,
}

impl Transition {
    /// Create a new history entry.
    pub fn new(time: f64, from: Value, to: Value) -> Self {
        Self { time, from, to }
    }

    /// Packed transition code, `4 * from + to`.
    pub fn code(&self) -> u8 {
        (self.from as u8) * 4 + self.to as u8
    }

    /// Rebuild a transition from a packed code.
    pub fn from_code(time: f64, code: u8) -> Self {
        Self {
            time,
            from: Value::from_index((code >> 2) as usize),
            to: Value::from_index((code & 3) as usize),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} @ {:e}", self.from, self.to, self.time)
    }
}
