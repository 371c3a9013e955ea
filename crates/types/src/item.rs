//! Items conveyed along a line.

use std::fmt;

/// An opaque, order-significant token supplied by the caller.
///
/// The simulation relocates items but never creates or destroys them: once a
/// run finishes, the ejected sequence equals the input sequence exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item(String);

impl Item {
    /// Create an item from a caller-supplied label.
    pub fn new(label: impl Into<String>) -> Self {
        Item(label.into())
    }

    /// The label this item was created with.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Item {
    fn from(label: &str) -> Self {
        Item::new(label)
    }
}

impl From<String> for Item {
    fn from(label: String) -> Self {
        Item(label)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
