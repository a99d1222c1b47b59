use super::ids::ElementId;

/// Decoded Block / SimpleBlock payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub track: u64,
    /// Timecode relative to the enclosing cluster, in timecode-scale ticks.
    pub timecode: i16,
    pub flags: u8,
    pub payload: Vec<u8>,
}

/// Value of an element, typed from the schema table.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    String(String),
    Binary(Vec<u8>),
    /// Nanoseconds since 2001-01-01T00:00:00 UTC.
    Date(i64),
    Block(Block),
    Master(Vec<Element>),
}

/// One element, either a leaf or a fully materialized subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub value: ElementValue,
}

/// Structural event produced by an element reader.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    /// A master element that is not buffered has been entered.
    Start {
        id: ElementId,
        /// Absolute offset of the element header.
        offset: u64,
        /// Absolute offset of the first byte after the header.
        data_offset: u64,
    },
    /// A master element that is not buffered has been left.
    End { id: ElementId },
    /// A leaf, or a buffered master delivered with all of its children.
    Tag(Element),
}

impl Element {
    pub fn new(id: ElementId, value: ElementValue) -> Self {
        Self { id, value }
    }

    pub fn master(id: ElementId, children: Vec<Element>) -> Self {
        Self::new(id, ElementValue::Master(children))
    }

    /// Children of a master element, empty for leaves.
    pub fn children(&self) -> &[Element] {
        match &self.value {
            ElementValue::Master(children) => children,
            _ => &[],
        }
    }

    /// First child with the given id.
    pub fn child(&self, id: ElementId) -> Option<&Element> {
        self.children().iter().find(|c| c.id == id)
    }

    /// All children with the given id, in source order.
    pub fn children_with(&self, id: ElementId) -> impl Iterator<Item = &Element> + '_ {
        self.children().iter().filter(move |c| c.id == id)
    }

    pub fn as_unsigned(&self) -> Option<u64> {
        match self.value {
            ElementValue::Unsigned(v) => Some(v),
            ElementValue::Signed(v) if v >= 0 => Some(v as u64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            ElementValue::Float(v) => Some(v),
            ElementValue::Unsigned(v) => Some(v as f64),
            ElementValue::Signed(v) => Some(v as f64),
            _ => None,
        }
    }

    /// String payload; binary payloads are read as lossy UTF-8.
    pub fn as_string(&self) -> Option<String> {
        match &self.value {
            ElementValue::String(s) => Some(s.clone()),
            ElementValue::Binary(b) => Some(String::from_utf8_lossy(b).into_owned()),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match &self.value {
            ElementValue::Binary(b) => Some(b),
            ElementValue::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match &self.value {
            ElementValue::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Flags are unsigned integers where any non-zero value is set.
    pub fn as_flag(&self) -> bool {
        self.as_unsigned().is_some_and(|v| v != 0)
    }

    pub fn child_unsigned(&self, id: ElementId) -> Option<u64> {
        self.child(id)?.as_unsigned()
    }

    pub fn child_float(&self, id: ElementId) -> Option<f64> {
        self.child(id)?.as_float()
    }

    pub fn child_string(&self, id: ElementId) -> Option<String> {
        self.child(id)?.as_string()
    }

    pub fn child_binary(&self, id: ElementId) -> Option<&[u8]> {
        self.child(id)?.as_binary()
    }

    pub fn child_flag(&self, id: ElementId) -> bool {
        self.child(id).is_some_and(Element::as_flag)
    }
}
