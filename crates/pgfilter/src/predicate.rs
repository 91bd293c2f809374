//! Predicate tree: leaves produced by matchers, AND/OR groups on top.
//!
//! A [`Predicate`] does not know its final placeholder numbers. Numbers are
//! assigned by the query builder when the predicate is added, in depth-first
//! visit order, so the same predicate value can be reused across builders.

use crate::value::Value;
use std::fmt;

/// Boolean operator joining the children of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOp {
    And,
    Or,
}

impl GroupOp {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupOp::And => "AND",
            GroupOp::Or => "OR",
        }
    }

    fn separator(self) -> &'static str {
        match self {
            GroupOp::And => " AND ",
            GroupOp::Or => " OR ",
        }
    }
}

impl fmt::Display for GroupOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Raw(String),
    /// One placeholder, one value.
    Bind,
    /// Expansion point: one `(…)` list consuming every remaining value.
    BindList,
}

/// A single condition: SQL segments interleaved with placeholder markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    segments: Vec<Segment>,
    values: Vec<Value>,
}

impl Leaf {
    pub(crate) fn new() -> Self {
        Self {
            segments: Vec::new(),
            values: Vec::new(),
        }
    }

    pub(crate) fn raw(mut self, sql: impl Into<String>) -> Self {
        self.segments.push(Segment::Raw(sql.into()));
        self
    }

    pub(crate) fn bind(mut self, value: impl Into<Value>) -> Self {
        self.segments.push(Segment::Bind);
        self.values.push(value.into());
        self
    }

    /// Must be the last marker of the leaf.
    pub(crate) fn bind_list(mut self, values: Vec<Value>) -> Self {
        self.segments.push(Segment::BindList);
        self.values.extend(values);
        self
    }

    /// Values in placeholder order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The condition with abstract `?n` markers, one per marker.
    ///
    /// A list marker renders as a single `?n` (`id IN ?1`); it is expanded
    /// into one placeholder per value only when added to a builder.
    pub fn template(&self) -> String {
        let mut out = String::new();
        let mut marker = 0usize;
        for seg in &self.segments {
            match seg {
                Segment::Raw(s) => out.push_str(s),
                Segment::Bind | Segment::BindList => {
                    marker += 1;
                    out.push('?');
                    out.push_str(&marker.to_string());
                }
            }
        }
        out
    }

    fn render<F>(&self, bind: &mut F) -> String
    where
        F: FnMut(&Value) -> usize,
    {
        let mut out = String::new();
        let mut values = self.values.iter();
        for seg in &self.segments {
            match seg {
                Segment::Raw(s) => out.push_str(s),
                Segment::Bind => {
                    if let Some(v) = values.next() {
                        out.push('$');
                        out.push_str(&bind(v).to_string());
                    }
                }
                Segment::BindList => {
                    out.push('(');
                    for (i, v) in values.by_ref().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push('$');
                        out.push_str(&bind(v).to_string());
                    }
                    out.push(')');
                }
            }
        }
        out
    }
}

/// One testable condition, or a parenthesized combination of conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// No usable input; contributes neither a clause nor a placeholder.
    Empty,
    Leaf(Leaf),
    Group { op: GroupOp, children: Vec<Predicate> },
}

impl Predicate {
    /// Build a group. Children that render to nothing are skipped.
    pub fn group(op: GroupOp, children: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Group {
            op,
            children: children.into_iter().collect(),
        }
    }

    /// Parenthesized OR group; same as [`or`].
    pub fn or(children: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::group(GroupOp::Or, children)
    }

    /// Parenthesized AND group; same as [`and`].
    pub fn and(children: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::group(GroupOp::And, children)
    }

    /// True when the predicate would render nothing: `Empty`, or a group whose
    /// children are all empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Predicate::Empty => true,
            Predicate::Leaf(_) => false,
            Predicate::Group { children, .. } => children.iter().all(Predicate::is_empty),
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Predicate::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Number of placeholders this predicate allocates when added to a builder.
    pub fn param_count(&self) -> usize {
        match self {
            Predicate::Empty => 0,
            Predicate::Leaf(leaf) => leaf.values.len(),
            Predicate::Group { children, .. } => {
                children.iter().map(Predicate::param_count).sum()
            }
        }
    }

    /// Render depth-first, asking `bind` for the placeholder number of each
    /// value in visit order. Returns `None` when nothing renders.
    pub(crate) fn render<F>(&self, bind: &mut F) -> Option<String>
    where
        F: FnMut(&Value) -> usize,
    {
        match self {
            Predicate::Empty => None,
            Predicate::Leaf(leaf) => Some(leaf.render(bind)),
            Predicate::Group { op, children } => {
                let parts: Vec<String> = children.iter().filter_map(|c| c.render(bind)).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(format!("({})", parts.join(op.separator())))
                }
            }
        }
    }
}

impl From<Leaf> for Predicate {
    fn from(leaf: Leaf) -> Self {
        Predicate::Leaf(leaf)
    }
}

/// Parenthesized OR group.
pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::group(GroupOp::Or, predicates)
}

/// Parenthesized AND group.
pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::group(GroupOp::And, predicates)
}
