//! AST data structures for astview.
//!
//! The parser hands the graph builder a tree of [`SyntaxNode`]s shaped like
//! CPython's `ast` module output: every node has a type name and a list of
//! named fields, each holding either a scalar value, a single child node, or
//! an ordered sequence of child nodes.

/// A node in the abstract syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    /// Type name, e.g. "FunctionDef", "Constant", "Name".
    pub type_name: String,
    /// Named fields in declaration order.
    pub fields: Vec<Field>,
}

/// A named field of a syntax node.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

/// The value held by a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A scalar, already rendered to text (constant values, identifiers).
    Scalar(String),
    /// A single child node.
    Child(SyntaxNode),
    /// An ordered sequence of child nodes.
    Children(Vec<SyntaxNode>),
}

/// Node kinds the graph builder treats specially. Everything the builder
/// does not recognise falls through to [`NodeKind::Other`] and gets generic
/// labelling, since the set of syntax node kinds is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A literal constant; its label embeds the rendered value.
    Constant,
    /// A named callable definition; its label embeds the declared name.
    FunctionDef,
    /// A usage-context marker on a name reference. Never becomes a graph
    /// node: it is folded into the parent's label instead.
    ContextMarker(UsageContext),
    Other,
}

/// The three usage-context kinds a name reference can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageContext {
    Load,
    Store,
    Del,
}

impl SyntaxNode {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_scalar(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            value: FieldValue::Scalar(value.into()),
        });
        self
    }

    pub fn with_child(mut self, name: &str, child: SyntaxNode) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            value: FieldValue::Child(child),
        });
        self
    }

    pub fn with_children(mut self, name: &str, children: Vec<SyntaxNode>) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            value: FieldValue::Children(children),
        });
        self
    }

    /// Classify this node for the builder's special cases.
    pub fn kind(&self) -> NodeKind {
        match self.type_name.as_str() {
            "Constant" => NodeKind::Constant,
            "FunctionDef" | "AsyncFunctionDef" => NodeKind::FunctionDef,
            "Load" => NodeKind::ContextMarker(UsageContext::Load),
            "Store" => NodeKind::ContextMarker(UsageContext::Store),
            "Del" => NodeKind::ContextMarker(UsageContext::Del),
            _ => NodeKind::Other,
        }
    }

    /// Look up a scalar field by name.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::Scalar(s) if f.name == name => Some(s.as_str()),
            _ => None,
        })
    }

    /// The identifier this node exposes, if any: the `id` field of a name
    /// reference or the `name` field of a definition.
    pub fn identifier(&self) -> Option<&str> {
        self.scalar("id").or_else(|| self.scalar("name"))
    }

    /// Direct children, iterating all child fields in declaration order and
    /// expanding sequences in field order.
    pub fn children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.fields.iter().flat_map(|f| match &f.value {
            FieldValue::Scalar(_) => ChildIter::None,
            FieldValue::Child(c) => ChildIter::One(std::iter::once(c)),
            FieldValue::Children(cs) => ChildIter::Many(cs.iter()),
        })
    }
}

enum ChildIter<'a> {
    None,
    One(std::iter::Once<&'a SyntaxNode>),
    Many(std::slice::Iter<'a, SyntaxNode>),
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ChildIter::None => None,
            ChildIter::One(it) => it.next(),
            ChildIter::Many(it) => it.next(),
        }
    }
}
