//! Boolean access policies over attributes.
//!
//! A policy is a rooted tree of AND / OR / k-of-n threshold gates with
//! attribute leaves. Parsing always canonicalizes: nested AND under AND and
//! OR under OR are flattened (both are associative) and the children of every
//! gate are sorted by the rendered form of their subtree. Two logically
//! equivalent policies therefore share one canonical string, which the CCA
//! re-encryption check depends on. Threshold gates are not associative and
//! are never flattened.

mod parser;

pub mod lsss;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Separator between attributes in the textual attribute-list form.
pub const ATTR_SEP: char = '|';

/// Gate kinds of internal policy nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    And,
    Or,
    Threshold(u32),
}

/// One node of a policy tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Leaf {
        prefix: Option<String>,
        label: String,
    },
    Gate {
        kind: GateKind,
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    pub fn leaf(prefix: Option<String>, label: String) -> Self {
        TreeNode::Leaf { prefix, label }
    }

    pub fn gate(kind: GateKind, children: Vec<TreeNode>) -> Self {
        TreeNode::Gate { kind, children }
    }

    /// The number of children that must be satisfied.
    pub fn threshold(&self) -> u32 {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Gate { kind, children } => match kind {
                GateKind::And => children.len() as u32,
                GateKind::Or => 1,
                GateKind::Threshold(k) => *k,
            },
        }
    }

    /// Full attribute name of a leaf (`prefix:label` or bare `label`).
    pub fn full_name(&self) -> Option<String> {
        match self {
            TreeNode::Leaf { prefix, label } => Some(match prefix {
                Some(p) => format!("{p}:{label}"),
                None => label.clone(),
            }),
            TreeNode::Gate { .. } => None,
        }
    }

    /// Canonicalizes the subtree in place: children first, then associative
    /// flattening of AND/OR, then a sort of every gate's children.
    pub fn canonicalize(&mut self) {
        let TreeNode::Gate { kind, children } = self else {
            return;
        };
        for child in children.iter_mut() {
            child.canonicalize();
        }

        if matches!(kind, GateKind::And | GateKind::Or) {
            let own = *kind;
            if children.iter().any(|c| c.is_gate_of(own)) {
                let mut flattened = Vec::with_capacity(children.len());
                for child in children.drain(..) {
                    match child {
                        TreeNode::Gate {
                            kind: child_kind,
                            children: grandchildren,
                        } if child_kind == own => flattened.extend(grandchildren),
                        other => flattened.push(other),
                    }
                }
                *children = flattened;
            }
        }

        children.sort_by_cached_key(|c| c.to_string());
    }

    fn is_gate_of(&self, kind: GateKind) -> bool {
        matches!(self, TreeNode::Gate { kind: k, .. } if *k == kind)
    }

    fn visit_leaves<'a>(&'a self, f: &mut impl FnMut(&'a TreeNode)) {
        match self {
            TreeNode::Leaf { .. } => f(self),
            TreeNode::Gate { children, .. } => {
                for child in children {
                    child.visit_leaves(f);
                }
            }
        }
    }
}

impl fmt::Display for TreeNode {
    /// Paper form: binary AND/OR are infix, everything n-ary (and every
    /// threshold gate) uses the explicit `k of (…)` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeNode::Leaf { .. } => f.write_str(&self.full_name().unwrap()),
            TreeNode::Gate { kind, children } => {
                if children.len() == 2 && matches!(kind, GateKind::And | GateKind::Or) {
                    let op = if *kind == GateKind::And { "and" } else { "or" };
                    write!(f, "({} {op} {})", children[0], children[1])
                } else {
                    write!(f, "{} of (", self.threshold())?;
                    for (i, child) in children.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{child}")?;
                    }
                    f.write_str(")")
                }
            }
        }
    }
}

/// A parsed, canonicalized access policy with duplicate-attribute tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    root: TreeNode,
    attr_counts: BTreeMap<String, u32>,
    attr_set: BTreeSet<String>,
    has_duplicates: bool,
}

impl Policy {
    /// Wraps an already-built tree, canonicalizing it and recomputing the
    /// attribute bookkeeping.
    pub fn from_tree(mut root: TreeNode) -> Self {
        root.canonicalize();
        let mut attr_counts = BTreeMap::new();
        root.visit_leaves(&mut |leaf| {
            *attr_counts
                .entry(leaf.full_name().unwrap())
                .or_insert(0u32) += 1;
        });
        let attr_set: BTreeSet<String> = attr_counts.keys().cloned().collect();
        let has_duplicates = attr_counts.values().any(|&n| n > 1);
        Policy {
            root,
            attr_counts,
            attr_set,
            has_duplicates,
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// The canonical textual form.
    pub fn to_canonical_string(&self) -> String {
        self.root.to_string()
    }

    /// All attributes appearing at least once.
    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attr_set
    }

    pub fn has_duplicates(&self) -> bool {
        self.has_duplicates
    }

    /// How often `attr` occurs in the policy.
    pub fn occurrences(&self, attr: &str) -> u32 {
        self.attr_counts.get(attr).copied().unwrap_or(0)
    }
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let root = parser::parse(s)?;
        Ok(Policy::from_tree(root))
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

/// A single, possibly namespaced attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Attribute {
    pub prefix: Option<String>,
    pub label: String,
}

impl Attribute {
    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.label),
            None => self.label.clone(),
        }
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (prefix, label) = match s.split_once(':') {
            Some((p, l)) => (Some(p), l),
            None => (None, s),
        };
        if label.is_empty() || !label.chars().all(is_attr_char) {
            return Err(Error::InvalidInput);
        }
        if let Some(p) = prefix {
            if p.is_empty() || !p.chars().all(is_attr_char) {
                return Err(Error::InvalidInput);
            }
        }
        Ok(Attribute {
            prefix: prefix.map(str::to_owned),
            label: label.to_owned(),
        })
    }
}

pub(crate) fn is_attr_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@')
}

/// A set of attributes; the canonical textual form is pipe-separated
/// (`"a|b|c"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeList {
    attrs: Vec<Attribute>,
}

impl AttributeList {
    pub fn attributes(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn full_names(&self) -> BTreeSet<String> {
        self.attrs.iter().map(Attribute::full_name).collect()
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.attrs.iter().any(|a| a.full_name() == full_name)
    }
}

impl FromStr for AttributeList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut attrs = Vec::new();
        for part in s.split(ATTR_SEP) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            attrs.push(part.parse()?);
        }
        if attrs.is_empty() {
            return Err(Error::InvalidInput);
        }
        attrs.sort();
        attrs.dedup();
        Ok(AttributeList { attrs })
    }
}

impl fmt::Display for AttributeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.attrs.iter().map(Attribute::full_name).collect();
        f.write_str(&names.join("|"))
    }
}
