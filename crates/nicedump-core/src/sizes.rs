//! Code size aggregation over the qualified-name hierarchy.
//!
//! Each symbol's size is charged to its own node and rolled up through every
//! enclosing scope. A node's total is its own weight plus the totals of its
//! direct children, so each byte is counted once per level.

use std::fmt;

use indexmap::IndexMap;

use crate::QName;

/// Name of the synthetic root holding top-level symbols without a scope.
pub const GLOBAL_BUCKET: &str = "<global>";

#[derive(Debug, Clone, Default)]
struct Node {
    /// Size charged directly to this name as a symbol.
    own: u64,
    /// Set once the name was seen as a symbol, not only as a scope.
    is_symbol: bool,
    /// Indices of direct children, in order of first appearance.
    children: Vec<usize>,
}

/// Sizes of all symbols and their enclosing scopes.
#[derive(Debug, Clone, Default)]
pub struct SizeTree {
    nodes: IndexMap<QName, Node>,
    totals: Vec<u64>,
}

impl SizeTree {
    /// Aggregates `(name, size)` pairs. Duplicate names sum their sizes.
    pub fn build<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = (QName, u64)>,
    {
        let mut nodes: IndexMap<QName, Node> = IndexMap::new();

        for (qname, size) in symbols {
            let ancestors: Vec<QName> = qname.ancestors().cloned().collect();

            let entry = nodes.entry(qname);
            let mut child = entry.index();
            let node = entry.or_default();
            node.own = node.own.saturating_add(size);
            node.is_symbol = true;

            for ancestor in ancestors {
                let entry = nodes.entry(ancestor);
                let parent = entry.index();
                let node = entry.or_default();
                if !node.children.contains(&child) {
                    node.children.push(child);
                }
                child = parent;
            }
        }

        let mut totals: Vec<Option<u64>> = vec![None; nodes.len()];
        for index in 0..nodes.len() {
            total_of(&nodes, &mut totals, index);
        }

        Self {
            nodes,
            totals: totals.into_iter().map(|t| t.unwrap_or(0)).collect(),
        }
    }

    /// Number of distinct names, symbols and scopes together.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total size of a symbol or scope, `None` if the name never appeared.
    pub fn size_of(&self, name: &QName) -> Option<u64> {
        self.nodes.get_index_of(name).map(|i| self.totals[i])
    }

    /// Total size of the top-level names with no children.
    pub fn global_size(&self) -> u64 {
        self.global_members()
            .map(|i| self.totals[i])
            .fold(0, u64::saturating_add)
    }

    fn roots(&self) -> impl Iterator<Item = (usize, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, (qname, _))| qname.is_root())
            .map(|(i, (_, node))| (i, node))
    }

    fn global_members(&self) -> impl Iterator<Item = usize> + '_ {
        self.roots()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(i, _)| i)
    }

    fn name_at(&self, index: usize) -> String {
        self.nodes
            .get_index(index)
            .map(|(qname, _)| qname.to_string())
            .unwrap_or_default()
    }

    fn entry(&self, index: usize) -> SizeEntry {
        let children = self
            .nodes
            .get_index(index)
            .map(|(_, node)| node.children.iter().map(|&c| self.entry(c)).collect())
            .unwrap_or_default();
        SizeEntry {
            name: self.name_at(index),
            size: self.totals[index],
            children: sorted(children),
        }
    }

    /// Every symbol with its own size, largest first.
    pub fn flat(&self) -> SizeReport {
        let entries = self
            .nodes
            .iter()
            .filter(|(_, node)| node.is_symbol)
            .map(|(qname, node)| SizeEntry::leaf(qname.to_string(), node.own))
            .collect();
        SizeReport::Flat(sorted(entries))
    }

    /// Top-level scopes and the global bucket, each with its subtree.
    pub fn tree(&self) -> SizeReport {
        let mut roots: Vec<SizeEntry> = self
            .roots()
            .filter(|(_, node)| !node.children.is_empty())
            .map(|(i, _)| self.entry(i))
            .collect();

        let members: Vec<SizeEntry> = self.global_members().map(|i| self.entry(i)).collect();
        roots.push(SizeEntry {
            name: GLOBAL_BUCKET.to_string(),
            size: members.iter().map(|m| m.size).fold(0, u64::saturating_add),
            children: sorted(members),
        });

        SizeReport::Tree(sorted(roots))
    }
}

fn total_of(nodes: &IndexMap<QName, Node>, totals: &mut [Option<u64>], index: usize) -> u64 {
    if let Some(total) = totals[index] {
        return total;
    }
    let Some((_, node)) = nodes.get_index(index) else {
        return 0;
    };
    let mut total = node.own;
    for &child in &node.children {
        total = total.saturating_add(total_of(nodes, totals, child));
    }
    totals[index] = Some(total);
    total
}

/// Stable sort by descending size; ties keep first-appearance order.
fn sorted(mut entries: Vec<SizeEntry>) -> Vec<SizeEntry> {
    entries.sort_by(|a, b| b.size.cmp(&a.size));
    entries
}

/// One line of a size report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeEntry {
    pub name: String,
    pub size: u64,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<SizeEntry>,
}

impl SizeEntry {
    fn leaf(name: String, size: u64) -> Self {
        Self {
            name,
            size,
            children: Vec::new(),
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{} ({})", "", self.name, self.size, indent = level * 2)?;
        for child in &self.children {
            child.write_tree(f, level + 1)?;
        }
        Ok(())
    }
}

/// A sorted size report, ready for printing or serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "layout", content = "entries", rename_all = "lowercase")
)]
pub enum SizeReport {
    /// Symbols only, `name size` per line.
    Flat(Vec<SizeEntry>),
    /// Scopes with nested children, `name (size)` indented two spaces per level.
    Tree(Vec<SizeEntry>),
}

impl SizeReport {
    pub fn entries(&self) -> &[SizeEntry] {
        match self {
            Self::Flat(entries) | Self::Tree(entries) => entries,
        }
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat(entries) => {
                for entry in entries {
                    writeln!(f, "{} {}", entry.name, entry.size)?;
                }
            }
            Self::Tree(entries) => {
                for entry in entries {
                    entry.write_tree(f, 0)?;
                }
            }
        }
        Ok(())
    }
}
