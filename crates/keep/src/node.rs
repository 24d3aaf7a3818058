//! Strategy tree
//!
//! A [`Node`] is a named container of strategies and nested nodes. Nodes only
//! group strategies; dispatch always flattens the tree into its leaves,
//! visited pre-order in insertion order.

use crate::error::{KeepError, Result};
use crate::strategy::Strategy;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Separator between names in a strategy path, e.g. `accounting/balances`
pub const PATH_SEPARATOR: char = '/';

/// A registered strategy, kept twice so it can be dispatched to and downcast
struct Leaf {
    strategy: Arc<dyn Strategy>,
    any: Arc<dyn Any + Send + Sync>,
}

enum Child {
    Leaf(Leaf),
    Group(Node),
}

/// Named container of strategies
#[derive(Default)]
pub struct Node {
    children: Vec<(String, Child)>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy under `name`
    pub fn add<S: Strategy + 'static>(&mut self, name: impl Into<String>, strategy: S) -> Result<()> {
        self.add_shared(name, Arc::new(strategy))
    }

    /// Register a strategy the caller keeps a handle to
    pub fn add_shared<S: Strategy + 'static>(
        &mut self,
        name: impl Into<String>,
        strategy: Arc<S>,
    ) -> Result<()> {
        let any: Arc<dyn Any + Send + Sync> = strategy.clone();
        self.insert(
            name.into(),
            Child::Leaf(Leaf {
                strategy,
                any,
            }),
        )
    }

    /// Register a nested group of strategies under `name`
    pub fn add_group(&mut self, name: impl Into<String>, node: Node) -> Result<()> {
        self.insert(name.into(), Child::Group(node))
    }

    fn insert(&mut self, name: String, child: Child) -> Result<()> {
        if name.is_empty() || name.contains(PATH_SEPARATOR) {
            return Err(KeepError::InvalidName(name));
        }
        if self.children.iter().any(|(existing, _)| *existing == name) {
            return Err(KeepError::DuplicateName(name));
        }

        self.children.push((name, child));
        Ok(())
    }

    fn child(&self, path: &str) -> Option<&Child> {
        let (head, rest) = match path.split_once(PATH_SEPARATOR) {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        let (_, child) = self.children.iter().find(|(name, _)| name == head)?;
        match (child, rest) {
            (_, None) => Some(child),
            (Child::Group(node), Some(rest)) => node.child(rest),
            (Child::Leaf(_), Some(_)) => None,
        }
    }

    /// Strategy registered at `path`
    pub fn get(&self, path: &str) -> Option<Arc<dyn Strategy>> {
        match self.child(path)? {
            Child::Leaf(leaf) => Some(leaf.strategy.clone()),
            Child::Group(_) => None,
        }
    }

    /// Strategy registered at `path`, if it has concrete type `S`
    pub fn get_as<S: Strategy + 'static>(&self, path: &str) -> Option<Arc<S>> {
        match self.child(path)? {
            Child::Leaf(leaf) => leaf.any.clone().downcast::<S>().ok(),
            Child::Group(_) => None,
        }
    }

    /// Nested group registered at `path`
    pub fn group(&self, path: &str) -> Option<&Node> {
        match self.child(path)? {
            Child::Group(node) => Some(node),
            Child::Leaf(_) => None,
        }
    }

    /// Every strategy in the tree with its full path, pre-order
    pub fn leaves(&self) -> Vec<(String, Arc<dyn Strategy>)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves(&self, prefix: &str, out: &mut Vec<(String, Arc<dyn Strategy>)>) {
        for (name, child) in &self.children {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}{PATH_SEPARATOR}{name}")
            };

            match child {
                Child::Leaf(leaf) => out.push((path, leaf.strategy.clone())),
                Child::Group(node) => node.collect_leaves(&path, out),
            }
        }
    }

    /// Direct children names, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(name, _)| name.as_str())
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, child) in &self.children {
            match child {
                Child::Leaf(_) => map.entry(name, &"strategy"),
                Child::Group(node) => map.entry(name, node),
            };
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::NoopStrategy;

    struct Named(&'static str);

    impl Strategy for Named {}

    #[test]
    fn test_duplicate_name_rejected() {
        let mut root = Node::new();
        root.add("balances", NoopStrategy).unwrap();

        let result = root.add("balances", NoopStrategy);
        assert!(matches!(result, Err(KeepError::DuplicateName(name)) if name == "balances"));

        let result = root.add_group("balances", Node::new());
        assert!(matches!(result, Err(KeepError::DuplicateName(_))));
    }

    #[test]
    fn test_same_name_allowed_in_different_groups() {
        let mut group = Node::new();
        group.add("ticker", NoopStrategy).unwrap();

        let mut root = Node::new();
        root.add("ticker", NoopStrategy).unwrap();
        root.add_group("accounting", group).unwrap();

        assert!(root.get("ticker").is_some());
        assert!(root.get("accounting/ticker").is_some());
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut root = Node::new();
        assert!(matches!(root.add("", NoopStrategy), Err(KeepError::InvalidName(_))));
        assert!(matches!(root.add("a/b", NoopStrategy), Err(KeepError::InvalidName(_))));
        assert!(root.is_empty());
    }

    #[test]
    fn test_leaves_are_pre_order() {
        let mut inner = Node::new();
        inner.add("c", NoopStrategy).unwrap();
        inner.add("d", NoopStrategy).unwrap();

        let mut root = Node::new();
        root.add("a", NoopStrategy).unwrap();
        root.add_group("b", inner).unwrap();
        root.add("e", NoopStrategy).unwrap();

        let paths: Vec<String> = root.leaves().into_iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["a", "b/c", "b/d", "e"]);
        assert_eq!(root.names().collect::<Vec<_>>(), vec!["a", "b", "e"]);
        assert_eq!(root.len(), 3);
    }

    #[test]
    fn test_get_as_downcasts() {
        let mut root = Node::new();
        root.add("named", Named("first")).unwrap();
        root.add("noop", NoopStrategy).unwrap();

        let named = root.get_as::<Named>("named").unwrap();
        assert_eq!(named.0, "first");
        assert!(root.get_as::<Named>("noop").is_none());
        assert!(root.get_as::<Named>("missing").is_none());
    }

    #[test]
    fn test_groups_are_not_strategies() {
        let mut root = Node::new();
        root.add_group("group", Node::new()).unwrap();

        assert!(root.get("group").is_none());
        assert!(root.group("group").is_some());
        assert!(root.get("group/missing").is_none());
    }

    #[test]
    fn test_add_shared_keeps_caller_handle() {
        let shared = Arc::new(Named("shared"));
        let mut root = Node::new();
        root.add_shared("named", shared.clone()).unwrap();

        let found = root.get_as::<Named>("named").unwrap();
        assert!(Arc::ptr_eq(&shared, &found));
    }
}
