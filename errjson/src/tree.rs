use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key holding messages about a field that also has nested failures.
pub const SELF_KEY: &str = "_errors";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Leaf(Vec<String>),
    Branch(ValidationTree),
}

/// Rendered validation messages, nested the same way as the field paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationTree(BTreeMap<String, Node>);

impl ValidationTree {
    pub fn new() -> Self {
        ValidationTree(BTreeMap::new())
    }

    /// Appends `message` to the leaf at `path`, creating branches on the way.
    pub fn insert(&mut self, path: &[String], message: String) {
        match path.split_last() {
            Some((last, parents)) => self.insert_under(parents, last, message),
            None => self.push_leaf(SELF_KEY, message),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    pub fn lookup(&self, path: &[&str]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.0.get(*first)?;
        for key in rest {
            match node {
                Node::Branch(branch) => node = branch.0.get(*key)?,
                Node::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Messages stored at `path`, if it ends on a leaf.
    pub fn messages(&self, path: &[&str]) -> Option<&[String]> {
        match self.lookup(path)? {
            Node::Leaf(messages) => Some(messages),
            Node::Branch(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.0.iter()
    }

    fn push_leaf(&mut self, key: &str, message: String) {
        let node = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| Node::Leaf(Vec::new()));

        match node {
            Node::Leaf(messages) => messages.push(message),
            Node::Branch(branch) => branch.push_leaf(SELF_KEY, message),
        }
    }

    fn insert_under(&mut self, parents: &[String], last: &str, message: String) {
        let Some((key, rest)) = parents.split_first() else {
            self.push_leaf(last, message);
            return;
        };

        let node = self
            .0
            .entry(key.clone())
            .or_insert_with(|| Node::Branch(ValidationTree::new()));

        match node {
            Node::Branch(branch) => branch.insert_under(rest, last, message),
            Node::Leaf(messages) => {
                // A field with its own messages gains nested ones: keep both
                let mut branch = ValidationTree::new();
                branch
                    .0
                    .insert(SELF_KEY.to_string(), Node::Leaf(std::mem::take(messages)));
                branch.insert_under(rest, last, message);
                *node = Node::Branch(branch);
            }
        }
    }
}
