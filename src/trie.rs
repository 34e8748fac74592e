//! Segment trie used as the per-method routing tree.
//!
//! Each node is one path depth. A node has literal children keyed by exact
//! text, at most one parameter child, and optionally a value of its own, so a
//! node can end a short route while also leading to longer ones.
//!
//! Lookup consumes one concrete segment per depth, preferring the literal
//! child and falling back to the parameter child. It never backtracks: once a
//! literal child is taken, a dead end below it is a miss even if the
//! parameter branch would have matched.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::path::Segment;
use crate::request::Params;

/// A routing tree mapping segment patterns to values of type `T`.
#[derive(Debug)]
pub struct Trie<T> {
    root: Node<T>,
}

#[derive(Debug)]
struct Node<T> {
    literals: HashMap<String, Node<T>>,
    param: Option<(String, Box<Node<T>>)>,
    value: Option<T>,
}

impl<T> Node<T> {
    fn new() -> Self {
        Self { literals: HashMap::new(), param: None, value: None }
    }
}

impl<T> Trie<T> {
    pub fn new() -> Self {
        Self { root: Node::new() }
    }

    /// Stores `value` at the node reached by `pattern`, creating nodes as needed.
    ///
    /// A value already stored there is replaced. Only one parameter child
    /// exists per depth: registering `:b` where `:a` already sits reuses the
    /// `:a` subtree and renames it, so every route through it binds `b`.
    pub fn insert(&mut self, pattern: &[Segment], value: T) {
        let mut node = &mut self.root;
        for segment in pattern {
            node = match segment {
                Segment::Literal(text) => node.literals.entry(text.clone()).or_insert_with(Node::new),
                Segment::Param(name) => {
                    let (current, child) = node
                        .param
                        .get_or_insert_with(|| (name.clone(), Box::new(Node::new())));
                    if *current != *name {
                        warn!(old = %current, new = %name, "parameter renamed at shared depth");
                        *current = name.clone();
                    }
                    &mut **child
                }
            };
        }
        if node.value.replace(value).is_some() {
            debug!(?pattern, "route replaced");
        }
    }

    /// Resolves concrete path segments to a stored value and bound parameters.
    ///
    /// Returns `None` when a segment has no matching child, or when the final
    /// node exists only as a prefix of longer routes.
    pub fn at(&self, segments: &[&str]) -> Option<(&T, Params)> {
        let mut params = Params::new();
        let mut node = &self.root;
        for segment in segments {
            node = match node.literals.get(*segment) {
                Some(child) => child,
                None => {
                    let (name, child) = node.param.as_ref()?;
                    params.insert(name.clone(), (*segment).to_owned());
                    &**child
                }
            };
        }
        node.value.as_ref().map(|value| (value, params))
    }
}

impl<T> Default for Trie<T> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{parse_pattern, split_path};

    fn trie(routes: &[(&str, u32)]) -> Trie<u32> {
        let mut trie = Trie::new();
        for (pattern, value) in routes {
            trie.insert(&parse_pattern(pattern), *value);
        }
        trie
    }

    fn find(trie: &Trie<u32>, path: &str) -> Option<(u32, Params)> {
        trie.at(&split_path(path)).map(|(v, p)| (*v, p))
    }

    #[test]
    fn binds_parameters() {
        let t = trie(&[("/users/:id/posts/:post", 1)]);
        let (value, params) = find(&t, "/users/42/posts/7").unwrap();
        assert_eq!(value, 1);
        assert_eq!(params["id"], "42");
        assert_eq!(params["post"], "7");
    }

    #[test]
    fn literal_wins_over_parameter() {
        let t = trie(&[("/users/:id", 1), ("/users/about", 2)]);
        let (value, params) = find(&t, "/users/about").unwrap();
        assert_eq!(value, 2);
        assert!(params.is_empty());
        assert_eq!(find(&t, "/users/9").unwrap().0, 1);
    }

    #[test]
    fn prefix_without_value_is_a_miss() {
        let t = trie(&[("/a/b/c", 1)]);
        assert!(find(&t, "/a/b").is_none());
        assert!(find(&t, "/a/b/c/d").is_none());
    }

    #[test]
    fn shorter_route_can_be_added_after_longer() {
        let t = trie(&[("/a/b", 1), ("/a", 2)]);
        assert_eq!(find(&t, "/a").unwrap().0, 2);
        assert_eq!(find(&t, "/a/b").unwrap().0, 1);
    }

    #[test]
    fn last_registration_wins() {
        let t = trie(&[("/x", 1), ("/x", 2)]);
        assert_eq!(find(&t, "/x").unwrap().0, 2);
    }

    #[test]
    fn root_and_empty_path_are_the_same() {
        let t = trie(&[("/", 1)]);
        assert_eq!(find(&t, "/").unwrap().0, 1);
        assert_eq!(find(&t, "").unwrap().0, 1);
        assert!(Trie::<u32>::new().at(&split_path("/")).is_none());
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let t = trie(&[("/about", 1)]);
        assert_eq!(find(&t, "/about"), find(&t, "/about/"));
    }

    #[test]
    fn second_parameter_name_renames_shared_child() {
        let t = trie(&[("/users/:id", 1), ("/users/:name/edit", 2)]);
        assert_eq!(find(&t, "/users/7").unwrap().1["name"], "7");
        assert_eq!(find(&t, "/users/bob/edit").unwrap().1["name"], "bob");
    }

    #[test]
    fn literal_branch_does_not_backtrack() {
        let t = trie(&[("/files/:name/raw", 1), ("/files/readme", 2)]);
        assert!(find(&t, "/files/readme/raw").is_none());
        assert_eq!(find(&t, "/files/notes/raw").unwrap().0, 1);
    }
}
