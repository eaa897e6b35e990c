//! Trie vertices.
//!
//! A [`Node`] owns one path fragment and links to four kinds of children,
//! tried in this order when matching:
//!
//! ```text
//! static children   keyed by first character, sorted by priority
//! wildcard child    one `:name` segment, shared by every name at this spot
//! regex children    `~regex` leaves, kept in registration order
//! catch-all child   one `*name` leaf
//! ```
//!
//! Building lives in [`tree`](crate::tree), searching in
//! [`matching`](crate::matching).

use crate::error::RouteError;
use crate::handler::{registered_methods, Handler};
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Write as _;

/// The kind of pattern token a node was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Literal text, possibly a shared prefix fragment.
    Static,
    /// A `:name` segment.
    Wildcard,
    /// A terminal `~regex` token.
    Regex,
    /// A terminal `*name` token.
    CatchAll,
}

impl RouteKind {
    /// Marker used in tree dumps.
    fn marker(self) -> &'static str {
        match self {
            Self::Static => "",
            Self::Wildcard => ":",
            Self::Regex => "~",
            Self::CatchAll => "*",
        }
    }
}

pub(crate) struct Node<H> {
    /// Static text, catch-all name, or regex source.
    pub(crate) path: String,
    /// First pattern registered at this node.
    pub(crate) full_path: Option<String>,
    pub(crate) kind: RouteKind,
    pub(crate) priority: u32,

    pub(crate) static_indices: Vec<char>,
    pub(crate) static_children: Vec<Node<H>>,
    pub(crate) wildcard_child: Option<Box<Node<H>>>,
    pub(crate) regex_children: Vec<Node<H>>,
    pub(crate) regex: Option<Regex>,
    pub(crate) catch_all_child: Option<Box<Node<H>>>,

    pub(crate) add_slash: bool,
    /// The `HEAD` entry was filled from `GET` and may be replaced.
    pub(crate) implicit_head: bool,
    pub(crate) handlers: HashMap<String, H>,
    /// Variable names from the root down to this node, outermost first.
    pub(crate) param_names: Option<Vec<String>>,
}

impl<H> Node<H> {
    pub(crate) fn new(path: impl Into<String>, kind: RouteKind) -> Self {
        Self {
            path: path.into(),
            full_path: None,
            kind,
            priority: 0,
            static_indices: Vec::new(),
            static_children: Vec::new(),
            wildcard_child: None,
            regex_children: Vec::new(),
            regex: None,
            catch_all_child: None,
            add_slash: false,
            implicit_head: false,
            handlers: HashMap::new(),
            param_names: None,
        }
    }

    pub(crate) fn root() -> Self {
        Self::new("/", RouteKind::Static)
    }

    /// Store `handler` for `method`.
    ///
    /// A second registration for the same method fails, unless the existing
    /// entry is a `HEAD` that was filled in implicitly.
    pub(crate) fn set_handler(
        &mut self,
        pattern: &str,
        method: &str,
        handler: H,
        implicit_head: bool,
    ) -> Result<(), RouteError> {
        if self.handlers.contains_key(method) && (method != "HEAD" || !self.implicit_head) {
            return Err(RouteError::DuplicateHandler {
                pattern: pattern.to_string(),
                method: method.to_string(),
            });
        }
        self.handlers.insert(method.to_string(), handler);
        if method == "HEAD" {
            self.implicit_head = implicit_head;
        }
        Ok(())
    }

    /// Record the parameter names for a route ending here, or check them
    /// against the names recorded by an earlier route.
    pub(crate) fn bind_param_names(
        &mut self,
        pattern: &str,
        names: Vec<String>,
    ) -> Result<(), RouteError> {
        match &self.param_names {
            Some(existing) if *existing != names => Err(RouteError::AmbiguousParams {
                pattern: pattern.to_string(),
                existing: existing.clone(),
                new: names,
            }),
            Some(_) => Ok(()),
            None => {
                self.param_names = Some(names);
                Ok(())
            }
        }
    }

    pub(crate) fn param_names(&self) -> &[String] {
        self.param_names.as_deref().unwrap_or_default()
    }

    /// Move the static child at `index` towards the front while its priority
    /// beats its left neighbour. Returns the child's new index.
    pub(crate) fn sort_static_child(&mut self, mut index: usize) -> usize {
        while index > 0
            && self.static_children[index].priority > self.static_children[index - 1].priority
        {
            self.static_children.swap(index, index - 1);
            self.static_indices.swap(index, index - 1);
            index -= 1;
        }
        index
    }

    /// Render this node and its subtree, one line per node.
    pub(crate) fn dump_tree(&self, prefix: &str, out: &mut String) {
        let methods = registered_methods(&self.handlers);
        let _ = writeln!(
            out,
            "{} {:02} {}{} [{}] [{}] params [{}]",
            prefix,
            self.priority,
            self.kind.marker(),
            self.path,
            self.static_children.len(),
            methods.join(" "),
            self.param_names().join(" "),
        );

        let prefix = format!("{prefix}  ");
        for child in &self.static_children {
            child.dump_tree(&prefix, out);
        }
        if let Some(child) = &self.wildcard_child {
            child.dump_tree(&prefix, out);
        }
        for child in &self.regex_children {
            child.dump_tree(&prefix, out);
        }
        if let Some(child) = &self.catch_all_child {
            child.dump_tree(&prefix, out);
        }
    }
}

impl<H: Handler> Node<H> {
    /// The handler for `method`, if one is registered and valid.
    pub(crate) fn handler_for(&self, method: &str) -> Option<&H> {
        self.handlers.get(method).filter(|h| h.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_handler_rejected() {
        let mut node: Node<&'static str> = Node::root();
        node.set_handler("/", "GET", "a", false).unwrap();
        let err = node.set_handler("/", "GET", "b", false).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateHandler { .. }));
        assert_eq!(node.handlers["GET"], "a");
    }

    #[test]
    fn test_implicit_head_can_be_replaced_once() {
        let mut node: Node<&'static str> = Node::root();
        node.set_handler("/", "HEAD", "from-get", true).unwrap();
        node.set_handler("/", "HEAD", "explicit", false).unwrap();
        assert_eq!(node.handlers["HEAD"], "explicit");
        assert!(node.set_handler("/", "HEAD", "again", false).is_err());
    }

    #[test]
    fn test_handler_for_skips_invalid() {
        let mut node: Node<&'static str> = Node::root();
        node.set_handler("/", "GET", "", false).unwrap();
        node.set_handler("/", "POST", "p", false).unwrap();
        assert_eq!(node.handler_for("GET"), None);
        assert_eq!(node.handler_for("POST"), Some(&"p"));
        assert_eq!(node.handler_for("PUT"), None);
    }

    #[test]
    fn test_bind_param_names() {
        let mut node: Node<usize> = Node::new("wildcard", RouteKind::Wildcard);
        node.bind_param_names("/:a", vec!["a".to_string()]).unwrap();
        node.bind_param_names("/:a", vec!["a".to_string()]).unwrap();
        let err = node
            .bind_param_names("/:b", vec!["b".to_string()])
            .unwrap_err();
        assert!(matches!(err, RouteError::AmbiguousParams { .. }));
        assert_eq!(node.param_names(), ["a"]);
    }

    #[test]
    fn test_sort_static_child_bubbles_up() {
        let mut node: Node<usize> = Node::root();
        for (c, priority) in [('a', 3), ('b', 1), ('c', 2)] {
            let mut child = Node::new(c.to_string(), RouteKind::Static);
            child.priority = priority;
            node.static_indices.push(c);
            node.static_children.push(child);
        }
        assert_eq!(node.sort_static_child(2), 1);
        assert_eq!(node.static_indices, vec!['a', 'c', 'b']);
        assert_eq!(node.static_children[1].path, "c");
    }
}
