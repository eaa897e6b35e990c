//! Trie search.
//!
//! At every node the children are tried most specific first: static, then
//! wildcard, then regex, then catch-all. A branch that reaches a node with a
//! valid handler for the method wins at once. A branch that only reaches a
//! node (a path match with no handler for this method) is remembered as a
//! fallback so the router can answer 405 with the right `Allow` list instead
//! of 404.
//!
//! Captures are pushed while the recursion unwinds, so they come back
//! innermost first. [`Found::into_params`] reverses them before pairing them
//! with the node's parameter names.

use crate::handler::Handler;
use crate::node::Node;
use crate::params::Params;
use crate::path::unescape;

/// Result of a search: the node the path ended at and, separately, the
/// handler to use.
///
/// `handler` is `None` when the node has nothing valid for the method; the
/// node is still reported so the caller can list its methods.
pub(crate) struct Found<'n, H> {
    pub(crate) node: &'n Node<H>,
    pub(crate) handler: Option<&'n H>,
    /// Captured values, innermost first.
    pub(crate) captures: Vec<String>,
}

impl<'n, H> Found<'n, H> {
    fn leaf(node: &'n Node<H>, handler: Option<&'n H>, captures: Vec<String>) -> Self {
        Self {
            node,
            handler,
            captures,
        }
    }

    /// Pair the captures with the node's parameter names.
    ///
    /// # Panics
    ///
    /// Panics if the number of captures differs from the number of names.
    /// The builder guarantees they agree; a mismatch would bind values to the
    /// wrong names.
    pub(crate) fn into_params(self) -> Params {
        let names = self.node.param_names();
        assert_eq!(
            self.captures.len(),
            names.len(),
            "parameter list length mismatch: {:?}, {:?}",
            self.captures,
            names
        );

        let mut params = Params::with_capacity(names.len());
        for (name, value) in names.iter().zip(self.captures.into_iter().rev()) {
            params.push(name.as_str(), value);
        }
        params
    }
}

impl<H: Handler> Node<H> {
    /// Search for `path` (request path without its leading `/`).
    pub(crate) fn search<'n>(&'n self, method: &str, path: &str) -> Option<Found<'n, H>> {
        let Some(first) = path.chars().next() else {
            if self.handlers.is_empty() {
                return None;
            }
            return Some(Found::leaf(self, self.handler_for(method), Vec::new()));
        };

        // Best node seen so far from the static or wildcard branch.
        let mut fallback: Option<Found<'n, H>> = None;

        if let Some(index) = self.static_indices.iter().position(|&c| c == first) {
            let child = &self.static_children[index];
            if let Some(rest) = path.strip_prefix(child.path.as_str()) {
                if let Some(found) = child.search(method, rest) {
                    if found.handler.is_some() {
                        return Some(found);
                    }
                    fallback = Some(found);
                }
            }
        }

        if let Some(wildcard) = &self.wildcard_child {
            let end = path.find('/').unwrap_or(path.len());
            let (token, rest) = path.split_at(end);
            if !token.is_empty() {
                if let Some(mut found) = wildcard.search(method, rest) {
                    if found.handler.is_some() || fallback.is_none() {
                        found.captures.push(unescape(token).into_owned());
                        if found.handler.is_some() {
                            return Some(found);
                        }
                        fallback = Some(found);
                    }
                }
            }
        }

        let mut regex_fallback: Option<Found<'n, H>> = None;
        if !self.regex_children.is_empty() {
            if let Some(found) = self.search_regex_child(method, path) {
                if found.handler.is_some() {
                    return Some(found);
                }
                regex_fallback = Some(found);
            }
        }

        if let Some(catch_all) = &self.catch_all_child {
            let handler = catch_all.handler_for(method);
            let nothing_else = fallback.is_none() && regex_fallback.is_none();
            if !catch_all.handlers.is_empty() && (handler.is_some() || nothing_else) {
                return Some(Found::leaf(
                    catch_all,
                    handler,
                    vec![unescape(path).into_owned()],
                ));
            }
        }

        fallback.or(regex_fallback)
    }

    /// Try the regex children in registration order. The first one that
    /// matches decides, whether or not it has a handler for `method`.
    fn search_regex_child<'n>(&'n self, method: &str, path: &str) -> Option<Found<'n, H>> {
        for child in &self.regex_children {
            let Some(regex) = &child.regex else {
                continue;
            };
            let Some(captures) = regex.captures(path) else {
                continue;
            };

            let mut values: Vec<String> = regex
                .capture_names()
                .enumerate()
                .filter(|(_, name)| name.is_some())
                .map(|(i, _)| {
                    captures
                        .get(i)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default()
                })
                .collect();
            values.reverse();

            return Some(Found::leaf(child, child.handler_for(method), values));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(routes: &[(&'static str, &'static str)]) -> Node<&'static str> {
        let mut root = Node::root();
        for &(method, pattern) in routes {
            let node = root
                .add_path(pattern, &pattern[1..], Vec::new(), false)
                .unwrap();
            node.full_path.get_or_insert_with(|| pattern.to_string());
            node.set_handler(pattern, method, pattern, false).unwrap();
        }
        root
    }

    fn matched(root: &Node<&'static str>, method: &str, path: &str) -> Option<(String, Params)> {
        let found = root.search(method, &path[1..])?;
        let route = found.node.full_path.clone().unwrap_or_default();
        Some((route, found.into_params()))
    }

    #[test]
    fn test_static_beats_wildcard() {
        let root = tree(&[("GET", "/images/abc.jpg"), ("GET", "/images/:name")]);
        let (route, params) = matched(&root, "GET", "/images/abc.jpg").unwrap();
        assert_eq!(route, "/images/abc.jpg");
        assert!(params.is_empty());

        let (route, params) = matched(&root, "GET", "/images/other.jpg").unwrap();
        assert_eq!(route, "/images/:name");
        assert_eq!(params.get("name"), Some("other.jpg"));
    }

    #[test]
    fn test_wildcard_value_is_decoded() {
        let root = tree(&[("GET", "/date/:year/:month")]);
        let (_, params) = matched(&root, "GET", "/date/2014/ab%2f").unwrap();
        assert_eq!(params.get("year"), Some("2014"));
        assert_eq!(params.get("month"), Some("ab/"));
    }

    #[test]
    fn test_empty_segment_does_not_match_wildcard() {
        let root = tree(&[("GET", "/date/:year/:month")]);
        assert!(root.search("GET", "date/2014//").is_none());
        assert!(root.search("GET", "date//05").is_none());
    }

    #[test]
    fn test_catch_all_captures_rest() {
        let root = tree(&[("GET", "/files/*path")]);
        let (route, params) = matched(&root, "GET", "/files/a/b%20c/").unwrap();
        assert_eq!(route, "/files/*path");
        assert_eq!(params.get("path"), Some("a/b c/"));
    }

    #[test]
    fn test_regex_named_groups_in_order() {
        let root = tree(&[("GET", r"/smith/abc/~^some-(?P<var1>\w+)-(?P<var2>\d+)-(.*)$")]);
        let (_, params) = matched(&root, "GET", "/smith/abc/some-holiday-202110-hawaii").unwrap();
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("var1", "holiday"), ("var2", "202110")]
        );
    }

    #[test]
    fn test_regex_after_wildcard() {
        let root = tree(&[("GET", r"/users/:id/~^(?P<action>edit|view)$")]);
        let (_, params) = matched(&root, "GET", "/users/7/edit").unwrap();
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("id", "7"), ("action", "edit")]
        );
    }

    #[test]
    fn test_first_structural_regex_match_wins() {
        let root = tree(&[
            ("POST", r"/re/~^a.*$"),
            ("GET", r"/re/~^ab.*$"),
        ]);
        let found = root.search("GET", "re/abc").unwrap();
        assert!(found.handler.is_none());
        assert_eq!(found.node.full_path.as_deref(), Some(r"/re/~^a.*$"));
    }

    #[test]
    fn test_fallback_reports_static_node_without_handler() {
        let root = tree(&[("GET", "/apple/potato"), ("DELETE", "/apple/:seed")]);
        let found = root.search("PATCH", "apple/potato").unwrap();
        assert!(found.handler.is_none());
        assert_eq!(found.node.full_path.as_deref(), Some("/apple/potato"));
    }

    #[test]
    fn test_catch_all_with_handler_beats_fallback() {
        let root = tree(&[
            ("GET", "/apple/banana/cat"),
            ("DELETE", "/apple/:seed"),
            ("OPTIONS", "/apple/*path"),
        ]);
        let (route, params) = matched(&root, "OPTIONS", "/apple/banana/cat").unwrap();
        assert_eq!(route, "/apple/*path");
        assert_eq!(params.get("path"), Some("banana/cat"));
    }

    #[test]
    fn test_no_node_at_all() {
        let root = tree(&[("GET", "/a")]);
        assert!(root.search("GET", "b").is_none());
        assert!(root.search("GET", "a/b").is_none());
    }
}
