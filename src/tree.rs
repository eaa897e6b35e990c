//! Incremental trie construction.
//!
//! [`Node::add_path`] consumes a pattern one token at a time:
//!
//! | Token        | Effect                                                        |
//! |--------------|---------------------------------------------------------------|
//! | `/`          | static child `/`                                              |
//! | `:name`      | descend into the shared wildcard child, record `name`         |
//! | `*name`      | catch-all leaf, must be last                                  |
//! | `~regex`     | regex leaf; the rest of the pattern is the regex source       |
//! | `\:` `\*` `\~` `\\` | literal text starting with the escaped character       |
//! | anything else | literal text up to the next `/`, merged into static children |
//!
//! Static children are split on their common prefix so that a node never has
//! two static children starting with the same character.

use crate::error::RouteError;
use crate::node::{Node, RouteKind};
use regex::Regex;

/// Name of the shared wildcard node; the real names live in `param_names`.
const WILDCARD_SEGMENT: &str = "wildcard";

impl<H> Node<H> {
    /// Insert `path` (a pattern with its leading `/` removed) below this node
    /// and return the node the pattern ends at.
    ///
    /// `pattern` is the full pattern, used only for error reporting.
    /// `in_static_token` is set while the rest of a literal token is being
    /// inserted after a prefix split, so a `:` or `*` inside it stays literal.
    pub(crate) fn add_path(
        &mut self,
        pattern: &str,
        path: &str,
        mut param_names: Vec<String>,
        in_static_token: bool,
    ) -> Result<&mut Node<H>, RouteError> {
        let Some(first) = path.chars().next() else {
            if !param_names.is_empty() {
                self.bind_param_names(pattern, param_names)?;
            }
            return Ok(self);
        };

        let next_slash = path.find('/');
        let token_end = if first == '/' {
            1
        } else {
            next_slash.unwrap_or(path.len())
        };
        let token = &path[..token_end];
        let remaining = &path[token_end..];

        if !in_static_token {
            match first {
                '*' => return self.add_catch_all(pattern, &token[1..], remaining, param_names),
                '~' => return self.add_regex(pattern, &path[1..], param_names),
                ':' => {
                    let name = &token[1..];
                    if name.is_empty() {
                        return Err(RouteError::EmptyParamName {
                            pattern: pattern.to_string(),
                        });
                    }
                    param_names.push(name.to_string());
                    let child = self.wildcard_child.get_or_insert_with(|| {
                        Box::new(Node::new(WILDCARD_SEGMENT, RouteKind::Wildcard))
                    });
                    return child.add_path(pattern, remaining, param_names, false);
                }
                _ => {}
            }
        }

        let mut token = token;
        let mut index_char = first;
        let mut unescaped = false;
        if !in_static_token && first == '\\' {
            if let Some(escaped @ ('*' | ':' | '~' | '\\')) = token[1..].chars().next() {
                index_char = escaped;
                token = &token[1..];
                unescaped = true;
            }
        }

        let in_static_token = index_char != '/';

        if let Some(index) = self.static_indices.iter().position(|&c| c == index_char) {
            let mut consumed = self.split_common_prefix(index, token);
            self.static_children[index].priority += 1;
            let index = self.sort_static_child(index);
            if unescaped {
                consumed += 1;
            }
            return self.static_children[index].add_path(
                pattern,
                &path[consumed..],
                param_names,
                in_static_token,
            );
        }

        self.static_indices.push(index_char);
        self.static_children.push(Node::new(token, RouteKind::Static));
        let index = self.static_children.len() - 1;
        self.static_children[index].add_path(pattern, remaining, param_names, in_static_token)
    }

    fn add_catch_all(
        &mut self,
        pattern: &str,
        name: &str,
        remaining: &str,
        mut param_names: Vec<String>,
    ) -> Result<&mut Node<H>, RouteError> {
        if !remaining.is_empty() {
            return Err(RouteError::CatchAllNotLast {
                pattern: pattern.to_string(),
            });
        }
        if name.is_empty() {
            return Err(RouteError::EmptyParamName {
                pattern: pattern.to_string(),
            });
        }
        if let Some(existing) = &self.catch_all_child {
            if existing.path != name {
                return Err(RouteError::ConflictingCatchAll {
                    pattern: pattern.to_string(),
                    existing: existing.path.clone(),
                    new: name.to_string(),
                });
            }
        }

        param_names.push(name.to_string());
        let child: &mut Node<H> = self
            .catch_all_child
            .get_or_insert_with(|| Box::new(Node::new(name, RouteKind::CatchAll)));
        child.bind_param_names(pattern, param_names)?;
        Ok(child)
    }

    fn add_regex(
        &mut self,
        pattern: &str,
        source: &str,
        mut param_names: Vec<String>,
    ) -> Result<&mut Node<H>, RouteError> {
        if let Some(index) = self.regex_children.iter().position(|c| c.path == source) {
            let child = &mut self.regex_children[index];
            if let Some(regex) = &child.regex {
                param_names.extend(regex_param_names(regex));
            }
            child.bind_param_names(pattern, param_names)?;
            return Ok(child);
        }

        let regex = Regex::new(source).map_err(|source| RouteError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        param_names.extend(regex_param_names(&regex));

        let mut child = Node::new(source, RouteKind::Regex);
        child.regex = Some(regex);
        child.param_names = Some(param_names);
        self.regex_children.push(child);
        let index = self.regex_children.len() - 1;
        Ok(&mut self.regex_children[index])
    }

    /// Make the static child at `index` end where `token` stops sharing a
    /// prefix with it, inserting an intermediate node when needed.
    ///
    /// Returns how many bytes of `token` the (possibly new) child consumes.
    fn split_common_prefix(&mut self, index: usize, token: &str) -> usize {
        let child = &mut self.static_children[index];
        if token.starts_with(child.path.as_str()) {
            return child.path.len();
        }

        let common: usize = child
            .path
            .chars()
            .zip(token.chars())
            .take_while(|(a, b)| a == b)
            .map(|(c, _)| c.len_utf8())
            .sum();

        let suffix = child.path.split_off(common);
        let mut intermediate = Node::new(std::mem::take(&mut child.path), RouteKind::Static);
        intermediate.priority = child.priority;
        child.path = suffix;

        let old = std::mem::replace(child, intermediate);
        if let Some(c) = old.path.chars().next() {
            child.static_indices.push(c);
        }
        child.static_children.push(old);
        common
    }
}

/// Named capture groups of `regex`, in declaration order.
pub(crate) fn regex_param_names(regex: &Regex) -> impl Iterator<Item = String> + '_ {
    regex.capture_names().flatten().map(str::to_string)
}
