//! The resource matcher (C4) — the heart of the core.
//!
//! A trie keyed on path components, with at most one literal child per
//! segment string plus a single dedicated variable child. Matching forks
//! a candidate state into the variable child at every segment *before*
//! attempting the literal child transition, so multiple templates can
//! stay alive simultaneously; the winner is chosen afterwards by a strict
//! total order rather than during the walk itself.

use crate::error::{Result, WaypostError};
use crate::path::decompose_path;
use crate::resource::Resource;
use fnv::FnvHashMap;
use std::sync::Arc;

fn is_variable(segment: &str) -> bool {
    segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}')
}

#[derive(Default)]
struct Node {
    literal_children: FnvHashMap<String, Node>,
    variable_child: Option<Box<Node>>,
    resource: Option<Arc<Resource>>,
}

impl Node {
    fn new() -> Self {
        Self::default()
    }
}

/// The outcome of a successful [`ResourceMatcher::matches`] call: the
/// resolved resource and the ordered string captures for its variable
/// segments, in template order.
pub struct Match {
    pub resource: Arc<Resource>,
    pub captures: Vec<String>,
}

/// A live branch of the multi-candidate search.
#[derive(Clone)]
struct SearchState<'a> {
    node: &'a Node,
    captures: Vec<String>,
    tentative: Option<Arc<Resource>>,
    literals: String,
}

/// Sort key implementing the tie-break total order: more captures wins,
/// then more literal bytes, then lexicographically greater literals.
/// Built explicitly as a tuple (rather than a hand-rolled comparator) so
/// the ordering is provably total — unlike the source's `compare`
/// predicate, which returned `true` from two independent branches and
/// did not satisfy strict weak ordering.
fn tie_break_key(state: &SearchState) -> (usize, usize, String) {
    (state.captures.len(), state.literals.len(), state.literals.clone())
}

/// Trie of registered path templates plus the multi-candidate search over
/// it. Resources are stored by shared reference; the matcher does not own
/// them, mirroring the source's non-owning pointers.
#[derive(Default)]
pub struct ResourceMatcher {
    root: Node,
}

impl ResourceMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `resource` under its own `template`. Fails with
    /// [`WaypostError::TemplateCollision`] if an identically-shaped
    /// template (literal bytes and variable positions, ignoring variable
    /// names) was already registered — the matcher is left unchanged.
    pub fn register(&mut self, resource: Arc<Resource>) -> Result<()> {
        let segments: Vec<String> =
            decompose_path(&resource.template).into_iter().map(str::to_string).collect();

        let mut node = &mut self.root;
        for segment in &segments {
            node = if is_variable(segment) {
                node.variable_child.get_or_insert_with(|| Box::new(Node::new()))
            } else {
                node.literal_children.entry(segment.clone()).or_insert_with(Node::new)
            };
        }

        if node.resource.is_some() {
            return Err(WaypostError::TemplateCollision(resource.template.clone()));
        }
        node.resource = Some(resource);
        Ok(())
    }

    /// Resolves `path` to a single best-matching resource, if any.
    ///
    /// Read-only: safe to call concurrently from multiple threads once
    /// registration has finished.
    pub fn matches(&self, path: &str) -> Option<Match> {
        let segments = decompose_path(path);

        let initial = SearchState {
            node: &self.root,
            captures: Vec::new(),
            tentative: self.root.resource.clone(),
            literals: String::new(),
        };
        let mut states = vec![initial];

        for segment in &segments {
            let mut next = Vec::with_capacity(states.len() + 1);
            for mut state in states {
                if let Some(var_child) = state.node.variable_child.as_deref() {
                    let mut forked = SearchState {
                        node: var_child,
                        captures: state.captures.clone(),
                        tentative: state.tentative.clone(),
                        literals: state.literals.clone(),
                    };
                    forked.captures.push((*segment).to_string());
                    forked.literals.push('.');
                    if let Some(resource) = &forked.node.resource {
                        forked.tentative = Some(resource.clone());
                    }
                    next.push(forked);
                }

                if let Some(child) = state.node.literal_children.get(*segment) {
                    state.node = child;
                    state.literals.push_str(segment);
                    if let Some(resource) = &state.node.resource {
                        state.tentative = Some(resource.clone());
                    }
                    next.push(state);
                }
                // else: no literal child for this segment, state drops (terminated).
            }
            states = next;
        }

        states
            .into_iter()
            .filter(|s| s.tentative.is_some())
            .max_by(|a, b| tie_break_key(a).cmp(&tie_break_key(b)))
            .map(|s| Match { resource: s.tentative.unwrap(), captures: s.captures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceBuilder;

    fn resource(template: &str) -> Arc<Resource> {
        Arc::new(ResourceBuilder::new(template).build())
    }

    #[test]
    fn literal_only_matching_and_404() {
        let mut m = ResourceMatcher::new();
        m.register(resource("/")).unwrap();
        m.register(resource("/about")).unwrap();

        assert!(m.matches("/").is_some());
        assert!(m.matches("/about").is_some());
        assert!(m.matches("/missing").is_none());
    }

    #[test]
    fn single_variable_matching() {
        let mut m = ResourceMatcher::new();
        m.register(resource("/users/{id}")).unwrap();

        let found = m.matches("/users/42").unwrap();
        assert_eq!(found.captures, vec!["42"]);
    }

    #[test]
    fn colliding_templates_rejected_and_state_unchanged() {
        let mut m = ResourceMatcher::new();
        m.register(resource("/a/{x}")).unwrap();
        let err = m.register(resource("/a/{y}"));
        assert!(matches!(err, Err(WaypostError::TemplateCollision(_))));

        // Matcher state is unchanged: original template still resolves.
        assert!(m.matches("/a/anything").is_some());
    }

    #[test]
    fn more_captures_wins_specificity() {
        let mut m = ResourceMatcher::new();
        let org_user = resource("/orgs/{org}/user/{id}");
        let all_user = resource("/orgs/all/user/{id}");
        m.register(org_user.clone()).unwrap();
        m.register(all_user.clone()).unwrap();

        let found = m.matches("/orgs/all/user/7").unwrap();
        assert!(Arc::ptr_eq(&found.resource, &org_user));
        assert_eq!(found.captures, vec!["all", "7"]);
    }

    #[test]
    fn literal_tie_break_prefers_more_literal_bytes() {
        let mut m = ResourceMatcher::new();
        let short_first = resource("/foo/{p1}/short/{p2}");
        let longer_first = resource("/foo/longer/{p1}/{p2}");
        m.register(short_first.clone()).unwrap();
        m.register(longer_first.clone()).unwrap();

        let found = m.matches("/foo/longer/short/bar").unwrap();
        assert!(Arc::ptr_eq(&found.resource, &longer_first));

        let found = m.matches("/foo/baz/short/bar").unwrap();
        assert!(Arc::ptr_eq(&found.resource, &short_first));
    }

    #[test]
    fn match_is_deterministic_across_registration_order() {
        let mut a = ResourceMatcher::new();
        let r1 = resource("/foo/{p1}/short/{p2}");
        let r2 = resource("/foo/longer/{p1}/{p2}");
        a.register(r1.clone()).unwrap();
        a.register(r2.clone()).unwrap();

        let mut b = ResourceMatcher::new();
        b.register(r2.clone()).unwrap();
        b.register(r1.clone()).unwrap();

        let found_a = a.matches("/foo/longer/short/bar").unwrap();
        let found_b = b.matches("/foo/longer/short/bar").unwrap();
        assert!(Arc::ptr_eq(&found_a.resource, &found_b.resource));
    }

    #[test]
    fn interior_empty_segments_are_distinct_literals() {
        let mut m = ResourceMatcher::new();
        m.register(resource("/a")).unwrap();
        assert!(m.matches("//a").is_none());
    }
}
