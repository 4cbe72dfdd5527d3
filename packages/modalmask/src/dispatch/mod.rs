//! Capability Dispatch
//!
//! Routes a [`Modality`] to the first matching handler of an ordered rule
//! table. Evaluation order is fixed regardless of insertion interleaving:
//!
//! 1. `Exact` rules (tag equals the rule's tag), in insertion order
//! 2. `Covers` rules (tag is a superset of the rule's union), in insertion order
//! 3. the fallback, if one is set
//!
//! ```rust
//! use modalmask::{Dispatcher, Modality};
//!
//! let dispatcher = Dispatcher::new()
//!     .exact(Modality::INVALID, |_| "invalid")
//!     .covers(Modality::IMAGE | Modality::TEXT, |_| "vision-language")
//!     .exact(Modality::IMAGE, |_| "image only")
//!     .fallback(|_| "other");
//!
//! assert_eq!(dispatcher.dispatch(Modality::IMAGE), Some("image only"));
//! assert_eq!(dispatcher.dispatch(Modality::IMAGE | Modality::TEXT | Modality::AUDIO), Some("vision-language"));
//! assert_eq!(dispatcher.dispatch(Modality::AUDIO), Some("other"));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::modality::Modality;

type Handler<R> = Arc<dyn Fn(Modality) -> R + Send + Sync>;

/// Which rule of a [`Dispatcher`] matched
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Exact(Modality),
    Covers(Modality),
    Fallback,
}

/// Ordered (predicate, handler) table over modality tags
pub struct Dispatcher<R> {
    exact: Vec<(Modality, Handler<R>)>,
    covers: Vec<(Modality, Handler<R>)>,
    fallback: Option<Handler<R>>,
}

impl<R> Dispatcher<R> {
    pub fn new() -> Self {
        Self {
            exact: Vec::new(),
            covers: Vec::new(),
            fallback: None,
        }
    }

    /// Match when the tag equals `tag`
    pub fn exact<F>(mut self, tag: Modality, handler: F) -> Self
    where
        F: Fn(Modality) -> R + Send + Sync + 'static,
    {
        let handler: Handler<R> = Arc::new(handler);
        self.exact.push((tag, handler));
        self
    }

    /// Match when the tag equals any of `tags`, sharing one handler
    pub fn one_of<F>(mut self, tags: &[Modality], handler: F) -> Self
    where
        F: Fn(Modality) -> R + Send + Sync + 'static,
    {
        let handler: Handler<R> = Arc::new(handler);
        for &tag in tags {
            self.exact.push((tag, Arc::clone(&handler)));
        }
        self
    }

    /// Match when the tag carries every modality of `union`
    pub fn covers<F>(mut self, union: Modality, handler: F) -> Self
    where
        F: Fn(Modality) -> R + Send + Sync + 'static,
    {
        let handler: Handler<R> = Arc::new(handler);
        self.covers.push((union, handler));
        self
    }

    /// Handler for tags no other rule matches. Replaces any earlier fallback.
    pub fn fallback<F>(mut self, handler: F) -> Self
    where
        F: Fn(Modality) -> R + Send + Sync + 'static,
    {
        let handler: Handler<R> = Arc::new(handler);
        self.fallback = Some(handler);
        self
    }

    fn resolve(&self, tag: Modality) -> Option<(Rule, &Handler<R>)> {
        if let Some((rule_tag, handler)) = self.exact.iter().find(|(rule_tag, _)| *rule_tag == tag) {
            return Some((Rule::Exact(*rule_tag), handler));
        }
        if let Some((union, handler)) = self.covers.iter().find(|(union, _)| tag.contains(*union)) {
            return Some((Rule::Covers(*union), handler));
        }
        self.fallback.as_ref().map(|handler| (Rule::Fallback, handler))
    }

    /// Rule that would handle `tag`
    pub fn matched(&self, tag: Modality) -> Option<Rule> {
        self.resolve(tag).map(|(rule, _)| rule)
    }

    /// Run the first matching handler; `None` when nothing matches
    pub fn dispatch(&self, tag: Modality) -> Option<R> {
        self.resolve(tag).map(|(_, handler)| (**handler)(tag))
    }

    /// Number of rules, fallback included
    pub fn len(&self) -> usize {
        self.exact.len() + self.covers.len() + usize::from(self.fallback.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R> Default for Dispatcher<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("exact", &self.exact.iter().map(|(tag, _)| *tag).collect::<Vec<_>>())
            .field("covers", &self.covers.iter().map(|(tag, _)| *tag).collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
