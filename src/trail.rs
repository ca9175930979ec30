//! Context trail for diagnostics.
//!
//! The trail is a borrowed linked list that grows as the dispatcher descends:
//! each level holds its own frame and points at the nearest ancestor that
//! holds one, so nothing needs popping when a check short-circuits and
//! collapsed levels cost nothing to skip.

use std::borrow::Cow;

use crate::config::CheckOptions;
use crate::violation::Violation;

/// Type names entered so far, most recent first.
#[derive(Debug, Clone)]
pub struct Trail<'a> {
    /// `None` for the root and for collapsed repeats.
    frame: Option<Cow<'static, str>>,
    /// Nearest enclosing level with a frame.
    parent: Option<&'a Trail<'a>>,
    options: &'a CheckOptions,
}

impl<'a> Trail<'a> {
    /// An empty trail.
    pub fn root(options: &'a CheckOptions) -> Self {
        Self {
            frame: None,
            parent: None,
            options,
        }
    }

    /// Enter a value of type `name`.
    ///
    /// With `collapse_repeats` on, a name equal to the current head is not
    /// pushed again.
    pub fn enter(&self, name: impl Into<Cow<'static, str>>) -> Trail<'_> {
        let name = name.into();
        let frame = if self.options.collapse_repeats && self.head() == Some(name.as_ref()) {
            None
        } else {
            Some(name)
        };
        let parent = if self.frame.is_some() {
            Some(self)
        } else {
            self.parent
        };
        Trail {
            frame,
            parent,
            options: self.options,
        }
    }

    /// Most recently pushed frame.
    pub fn head(&self) -> Option<&str> {
        match &self.frame {
            Some(frame) => Some(frame),
            None => self.parent.and_then(|parent| parent.frame.as_deref()),
        }
    }

    fn framed<'s>(&'s self) -> impl Iterator<Item = &'s str> + 's {
        let own = self.frame.as_deref();
        let mut node: Option<&'s Trail<'s>> = self.parent;
        own.into_iter().chain(std::iter::from_fn(move || {
            let current = node?;
            node = current.parent;
            current.frame.as_deref()
        }))
    }

    /// Frames, most recent first.
    pub fn frames(&self) -> Vec<String> {
        self.framed().map(str::to_string).collect()
    }

    pub fn depth(&self) -> usize {
        self.framed().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head().is_none()
    }

    pub fn options(&self) -> &'a CheckOptions {
        self.options
    }

    /// Violation for a deferred cell of type `name` found at this point.
    pub fn violation(&self, name: impl Into<Cow<'static, str>>) -> Violation {
        Violation::new(self.enter(name).frames())
    }
}
