//! Activity name matching
//!
//! Given a resource path and an action path, [`candidates`] enumerates the
//! registry names that could govern the request, from most to least
//! specific. For `orders/123` and `update/price` the sequence is:
//!
//! ```text
//! orders/123.update/price
//! orders/123.update
//! orders/123
//! orders.update/price
//! orders.update
//! orders
//! .update/price
//! .update
//! ```
//!
//! Each resource level restarts the action walk from the full action, so
//! narrowing the action is always preferred over broadening the resource.
//! At the root level the resource is empty and no bare-resource name is
//! produced.
//!
//! ```
//! use activity_authz::matcher::candidates;
//!
//! let names: Vec<String> = candidates("orders", "read").collect();
//! assert_eq!(names, vec!["orders.read", "orders", ".read"]);
//! ```

use std::iter::FusedIterator;

/// Registry name for a resource/action pair
///
/// `resource.action`, or just `resource` when the action is empty.
pub fn activity_name(resource: &str, action: &str) -> String {
    if action.is_empty() {
        resource.to_string()
    } else {
        format!("{}.{}", resource, action)
    }
}

/// Candidate activity names for a request, most specific first
pub fn candidates<'a>(resource: &'a str, action: &'a str) -> ActivityNames<'a> {
    ActivityNames::new(resource, action)
}

/// Lazy cursor over candidate activity names
///
/// Cloning the cursor snapshots its position, so a sequence can be replayed
/// from any point. The empty name is never yielded.
#[derive(Debug, Clone)]
pub struct ActivityNames<'a> {
    /// Resource at the current hierarchy level
    resource: &'a str,
    /// Full action, restored at every resource level
    action: &'a str,
    state: WalkState<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState<'a> {
    /// Emit the combined name for the current resource level
    Combined,
    /// Walking back the action; holds the action emitted last
    Action(&'a str),
    /// Move to the parent resource
    Parent,
    Done,
}

impl<'a> ActivityNames<'a> {
    fn new(resource: &'a str, action: &'a str) -> Self {
        Self {
            resource,
            action,
            state: WalkState::Combined,
        }
    }
}

impl Iterator for ActivityNames<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            match self.state {
                WalkState::Combined => {
                    if self.resource.is_empty() && self.action.is_empty() {
                        self.state = WalkState::Done;
                        return None;
                    }

                    self.state = WalkState::Action(self.action);
                    return Some(activity_name(self.resource, self.action));
                }
                WalkState::Action(action) => {
                    if action.is_empty() {
                        self.state = WalkState::Parent;
                        continue;
                    }

                    match action.rfind('/') {
                        None => {
                            // Bare resource ends this level's action walk
                            self.state = WalkState::Parent;
                            if !self.resource.is_empty() {
                                return Some(self.resource.to_string());
                            }
                        }
                        Some(pos) => {
                            let parent = &action[..pos];
                            self.state = WalkState::Action(parent);
                            let name = activity_name(self.resource, parent);
                            if !name.is_empty() {
                                return Some(name);
                            }
                        }
                    }
                }
                WalkState::Parent => {
                    if self.resource.is_empty() {
                        self.state = WalkState::Done;
                        return None;
                    }

                    self.resource = match self.resource.rfind('/') {
                        Some(pos) => &self.resource[..pos],
                        None => "",
                    };
                    self.state = WalkState::Combined;
                }
                WalkState::Done => return None,
            }
        }
    }
}

impl FusedIterator for ActivityNames<'_> {}
