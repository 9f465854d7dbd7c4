//! # Ordered, duplicate-free task collection.
//!
//! [`TaskSet`] keeps [`TaskRef`]s in insertion order, which is also the
//! execution order. Membership is by identity of the wrapped task instance
//! (its `Arc` allocation): adding the same handle twice is a no-op, and so is
//! adding a second spec built with [`TaskSpec::from_arc`](crate::TaskSpec::from_arc)
//! around an instance already in the set. Two distinct instances with equal
//! contents are both kept.
//!
//! ```text
//! tasks:  [A, B, C]          (Vec, iteration order)
//! index:  {&a, &b, &c}       (HashSet of task instance addresses)
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use crate::payload::Payload;
use crate::tasks::spec::TaskRef;

/// Ordered set of tasks executed by a [`Runner`](crate::Runner).
pub struct TaskSet<P: Payload> {
    tasks: Vec<TaskRef<P>>,
    index: HashSet<usize>,
}

impl<P: Payload> TaskSet<P> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Appends a task. Returns `false` if it was already present.
    pub fn add(&mut self, task: TaskRef<P>) -> bool {
        if !self.index.insert(key(&task)) {
            return false;
        }
        self.tasks.push(task);
        true
    }

    /// Appends several tasks, skipping ones already present.
    pub fn add_all(&mut self, tasks: impl IntoIterator<Item = TaskRef<P>>) -> &mut Self {
        for task in tasks {
            self.add(task);
        }
        self
    }

    /// Builder-style [`add`](TaskSet::add).
    #[must_use]
    pub fn with(mut self, task: TaskRef<P>) -> Self {
        self.add(task);
        self
    }

    /// Removes a task. Returns `false` if it was not present.
    pub fn remove(&mut self, task: &TaskRef<P>) -> bool {
        let k = key(task);
        if !self.index.remove(&k) {
            return false;
        }
        self.tasks.retain(|t| key(t) != k);
        true
    }

    /// True if this task instance is in the set.
    #[must_use]
    pub fn contains(&self, task: &TaskRef<P>) -> bool {
        self.index.contains(&key(task))
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TaskRef<P>> {
        self.tasks.iter()
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True if there are no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Resets every task's run state (see [`TaskSpec::reset`](crate::TaskSpec::reset)).
    pub fn reset(&self) {
        for task in &self.tasks {
            task.reset();
        }
    }
}

/// Address of the wrapped task instance, shared by every spec around it.
fn key<P: Payload>(spec: &TaskRef<P>) -> usize {
    Arc::as_ptr(spec.task()) as *const () as usize
}

impl<P: Payload> Default for TaskSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> FromIterator<TaskRef<P>> for TaskSet<P> {
    fn from_iter<I: IntoIterator<Item = TaskRef<P>>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add_all(iter);
        set
    }
}

impl<'a, P: Payload> IntoIterator for &'a TaskSet<P> {
    type Item = &'a TaskRef<P>;
    type IntoIter = std::slice::Iter<'a, TaskRef<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<P: Payload> std::fmt::Debug for TaskSet<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tasks.iter()).finish()
    }
}
