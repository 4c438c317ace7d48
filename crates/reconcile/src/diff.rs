//! Diff computation between current and target resource lists
//!
//! Both directions are a pairwise scan over the two lists. Resource counts
//! are configuration-sized, so no hashing or indexing is involved.

use crate::resource::{Resource, matches};

/// Creation and removal sets for one reconciliation run
#[derive(Debug)]
pub struct Changes<'a, R> {
    /// Target resources with no match in the current state, in target order
    pub creations: Vec<&'a R>,
    /// Current resources with no match in the target, in current order
    pub removals: Vec<&'a R>,
}

impl<R> Changes<'_, R> {
    /// Total number of changes
    pub fn len(&self) -> usize {
        self.creations.len() + self.removals.len()
    }

    /// Check if there are any changes
    pub fn is_empty(&self) -> bool {
        self.creations.is_empty() && self.removals.is_empty()
    }
}

impl<R> Clone for Changes<'_, R> {
    fn clone(&self) -> Self {
        Self {
            creations: self.creations.clone(),
            removals: self.removals.clone(),
        }
    }
}

/// Resources in `target` that nothing in `current` matches
pub fn creations<'a, R: Resource>(current: &[R], target: &'a [R]) -> Vec<&'a R> {
    target
        .iter()
        .filter(|t| !current.iter().any(|c| matches(c, t)))
        .collect()
}

/// Resources in `current` that nothing in `target` matches
pub fn removals<'a, R: Resource>(current: &'a [R], target: &[R]) -> Vec<&'a R> {
    current
        .iter()
        .filter(|c| !target.iter().any(|t| matches(*c, t)))
        .collect()
}

/// Compute both change sets at once
pub fn diff<'a, R: Resource>(current: &'a [R], target: &'a [R]) -> Changes<'a, R> {
    Changes {
        creations: creations(current, target),
        removals: removals(current, target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ApplyContext;
    use anyhow::Result;

    #[derive(Debug, Clone)]
    struct Named {
        kind: &'static str,
        name: &'static str,
        // State, not identity
        revision: u32,
    }

    fn res(name: &'static str) -> Named {
        Named {
            kind: "test",
            name,
            revision: 0,
        }
    }

    impl Resource for Named {
        fn resource_type(&self) -> &'static str {
            self.kind
        }

        fn describe(&self) -> String {
            format!("{}:{}", self.kind, self.name)
        }

        fn same_identity(&self, other: &Self) -> bool {
            self.name == other.name
        }

        fn create(&self, _ctx: &ApplyContext) -> Result<()> {
            Ok(())
        }

        fn delete(&self, _ctx: &ApplyContext) -> Result<()> {
            Ok(())
        }
    }

    fn names(resources: &[&Named]) -> Vec<&'static str> {
        resources.iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_empty_current_creates_everything() {
        let target = vec![res("a"), res("b")];
        let changes = diff(&[], &target);
        assert_eq!(names(&changes.creations), ["a", "b"]);
        assert!(changes.removals.is_empty());
    }

    #[test]
    fn test_empty_target_removes_everything() {
        let current = vec![res("a"), res("b")];
        let changes = diff(&current, &[]);
        assert!(changes.creations.is_empty());
        assert_eq!(names(&changes.removals), ["a", "b"]);
    }

    #[test]
    fn test_overlap_keeps_matched() {
        let current = vec![res("a"), res("b")];
        let target = vec![res("b"), res("c")];
        let changes = diff(&current, &target);
        assert_eq!(names(&changes.creations), ["c"]);
        assert_eq!(names(&changes.removals), ["a"]);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_same_list_is_idempotent() {
        let list = vec![res("a"), res("b"), res("c")];
        let changes = diff(&list, &list);
        assert!(changes.is_empty());
        assert!(creations(&list, &list).is_empty());
        assert!(removals(&list, &list).is_empty());
    }

    #[test]
    fn test_both_empty() {
        let changes = diff::<Named>(&[], &[]);
        assert!(changes.is_empty());
        assert_eq!(changes.len(), 0);
    }

    #[test]
    fn test_state_difference_is_not_a_change() {
        let current = vec![res("a")];
        let mut updated = res("a");
        updated.revision = 7;
        let target = vec![updated];
        assert!(diff(&current, &target).is_empty());
    }

    #[test]
    fn test_different_types_never_match() {
        let current = vec![Named {
            kind: "daemon",
            name: "web",
            revision: 0,
        }];
        let target = vec![Named {
            kind: "flatpak",
            name: "web",
            revision: 0,
        }];
        let changes = diff(&current, &target);
        assert_eq!(changes.creations[0].kind, "flatpak");
        assert_eq!(changes.removals[0].kind, "daemon");
    }

    #[test]
    fn test_order_follows_source_lists() {
        let current = vec![res("z"), res("keep"), res("m"), res("a")];
        let target = vec![res("y"), res("keep"), res("b"), res("x")];
        let changes = diff(&current, &target);
        assert_eq!(names(&changes.creations), ["y", "b", "x"]);
        assert_eq!(names(&changes.removals), ["z", "m", "a"]);
    }

    #[test]
    fn test_duplicates_in_target_are_each_created() {
        let target = vec![res("a"), res("a")];
        assert_eq!(names(&creations(&[], &target)), ["a", "a"]);
    }

    #[test]
    fn test_partitions_target_and_current() {
        let current = vec![res("a"), res("b"), res("c"), res("d")];
        let target = vec![res("c"), res("d"), res("e"), res("f"), res("a")];
        let changes = diff(&current, &target);

        // Every target member is either matched in current or created, never both
        for t in &target {
            let matched = current.iter().any(|c| c.same_identity(t));
            let created = changes.creations.iter().any(|c| std::ptr::eq(*c, t));
            assert!(matched ^ created, "{} must be matched xor created", t.name);
        }

        // Every current member is either matched in target or removed, never both
        for c in &current {
            let matched = target.iter().any(|t| c.same_identity(t));
            let removed = changes.removals.iter().any(|r| std::ptr::eq(*r, c));
            assert!(matched ^ removed, "{} must be matched xor removed", c.name);
        }
    }

    /// Identity that only holds from the current side: `app` owns `app-v2`
    #[derive(Debug)]
    struct Prefixed(&'static str);

    impl Resource for Prefixed {
        fn resource_type(&self) -> &'static str {
            "test"
        }

        fn describe(&self) -> String {
            format!("test:{}", self.0)
        }

        fn same_identity(&self, other: &Self) -> bool {
            other.0.starts_with(self.0)
        }

        fn create(&self, _ctx: &ApplyContext) -> Result<()> {
            Ok(())
        }

        fn delete(&self, _ctx: &ApplyContext) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_one_directional_identity_asks_current_side() {
        let current = vec![Prefixed("app"), Prefixed("db")];
        let target = vec![Prefixed("app-v2"), Prefixed("d")];
        let changes = diff(&current, &target);

        // `d` would match `db` if the target side were asked
        let created: Vec<_> = changes.creations.iter().map(|r| r.0).collect();
        let removed: Vec<_> = changes.removals.iter().map(|r| r.0).collect();
        assert_eq!(created, ["d"]);
        assert_eq!(removed, ["db"]);

        for t in &target {
            let matched = current.iter().any(|c| c.same_identity(t));
            let created = changes.creations.iter().any(|c| std::ptr::eq(*c, t));
            assert!(matched ^ created, "{} must be matched xor created", t.0);
        }
        for c in &current {
            let matched = target.iter().any(|t| c.same_identity(t));
            let removed = changes.removals.iter().any(|r| std::ptr::eq(*r, c));
            assert!(matched ^ removed, "{} must be matched xor removed", c.0);
        }
    }
}
