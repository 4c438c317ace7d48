//! Contract checks for resource implementations
//!
//! The diff engine trusts [`Resource::same_identity`] to be an equivalence
//! relation. Concrete kinds call [`check_identity_laws`] from their tests
//! with a handful of representative values.

use crate::error::IdentityViolation;
use crate::resource::{Resource, matches};

/// Verify reflexivity, symmetry and transitivity over `samples`
///
/// Only pairs with the same type tag are compared, mirroring the diff
/// engine's precondition.
pub fn check_identity_laws<R: Resource>(samples: &[R]) -> Result<(), IdentityViolation> {
    for a in samples {
        if !a.same_identity(a) {
            return Err(IdentityViolation::NotReflexive {
                resource: a.describe(),
            });
        }
    }

    for a in samples {
        for b in samples {
            if a.resource_type() != b.resource_type() {
                continue;
            }
            if a.same_identity(b) != b.same_identity(a) {
                let (left, right) = if a.same_identity(b) { (a, b) } else { (b, a) };
                return Err(IdentityViolation::NotSymmetric {
                    left: left.describe(),
                    right: right.describe(),
                });
            }
        }
    }

    for a in samples {
        for b in samples.iter().filter(|b| matches(a, *b)) {
            for c in samples.iter().filter(|c| matches(b, *c)) {
                if !matches(a, c) {
                    return Err(IdentityViolation::NotTransitive {
                        first: a.describe(),
                        second: b.describe(),
                        third: c.describe(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ApplyContext;
    use anyhow::Result;

    /// Identity rules chosen per test to break one law at a time
    #[derive(Debug, Clone, Copy)]
    enum Rule {
        Name,
        Never,
        LeftPrefix,
        CloseNumbers,
    }

    #[derive(Debug)]
    struct Probe {
        name: &'static str,
        rule: Rule,
    }

    impl Resource for Probe {
        fn resource_type(&self) -> &'static str {
            "probe"
        }

        fn describe(&self) -> String {
            format!("probe:{}", self.name)
        }

        fn same_identity(&self, other: &Self) -> bool {
            match self.rule {
                Rule::Name => self.name == other.name,
                Rule::Never => false,
                Rule::LeftPrefix => other.name.starts_with(self.name),
                Rule::CloseNumbers => {
                    let a: i32 = self.name.parse().unwrap_or_default();
                    let b: i32 = other.name.parse().unwrap_or_default();
                    (a - b).abs() <= 1
                }
            }
        }

        fn create(&self, _ctx: &ApplyContext) -> Result<()> {
            Ok(())
        }

        fn delete(&self, _ctx: &ApplyContext) -> Result<()> {
            Ok(())
        }
    }

    fn probes(rule: Rule, names: &[&'static str]) -> Vec<Probe> {
        names.iter().map(|&name| Probe { name, rule }).collect()
    }

    #[test]
    fn test_name_identity_passes() {
        let samples = probes(Rule::Name, &["a", "b", "a", "c"]);
        assert_eq!(check_identity_laws(&samples), Ok(()));
    }

    #[test]
    fn test_empty_samples_pass() {
        assert_eq!(check_identity_laws::<Probe>(&[]), Ok(()));
    }

    #[test]
    fn test_detects_non_reflexive() {
        let samples = probes(Rule::Never, &["a"]);
        assert_eq!(
            check_identity_laws(&samples),
            Err(IdentityViolation::NotReflexive {
                resource: "probe:a".into()
            })
        );
    }

    #[test]
    fn test_detects_non_symmetric() {
        let samples = probes(Rule::LeftPrefix, &["web", "web-old"]);
        assert_eq!(
            check_identity_laws(&samples),
            Err(IdentityViolation::NotSymmetric {
                left: "probe:web".into(),
                right: "probe:web-old".into(),
            })
        );
    }

    #[test]
    fn test_detects_non_transitive() {
        let samples = probes(Rule::CloseNumbers, &["1", "2", "3"]);
        assert!(matches!(
            check_identity_laws(&samples),
            Err(IdentityViolation::NotTransitive { .. })
        ));
    }
}
