//! Property-based tests for snapshot merging and template rendering.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::dependency::Dependency;
    use crate::snapshot::Snapshot;
    use crate::vcs::render;
    use proptest::prelude::*;

    fn deps_strategy() -> impl Strategy<Value = Vec<Dependency>> {
        prop::collection::vec(
            ("[a-e]", "v[0-2]").prop_map(|(package, r#ref)| {
                Dependency::new(package.clone(), r#ref, format!("https://x/{package}"))
            }),
            0..8,
        )
    }

    // ============================================================================
    // Snapshot::update property tests
    // ============================================================================

    proptest! {
        /// Property: after a successful update every record is indexed with its ref
        #[test]
        fn update_keeps_index_consistent(deps in deps_strategy()) {
            let mut snapshot = Snapshot::new("x.yaml");
            if snapshot.update("app", &deps).is_ok() {
                for dep in snapshot.dependencies() {
                    prop_assert!(snapshot.contains(dep));
                    prop_assert_eq!(&snapshot.get(&dep.package).unwrap().r#ref, &dep.r#ref);
                }
                for dep in &deps {
                    prop_assert!(snapshot.contains(dep));
                }
            }
        }

        /// Property: a failed update leaves the snapshot exactly as it was
        #[test]
        fn failed_update_changes_nothing(first in deps_strategy(), second in deps_strategy()) {
            let mut snapshot = Snapshot::new("x.yaml");
            prop_assume!(snapshot.update("app", &first).is_ok());
            let before = snapshot.dependencies().to_vec();
            let revision = snapshot.revision();

            if snapshot.update("app", &second).is_err() {
                prop_assert_eq!(snapshot.dependencies(), before.as_slice());
                prop_assert_eq!(snapshot.revision(), revision);
            } else {
                prop_assert_eq!(snapshot.revision(), revision + 1);
            }
        }

        /// Property: re-applying a contained set adds nothing but bumps the revision
        #[test]
        fn update_is_idempotent(deps in deps_strategy()) {
            let mut snapshot = Snapshot::new("x.yaml");
            prop_assume!(snapshot.update("app", &deps).is_ok());
            let before = snapshot.dependencies().to_vec();

            let added = snapshot.update("app", &deps).unwrap();
            prop_assert_eq!(added, 0);
            prop_assert_eq!(snapshot.dependencies(), before.as_slice());
            prop_assert_eq!(snapshot.revision(), 2);
        }

        /// Property: packages stay unique
        #[test]
        fn packages_are_unique(deps in deps_strategy()) {
            let mut snapshot = Snapshot::new("x.yaml");
            let _ = snapshot.update("app", &deps);
            let mut packages: Vec<&str> =
                snapshot.dependencies().iter().map(|d| d.package.as_str()).collect();
            let total = packages.len();
            packages.sort_unstable();
            packages.dedup();
            prop_assert_eq!(packages.len(), total);
        }
    }

    // ============================================================================
    // render property tests
    // ============================================================================

    proptest! {
        /// Property: the argument count depends only on the template
        #[test]
        fn render_never_splits_values(value in ".*") {
            let args = render("clone {repo} {dir}", &[("repo", value.as_str()), ("dir", value.as_str())]);
            prop_assert_eq!(args.len(), 3);
            prop_assert_eq!(&args[1], &value);
        }

        /// Property: templates without placeholders render to their words
        #[test]
        fn render_plain_template(words in prop::collection::vec("[a-z-]{1,8}", 1..6)) {
            let template = words.join("  ");
            let args = render(&template, &[("x", "y")]);
            prop_assert_eq!(args, words);
        }
    }
}
