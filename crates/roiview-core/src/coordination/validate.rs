use std::collections::HashSet;

use super::layout::{Panel, META_BY_KEY, META_KEY};
use super::space::CoordinationSpace;
use crate::error::{Result, RoiviewError};

/// Check that a layout and its coordination space agree.
///
/// - every scope a panel references exists in the matching coordination type
///   (or, for the meta keys, names an existing meta-scope);
/// - every meta-scope list names existing scopes, each at most once;
/// - every meta-scope binding points at existing parent and child scopes.
///
/// Returns the first violation found.
pub fn validate_scopes(space: &CoordinationSpace, layout: &[Panel]) -> Result<()> {
    for panel in layout {
        for (type_name, scope_ref) in &panel.coordination_scopes {
            for scope in scope_ref.as_slice() {
                let exists = match type_name.as_str() {
                    META_KEY => space.meta_scopes().contains_key(scope),
                    META_BY_KEY => space.meta_scopes_by().contains_key(scope),
                    _ => space.has_scope(type_name, scope),
                };
                if !exists {
                    return Err(mismatch(type_name, scope));
                }
            }
        }
    }

    for by_type in space.meta_scopes().values() {
        for (type_name, scopes) in by_type {
            let mut seen = HashSet::new();
            for scope in scopes {
                if !seen.insert(scope.as_str()) {
                    return Err(RoiviewError::DuplicateScope {
                        coordination_type: type_name.clone(),
                        scope: scope.clone(),
                    });
                }
                if !space.has_scope(type_name, scope) {
                    return Err(mismatch(type_name, scope));
                }
            }
        }
    }

    for by_parent in space.meta_scopes_by().values() {
        for (parent_type, by_child) in by_parent {
            for (child_type, bindings) in by_child {
                for (parent_scope, target) in bindings {
                    if !space.has_scope(parent_type, parent_scope) {
                        return Err(mismatch(parent_type, parent_scope));
                    }
                    for scope in target.as_slice() {
                        if !space.has_scope(child_type, scope) {
                            return Err(mismatch(child_type, scope));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn mismatch(type_name: &str, scope: &str) -> RoiviewError {
    RoiviewError::ScopeMismatch {
        coordination_type: type_name.to_string(),
        scope: scope.to_string(),
    }
}
