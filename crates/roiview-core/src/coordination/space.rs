use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::CoordinationType;

/// Scope identifier -> value, for one coordination type.
pub type ScopeValues = BTreeMap<String, Value>;

/// Meta-scope name -> coordination type -> ordered, de-duplicated scope list.
pub type MetaScopes = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Meta-scope name -> parent type -> child type -> parent scope -> child scope(s).
pub type MetaScopesBy =
    BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<String, ScopeRef>>>>;

/// A reference to one scope or an ordered list of scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeRef {
    One(String),
    Many(Vec<String>),
}

impl ScopeRef {
    pub fn one(scope: impl Into<String>) -> Self {
        Self::One(scope.into())
    }

    pub fn many<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(scopes.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(scope) => std::slice::from_ref(scope),
            Self::Many(scopes) => scopes,
        }
    }
}

/// Coordination-type name -> per-scope values, plus the meta-scope groupings.
///
/// Keys are kept in `BTreeMap`s so serialization is deterministic; meta-scope
/// lists keep insertion order and never hold the same scope twice.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinationSpace {
    #[serde(flatten)]
    entries: BTreeMap<String, ScopeValues>,
    #[serde(rename = "metaCoordinationScopes", default)]
    meta_scopes: MetaScopes,
    #[serde(rename = "metaCoordinationScopesBy", default)]
    meta_scopes_by: MetaScopesBy,
}

impl CoordinationSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `ctype` has a (possibly empty) mapping.
    pub fn declare(&mut self, ctype: CoordinationType) {
        self.entries.entry(ctype.as_str().to_string()).or_default();
    }

    pub fn set(&mut self, ctype: CoordinationType, scope: impl Into<String>, value: impl Into<Value>) {
        self.entries
            .entry(ctype.as_str().to_string())
            .or_default()
            .insert(scope.into(), value.into());
    }

    pub fn get(&self, ctype: CoordinationType, scope: &str) -> Option<&Value> {
        self.values(ctype.as_str())?.get(scope)
    }

    pub fn get_f64(&self, ctype: CoordinationType, scope: &str) -> Option<f64> {
        self.get(ctype, scope).and_then(Value::as_f64)
    }

    /// Values of a coordination type, addressed by its wire name.
    pub fn values(&self, type_name: &str) -> Option<&ScopeValues> {
        self.entries.get(type_name)
    }

    /// Scope identifiers of `ctype`, in key order.
    pub fn scopes(&self, ctype: CoordinationType) -> Vec<String> {
        self.values(ctype.as_str())
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_scope(&self, type_name: &str, scope: &str) -> bool {
        self.values(type_name)
            .is_some_and(|values| values.contains_key(scope))
    }

    pub fn entries(&self) -> &BTreeMap<String, ScopeValues> {
        &self.entries
    }

    /// Make sure the meta-scope list for `ctype` exists, even if empty.
    pub fn declare_meta(&mut self, meta: &str, ctype: CoordinationType) {
        self.meta_scopes
            .entry(meta.to_string())
            .or_default()
            .entry(ctype.as_str().to_string())
            .or_default();
    }

    /// Append `scope` to a meta-scope list unless it is already present.
    /// Returns `true` if the list changed.
    pub fn append_meta(&mut self, meta: &str, ctype: CoordinationType, scope: &str) -> bool {
        let list = self
            .meta_scopes
            .entry(meta.to_string())
            .or_default()
            .entry(ctype.as_str().to_string())
            .or_default();
        if list.iter().any(|s| s == scope) {
            return false;
        }
        list.push(scope.to_string());
        true
    }

    pub fn meta_scope(&self, meta: &str, ctype: CoordinationType) -> &[String] {
        self.meta_scopes
            .get(meta)
            .and_then(|by_type| by_type.get(ctype.as_str()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn meta_scopes(&self) -> &MetaScopes {
        &self.meta_scopes
    }

    /// Bind `parent_scope` of `parent` to scope(s) of `child` under `meta`.
    pub fn bind_meta(
        &mut self,
        meta: &str,
        parent: CoordinationType,
        child: CoordinationType,
        parent_scope: &str,
        target: ScopeRef,
    ) {
        self.meta_scopes_by
            .entry(meta.to_string())
            .or_default()
            .entry(parent.as_str().to_string())
            .or_default()
            .entry(child.as_str().to_string())
            .or_default()
            .insert(parent_scope.to_string(), target);
    }

    /// Make sure the binding table for `parent -> child` exists, even if empty.
    pub fn declare_binding(&mut self, meta: &str, parent: CoordinationType, child: CoordinationType) {
        self.meta_scopes_by
            .entry(meta.to_string())
            .or_default()
            .entry(parent.as_str().to_string())
            .or_default()
            .entry(child.as_str().to_string())
            .or_default();
    }

    pub fn meta_scopes_by(&self) -> &MetaScopesBy {
        &self.meta_scopes_by
    }
}
