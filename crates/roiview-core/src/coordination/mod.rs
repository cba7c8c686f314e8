//! Coordination space: the configuration graph the rendering engine reads to
//! keep its views in sync, plus the layout panels that reference it.

mod layout;
mod space;
mod types;
mod validate;

pub use layout::{build_layout, Layout, Panel, META_BY_KEY, META_KEY};
pub use space::{CoordinationSpace, MetaScopes, MetaScopesBy, ScopeRef, ScopeValues};
pub use types::CoordinationType;
pub use validate::validate_scopes;
