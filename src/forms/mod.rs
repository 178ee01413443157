//! Form domain layer
//!
//! Fields bound to a value, proxies that forward to another field by path,
//! and the form scope that owns them and resolves those paths.

mod field;
mod form_state;
mod proxy_field;
mod resolve;
mod value_field;

pub use field::{parse_number, Field, FieldConfig, FieldHandle, FieldKind, Format, Value};
pub use form_state::{FieldDefinition, Form, FormDefinition};
pub use proxy_field::{ProxyField, SELF_TARGET};
pub use resolve::{Detached, Resolve};
pub use value_field::{FieldChange, ValueField, DEFAULT_PLACEHOLDER, GLOBAL_PLACEHOLDER_KEY};

#[cfg(test)]
pub use resolve::MockResolve;
