//! Field that forwards its value to another field

use std::rc::Rc;

use super::field::{Field, FieldConfig, FieldHandle, FieldKind, Value};
use super::resolve::Resolve;

/// Target path meaning "this field", i.e. no target
pub const SELF_TARGET: &str = "#";

/// A field without a value of its own that proxies another field.
///
/// The target is looked up on every call, so the proxy always reflects the
/// current state of the form.
#[derive(Debug, Clone)]
pub struct ProxyField {
    id: String,
    target: String,
}

impl ProxyField {
    pub fn new(id: &str, config: &FieldConfig) -> Self {
        let target = config
            .target
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(SELF_TARGET);
        Self {
            id: id.to_string(),
            target: target.to_string(),
        }
    }

    /// Create a proxy pointing at `target`
    pub fn linked(id: &str, target: &str) -> Self {
        Self::new(
            id,
            &FieldConfig {
                target: Some(target.to_string()),
                ..Default::default()
            },
        )
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Resolve the target one hop.
    ///
    /// Returns `None` if the path does not resolve or resolves to this field.
    pub fn resolve_target(&self, scope: &dyn Resolve) -> Option<FieldHandle> {
        let Some(field) = scope.resolve(&self.id, &self.target) else {
            tracing::trace!(field = %self.id, target = %self.target, "target did not resolve");
            return None;
        };
        if std::ptr::addr_eq(Rc::as_ptr(&field), self as *const Self) {
            tracing::trace!(field = %self.id, "target refers to itself");
            return None;
        }
        Some(field)
    }

    /// Follow proxies until a field holding a value is reached.
    ///
    /// A chain that comes back to a field already visited has no target.
    fn resolve_terminal(&self, scope: &dyn Resolve) -> Option<FieldHandle> {
        let mut visited: Vec<*const ()> = vec![self as *const Self as *const ()];
        let mut current = self.resolve_target(scope)?;
        loop {
            let ptr = Rc::as_ptr(&current) as *const ();
            if visited.contains(&ptr) {
                tracing::debug!(field = %self.id, "proxy cycle detected");
                return None;
            }
            visited.push(ptr);

            let next = match current.as_proxy_field() {
                Some(proxy) => proxy.resolve_target(scope)?,
                None => return Some(current),
            };
            current = next;
        }
    }
}

impl Field for ProxyField {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Link
    }

    fn value(&self, scope: &dyn Resolve) -> Option<Value> {
        self.resolve_terminal(scope)?.value(scope)
    }

    fn set_value(&self, value: Value, scope: &dyn Resolve) {
        match self.resolve_terminal(scope) {
            Some(field) => field.set_value(value, scope),
            None => tracing::debug!(field = %self.id, "no target, write dropped"),
        }
    }

    fn is_empty(&self, scope: &dyn Resolve) -> bool {
        self.resolve_terminal(scope)
            .map_or(true, |field| field.is_empty(scope))
    }

    fn as_proxy_field(&self) -> Option<&ProxyField> {
        Some(self)
    }
}
