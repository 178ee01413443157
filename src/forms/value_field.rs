//! Field holding its own text value

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::field::{parse_number, Field, FieldConfig, FieldKind, Format, Value};
use super::resolve::Resolve;
use crate::l10n::Localize;

/// Localization key of the placeholder shared by all fields
pub const GLOBAL_PLACEHOLDER_KEY: &str = "form.global.placeholder";

/// Placeholder used when nothing else is configured or translated
pub const DEFAULT_PLACEHOLDER: &str = "Enter value...";

/// Notification emitted after a value field's text changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub id: String,
    pub previous: String,
    pub current: String,
}

type SetObserver = Rc<dyn Fn(&Value)>;
type ChangeObserver = Rc<dyn Fn(&FieldChange)>;

/// Holds the notifying flag for the duration of one top-level write.
/// Clears it on drop, including when an observer unwinds.
struct NotifyGuard<'a>(&'a Cell<bool>);

impl<'a> NotifyGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A single-line text input bound to a string value
pub struct ValueField {
    id: String,
    value: RefCell<String>,
    format: Format,
    autocomplete: Option<Vec<String>>,
    placeholder: Option<String>,
    set_observers: RefCell<Vec<SetObserver>>,
    change_observers: RefCell<Vec<ChangeObserver>>,
    notifying: Cell<bool>,
}

impl ValueField {
    pub fn new(id: &str, config: &FieldConfig) -> Self {
        Self {
            id: id.to_string(),
            value: RefCell::new(config.value.clone().unwrap_or_default()),
            format: config
                .format
                .as_deref()
                .map(Format::from_name)
                .unwrap_or_default(),
            autocomplete: config.autocomplete.clone(),
            placeholder: config.placeholder.clone(),
            set_observers: RefCell::new(Vec::new()),
            change_observers: RefCell::new(Vec::new()),
            notifying: Cell::new(false),
        }
    }

    /// Create a text field with an initial value
    pub fn text(id: &str, value: &str) -> Self {
        Self::new(
            id,
            &FieldConfig {
                value: Some(value.to_string()),
                ..Default::default()
            },
        )
    }

    /// Create a number-formatted field with an initial value
    pub fn number(id: &str, value: &str) -> Self {
        Self::new(
            id,
            &FieldConfig {
                value: Some(value.to_string()),
                format: Some(Format::Number.as_str().to_string()),
                ..Default::default()
            },
        )
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn autocomplete(&self) -> Option<&[String]> {
        self.autocomplete.as_deref()
    }

    /// Id of the autocomplete list element
    pub fn list_id(&self) -> String {
        format!("autocomplete-{}", self.id)
    }

    /// The stored text, regardless of format
    pub fn text_value(&self) -> String {
        self.value.borrow().clone()
    }

    /// Get the value, coerced to a number when the format is `number`
    pub fn get(&self) -> Value {
        let text = self.value.borrow();
        match self.format {
            Format::Number => Value::Number(parse_number(&text)),
            Format::Text => Value::Text(text.clone()),
        }
    }

    /// Store a new value and notify observers.
    ///
    /// Set observers see every write. Change observers only run when the
    /// stored text actually differs. Writes made from inside an observer are
    /// stored without notifying again.
    pub fn set(&self, value: impl Into<Value>) {
        let value = value.into();
        if self.notifying.get() {
            self.value.replace(value.to_string());
            tracing::debug!(field = %self.id, "nested write, notification suppressed");
            return;
        }
        let _guard = NotifyGuard::enter(&self.notifying);

        let observers: Vec<SetObserver> = self.set_observers.borrow().clone();
        for observer in observers {
            observer(&value);
        }

        let current = value.to_string();
        let previous = self.value.replace(current.clone());

        if previous != current {
            let change = FieldChange {
                id: self.id.clone(),
                previous,
                current,
            };
            let observers: Vec<ChangeObserver> = self.change_observers.borrow().clone();
            for observer in observers {
                observer(&change);
            }
        }
    }

    /// Whether the stored text is empty
    pub fn is_blank(&self) -> bool {
        self.value.borrow().is_empty()
    }

    /// Register a callback run before every write
    pub fn on_set(&self, observer: impl Fn(&Value) + 'static) {
        self.set_observers.borrow_mut().push(Rc::new(observer));
    }

    /// Register a callback run after the stored text changed
    pub fn on_change(&self, observer: impl Fn(&FieldChange) + 'static) {
        self.change_observers.borrow_mut().push(Rc::new(observer));
    }

    /// Placeholder text for this field.
    ///
    /// Looks up `form.<id>.placeholder`, falling back to the configured
    /// placeholder or the localized global default.
    pub fn placeholder(&self, l10n: &dyn Localize) -> String {
        let fallback = match &self.placeholder {
            Some(placeholder) => placeholder.clone(),
            None => l10n.localize(GLOBAL_PLACEHOLDER_KEY, DEFAULT_PLACEHOLDER),
        };
        l10n.localize(&format!("form.{}.placeholder", self.id), &fallback)
    }
}

impl fmt::Debug for ValueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueField")
            .field("id", &self.id)
            .field("value", &self.value.borrow())
            .field("format", &self.format)
            .field("autocomplete", &self.autocomplete)
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}

impl Field for ValueField {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Text
    }

    fn value(&self, _scope: &dyn Resolve) -> Option<Value> {
        Some(self.get())
    }

    fn set_value(&self, value: Value, _scope: &dyn Resolve) {
        self.set(value);
    }

    fn is_empty(&self, _scope: &dyn Resolve) -> bool {
        self.is_blank()
    }

    fn as_value_field(&self) -> Option<&ValueField> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::Detached;
    use crate::l10n::{Catalog, NoLocalization};

    mod construction {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_defaults() {
            let field = ValueField::new("name", &FieldConfig::default());
            assert_eq!(field.id(), "name");
            assert_eq!(field.text_value(), "");
            assert_eq!(field.format(), Format::Text);
            assert!(field.autocomplete().is_none());
            assert!(field.is_blank());
        }

        #[test]
        fn test_config_is_applied() {
            let config = FieldConfig {
                value: Some("3".to_string()),
                autocomplete: Some(vec!["1".to_string(), "2".to_string()]),
                format: Some("number".to_string()),
                ..Default::default()
            };
            let field = ValueField::new("count", &config);
            assert_eq!(field.format(), Format::Number);
            assert_eq!(field.get(), Value::Number(3.0));
            assert_eq!(field.autocomplete(), Some(&["1".to_string(), "2".to_string()][..]));
        }

        #[test]
        fn test_unknown_format_is_text() {
            let config = FieldConfig {
                value: Some("12".to_string()),
                format: Some("date".to_string()),
                ..Default::default()
            };
            let field = ValueField::new("when", &config);
            assert_eq!(field.get(), Value::from("12"));
        }

        #[test]
        fn test_list_id() {
            assert_eq!(ValueField::text("city", "").list_id(), "autocomplete-city");
        }
    }

    mod values {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_text_round_trip() {
            let field = ValueField::text("a", "");
            for s in ["", "hello", "  spaced  ", "42", "ünïcödé"] {
                field.set(s);
                assert_eq!(field.get(), Value::from(s));
            }
        }

        #[test]
        fn test_number_format_coerces_on_read() {
            let field = ValueField::number("a", "0");
            field.set("42");
            assert_eq!(field.get(), Value::Number(42.0));
            assert_eq!(field.text_value(), "42");
        }

        #[test]
        fn test_number_format_non_numeric_is_nan() {
            let field = ValueField::number("a", "");
            field.set("twelve");
            assert!(field.get().as_number().is_some_and(f64::is_nan));
            assert_eq!(field.text_value(), "twelve");
        }

        #[test]
        fn test_number_written_as_text() {
            let field = ValueField::text("a", "");
            field.set(7.5);
            assert_eq!(field.get(), Value::from("7.5"));
        }

        #[test]
        fn test_is_empty_tracks_stored_text() {
            let field = ValueField::number("a", "");
            assert!(field.is_empty(&Detached));
            field.set("0");
            assert!(!field.is_empty(&Detached));
            field.set("");
            assert!(field.is_empty(&Detached));
        }

        #[test]
        fn test_trait_accessors() {
            let field = ValueField::text("a", "x");
            assert_eq!(field.value(&Detached), Some(Value::from("x")));
            field.set_value(Value::from("y"), &Detached);
            assert_eq!(field.text_value(), "y");
        }
    }

    mod observers {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::cell::RefCell;

        #[test]
        fn test_change_observer_sees_previous_and_current() {
            let field = ValueField::text("a", "old");
            let seen = Rc::new(RefCell::new(Vec::new()));
            let sink = seen.clone();
            field.on_change(move |change| sink.borrow_mut().push(change.clone()));

            field.set("new");

            assert_eq!(
                *seen.borrow(),
                vec![FieldChange {
                    id: "a".to_string(),
                    previous: "old".to_string(),
                    current: "new".to_string(),
                }]
            );
        }

        #[test]
        fn test_identical_write_does_not_notify_change() {
            let field = ValueField::text("a", "same");
            let changes = Rc::new(Cell::new(0));
            let sets = Rc::new(Cell::new(0));
            let c = changes.clone();
            let s = sets.clone();
            field.on_change(move |_| c.set(c.get() + 1));
            field.on_set(move |_| s.set(s.get() + 1));

            field.set("same");
            field.set("other");

            assert_eq!(sets.get(), 2);
            assert_eq!(changes.get(), 1);
        }

        #[test]
        fn test_set_observer_runs_before_store() {
            let field = Rc::new(ValueField::text("a", "before"));
            let observed = Rc::new(RefCell::new(String::new()));
            let weak = Rc::downgrade(&field);
            let sink = observed.clone();
            field.on_set(move |_| {
                if let Some(field) = weak.upgrade() {
                    *sink.borrow_mut() = field.text_value();
                }
            });

            field.set("after");

            assert_eq!(*observed.borrow(), "before");
            assert_eq!(field.text_value(), "after");
        }

        #[test]
        fn test_observer_can_read_field() {
            let field = Rc::new(ValueField::number("a", "1"));
            let observed = Rc::new(Cell::new(0.0));
            let weak = Rc::downgrade(&field);
            let sink = observed.clone();
            field.on_change(move |_| {
                if let Some(n) = weak.upgrade().and_then(|f| f.get().as_number()) {
                    sink.set(n);
                }
            });

            field.set("5");

            assert_eq!(observed.get(), 5.0);
        }

        #[test]
        fn test_nested_write_is_stored_without_renotifying() {
            let field = Rc::new(ValueField::text("a", ""));
            let calls = Rc::new(Cell::new(0));
            let weak = Rc::downgrade(&field);
            let counter = calls.clone();
            field.on_change(move |change| {
                counter.set(counter.get() + 1);
                if let Some(field) = weak.upgrade() {
                    field.set(format!("{}!", change.current));
                }
            });

            field.set("hi");

            assert_eq!(calls.get(), 1);
            assert_eq!(field.text_value(), "hi!");

            field.set("again");
            assert_eq!(calls.get(), 2);
            assert_eq!(field.text_value(), "again!");
        }

        #[test]
        fn test_panicking_observer_does_not_silence_later_writes() {
            let field = ValueField::text("a", "");
            let armed = Rc::new(Cell::new(true));
            let calls = Rc::new(Cell::new(0));
            let trigger = armed.clone();
            let counter = calls.clone();
            field.on_change(move |_| {
                counter.set(counter.get() + 1);
                if trigger.replace(false) {
                    panic!("observer failure");
                }
            });

            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| field.set("boom")));
            assert!(result.is_err());
            assert_eq!(field.text_value(), "boom");

            field.set("after");
            assert_eq!(calls.get(), 2);
            assert_eq!(field.text_value(), "after");
        }
    }

    mod placeholders {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_global_default() {
            let field = ValueField::text("a", "");
            assert_eq!(field.placeholder(&NoLocalization), DEFAULT_PLACEHOLDER);
        }

        #[test]
        fn test_configured_placeholder() {
            let config = FieldConfig {
                placeholder: Some("Your name".to_string()),
                ..Default::default()
            };
            let field = ValueField::new("name", &config);
            assert_eq!(field.placeholder(&NoLocalization), "Your name");
        }

        #[test]
        fn test_localized_global_default() {
            let mut catalog = Catalog::default();
            catalog.insert(GLOBAL_PLACEHOLDER_KEY, "Wert eingeben...");
            let field = ValueField::text("a", "");
            assert_eq!(field.placeholder(&catalog), "Wert eingeben...");
        }

        #[test]
        fn test_field_key_wins() {
            let mut catalog = Catalog::default();
            catalog.insert(GLOBAL_PLACEHOLDER_KEY, "Wert eingeben...");
            catalog.insert("form.name.placeholder", "Ihr Name");
            let config = FieldConfig {
                placeholder: Some("Your name".to_string()),
                ..Default::default()
            };
            let field = ValueField::new("name", &config);
            assert_eq!(field.placeholder(&catalog), "Ihr Name");
        }
    }
}
