//! formlink - form fields bound to values, with proxying between fields
//!
//! A [`forms::Form`] owns [`forms::ValueField`]s, which hold a string value,
//! and [`forms::ProxyField`]s, which forward reads and writes to another
//! field named by a reference path.

pub mod config;
pub mod error;
pub mod forms;
pub mod l10n;

pub use error::{FormError, Result};
