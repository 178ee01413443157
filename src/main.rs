//! formlink - load a form definition, apply assignments, print the values
//!
//! Usage: `formlink <form.json> [id=value ...]`

use anyhow::{anyhow, Context, Result};
use formlink::config::AppConfig;
use formlink::forms::{Field, Form};
use formlink::l10n::{Localize, NoLocalization};
use serde_json::json;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: formlink <form.json> [id=value ...]");
        std::process::exit(2);
    };

    let form = Form::load(&path).with_context(|| format!("loading form {path}"))?;
    let localizer: Box<dyn Localize> = match config.load_catalog()? {
        Some(catalog) => Box::new(catalog),
        None => Box::new(NoLocalization),
    };

    for field in form.fields() {
        if let Some(value_field) = field.as_value_field() {
            value_field.on_change(|change| {
                tracing::info!(
                    field = %change.id,
                    from = %change.previous,
                    to = %change.current,
                    "value changed"
                );
            });
        }
    }

    for assignment in args {
        let (id, value) = parse_assignment(&assignment)?;
        form.set_value(id, value)?;
    }

    let placeholders: serde_json::Map<String, serde_json::Value> = form
        .fields()
        .filter_map(|field| field.as_value_field())
        .map(|field| {
            (
                field.id().to_string(),
                field.placeholder(&*localizer).into(),
            )
        })
        .collect();

    let output = json!({
        "values": form.snapshot(),
        "placeholders": placeholders,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Split an `id=value` argument at the first `=`
fn parse_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some(("", _)) | None => Err(anyhow!("expected id=value, got '{assignment}'")),
        Some(pair) => Ok(pair),
    }
}
