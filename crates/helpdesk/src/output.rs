//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use helpdesk_core::Entity;

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Ticket status, colored by urgency when `color` is set.
pub fn paint_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_owned();
    }
    match status {
        "new" => status.yellow().bold().to_string(),
        "open" => status.red().to_string(),
        "pending" | "hold" => status.blue().to_string(),
        "solved" | "closed" => status.green().to_string(),
        _ => status.to_owned(),
    }
}

fn paint_key(key: &str, color: bool) -> String {
    if color {
        key.cyan().to_string()
    } else {
        key.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.expect("serialization should not fail")
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

// ── Field helpers ────────────────────────────────────────────────────

/// Id of any entity for `plain` output; empty for value kinds.
pub fn entity_id(entity: &Entity) -> String {
    entity.id().map(|id| id.to_string()).unwrap_or_default()
}

pub fn opt<T: ToString>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".into(), ToString::to_string)
}

pub fn fmt_time(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

/// Cut `text` to one line of at most `max` characters.
pub fn truncate(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max && line.len() == text.trim_end().len() {
        return line.to_owned();
    }
    let cut: String = line.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

// ── Detail view ──────────────────────────────────────────────────────

/// Key/value detail view of one entity.
///
/// Scalars print as-is, scalar arrays comma-joined, nested objects and
/// object arrays as a short summary. Nulls and empty arrays are skipped.
pub fn render_detail(entity: &Entity, color: bool) -> String {
    let map = match entity.to_value() {
        Ok(Value::Object(map)) => map,
        Ok(other) => return other.to_string(),
        Err(e) => return format!("{} {}: {e}", entity.kind(), entity_id(entity)),
    };

    let width = map.keys().map(String::len).max().unwrap_or(0);
    let mut lines = vec![format!("{} {}", entity.kind(), entity_id(entity))];
    for (key, value) in &map {
        let Some(rendered) = detail_value(key, value, color) else {
            continue;
        };
        let padded = format!("{key:<width$}");
        lines.push(format!("  {}  {rendered}", paint_key(&padded, color)));
    }
    lines.join("\n")
}

fn detail_value(key: &str, value: &Value, color: bool) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if key == "status" => Some(paint_status(s, color)),
        Value::String(s) => Some(truncate(s, 100)),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) if items.iter().all(is_scalar) => Some(
            items
                .iter()
                .map(scalar_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Array(items) => Some(format!("({} items)", items.len())),
        Value::Object(fields) if fields.is_empty() => None,
        Value::Object(fields) => Some(format!("{{{} fields}}", fields.len())),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
