//! Shared helpers for command handlers.

use std::path::Path;

use helpdesk_core::{CoreError, Entity, EntityId, EntityType};

use crate::cli::{GlobalOpts, ListArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Output format after `main` folded in the config default.
pub fn format(global: &GlobalOpts) -> OutputFormat {
    global.output.unwrap_or(OutputFormat::Table)
}

pub fn color(global: &GlobalOpts) -> bool {
    output::should_color(global.color)
}

/// Query parameters for the paging and sorting flags.
pub fn list_params(args: &ListArgs) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(per_page) = args.per_page {
        params.push(("per_page", per_page.clamp(1, 100).to_string()));
    }
    if let Some(ref sort_by) = args.sort_by {
        params.push(("sort_by", sort_by.clone()));
    }
    if let Some(ref order) = args.sort_order {
        params.push(("sort_order", order.clone()));
    }
    params
}

pub fn borrow_params<'a>(params: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
    params.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

/// Drain a lazy result stream, stopping at `--limit` unless `--all`.
///
/// Pages past the limit are never requested.
pub fn collect<I>(results: I, args: &ListArgs) -> Result<Vec<Entity>, CoreError>
where
    I: Iterator<Item = Result<Entity, CoreError>>,
{
    if args.all {
        results.collect()
    } else {
        results.take(args.limit).collect()
    }
}

/// Entities of one concrete type, skipping anything else.
pub fn typed<T: EntityType + Clone>(entities: &[Entity]) -> Vec<T> {
    entities.iter().filter_map(Entity::as_type).collect()
}

pub fn parse_ids(raw: &[String]) -> Vec<EntityId> {
    raw.iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(EntityId::from)
        .collect()
}

/// Refuse destructive actions unless `--yes` was passed.
pub fn ensure_confirmed(global: &GlobalOpts, action: &str) -> Result<(), CliError> {
    if global.yes {
        return Ok(());
    }
    Err(CliError::NonInteractiveRequiresYes {
        action: action.into(),
    })
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON in {}: {e}", path.display()),
    })
}

/// Render any entity list with the generic row and detail views.
pub fn render_entities(entities: &[Entity], global: &GlobalOpts) -> String {
    output::render_list(
        format(global),
        entities,
        |e| EntityRow::from(e),
        output::entity_id,
    )
}

pub fn render_entity(entity: &Entity, global: &GlobalOpts) -> String {
    let color = color(global);
    output::render_single(
        format(global),
        entity,
        |e| output::render_detail(e, color),
        output::entity_id,
    )
}

/// One entity as a detail view, several as a table.
pub fn show(entities: &[Entity], global: &GlobalOpts) -> String {
    match entities {
        [one] => render_entity(one, global),
        many => render_entities(many, global),
    }
}

/// Report a finished delete on stderr.
pub fn report_deleted(count: usize, what: &str, global: &GlobalOpts) {
    if !global.quiet {
        eprintln!("Deleted {count} {what}(s)");
    }
}

// ── Generic row ─────────────────────────────────────────────────────

#[derive(tabled::Tabled)]
pub struct EntityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Entity> for EntityRow {
    fn from(entity: &Entity) -> Self {
        let value = entity.to_value().unwrap_or_default();
        let name = ["name", "subject", "title", "body"]
            .iter()
            .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
            .map_or_else(|| "-".into(), |s| output::truncate(s, 60));
        let updated = value
            .get("updated_at")
            .or_else(|| value.get("created_at"))
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse::<chrono::DateTime<chrono::Utc>>().ok());

        Self {
            id: output::entity_id(entity),
            kind: entity.kind().to_string(),
            name,
            updated: output::fmt_time(updated.as_ref()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use helpdesk_core::{Organization, Ticket};

    fn list_args(limit: usize, all: bool) -> ListArgs {
        ListArgs {
            limit,
            all,
            per_page: Some(500),
            sort_by: None,
            sort_order: Some("desc".into()),
        }
    }

    #[test]
    fn per_page_is_clamped() {
        let params = list_params(&list_args(5, false));
        assert_eq!(params, vec![("per_page", "100".into()), ("sort_order", "desc".into())]);
    }

    #[test]
    fn collect_stops_at_limit() {
        let stream = (1..).map(|id| {
            Ok(Entity::from(Ticket {
                id: Some(id),
                ..Ticket::default()
            }))
        });
        let got = collect(stream, &list_args(3, false)).unwrap();
        assert_eq!(got.len(), 3);
    }

    #[test]
    fn numeric_ids_parse_as_numbers() {
        let ids = parse_ids(&["42".into(), " ".into(), "abc".into()]);
        assert_eq!(ids, vec![EntityId::Number(42), EntityId::Token("abc".into())]);
    }

    #[test]
    fn generic_row_picks_a_name() {
        let org = Entity::from(Organization {
            id: Some(9),
            name: Some("Acme".into()),
            ..Organization::default()
        });
        let row = EntityRow::from(&org);
        assert_eq!(row.id, "9");
        assert_eq!(row.kind, "organization");
        assert_eq!(row.name, "Acme");
        assert_eq!(row.updated, "-");
    }
}
