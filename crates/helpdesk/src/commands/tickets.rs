//! Ticket command handlers.

use tabled::Tabled;

use helpdesk_core::{
    Audit, Batch, Comment, Entity, EntityId, EntityType, HelpdeskClient, Lookup, Nullable, Ticket,
};

use crate::cli::{GlobalOpts, TicketsArgs, TicketsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Requester")]
    requester: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl TicketRow {
    pub(crate) fn new(t: &Ticket, color: bool) -> Self {
        Self {
            id: output::opt(t.id.as_ref()),
            status: t
                .status
                .as_deref()
                .map_or_else(|| "-".into(), |s| output::paint_status(s, color)),
            priority: output::opt(t.priority.as_ref()),
            subject: t
                .subject
                .as_deref()
                .map_or_else(|| "-".into(), |s| output::truncate(s, 60)),
            requester: output::opt(t.requester_id.as_ref()),
            updated: output::fmt_time(t.updated_at.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct CommentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Public")]
    public: String,
    #[tabled(rename = "Body")]
    body: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Comment> for CommentRow {
    fn from(c: &Comment) -> Self {
        Self {
            id: output::opt(c.id.as_ref()),
            author: output::opt(c.author_id.as_ref()),
            public: output::opt(c.public.as_ref()),
            body: c
                .body
                .as_deref()
                .map_or_else(|| "-".into(), |s| output::truncate(s, 70)),
            created: output::fmt_time(c.created_at.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Events")]
    events: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Audit> for AuditRow {
    fn from(a: &Audit) -> Self {
        let events = a
            .events
            .iter()
            .map(|e| match e.kind() {
                Ok(kind) => kind.to_string(),
                Err(_) => e.tag().unwrap_or("?").to_owned(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            id: output::opt(a.id.as_ref()),
            author: output::opt(a.author_id.as_ref()),
            events: if events.is_empty() { "-".into() } else { events },
            created: output::fmt_time(a.created_at.as_ref()),
        }
    }
}

pub(crate) fn render_tickets(tickets: &[Ticket], global: &GlobalOpts) -> String {
    let color = util::color(global);
    output::render_list(
        util::format(global),
        tickets,
        |t| TicketRow::new(t, color),
        |t| output::opt(t.id.as_ref()),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    client: &HelpdeskClient,
    args: TicketsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let api = client.tickets();

    match args.command {
        TicketsCommand::List(list) => {
            let params = util::list_params(&list);
            let results = api.list(&util::borrow_params(&params))?;
            let tickets = util::typed::<Ticket>(&util::collect(results, &list)?);
            output::print_output(&render_tickets(&tickets, global), global.quiet);
            Ok(())
        }

        TicketsCommand::Get { id } => {
            let found = api
                .get(EntityId::from(id.as_str()))
                .and_then(Lookup::collect_all)
                .map_err(|e| CliError::lookup(e, "ticket", &id, "tickets list"))?;
            output::print_output(&util::show(&found, global), global.quiet);
            Ok(())
        }

        TicketsCommand::ShowMany { ids } => {
            let found = api.get_many(util::parse_ids(&ids))?.collect_all()?;
            let tickets = util::typed::<Ticket>(&found);
            output::print_output(&render_tickets(&tickets, global), global.quiet);
            Ok(())
        }

        TicketsCommand::Recent(list) => {
            let tickets = util::typed::<Ticket>(&util::collect(api.recent()?, &list)?);
            output::print_output(&render_tickets(&tickets, global), global.quiet);
            Ok(())
        }

        TicketsCommand::Comments { id, list } => {
            let results = api
                .comments(EntityId::from(id.as_str()))
                .map_err(|e| CliError::lookup(e, "ticket", &id, "tickets list"))?;
            let comments = util::typed::<Comment>(&util::collect(results, &list)?);
            let out = output::render_list(
                util::format(global),
                &comments,
                |c| CommentRow::from(c),
                |c| output::opt(c.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Audits { id, list } => {
            let results = api
                .audits(EntityId::from(id.as_str()))
                .map_err(|e| CliError::lookup(e, "ticket", &id, "tickets list"))?;
            let audits = util::typed::<Audit>(&util::collect(results, &list)?);
            let out = output::render_list(
                util::format(global),
                &audits,
                |a| AuditRow::from(a),
                |a| output::opt(a.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::ForOrganization { id, list } => {
            let results = api
                .organization_tickets(EntityId::from(id.as_str()))
                .map_err(|e| CliError::lookup(e, "organization", &id, "organizations list"))?;
            let tickets = util::typed::<Ticket>(&util::collect(results, &list)?);
            output::print_output(&render_tickets(&tickets, global), global.quiet);
            Ok(())
        }

        TicketsCommand::Create {
            subject,
            comment,
            priority,
            kind,
            tags,
            from_file,
        } => {
            let batch = match from_file {
                Some(path) => batch_from_json(client, util::read_json_file(&path)?)?,
                None => Batch::from(Ticket {
                    subject,
                    comment: comment.map(|body| Comment {
                        body: Some(body),
                        ..Comment::default()
                    }),
                    priority,
                    kind,
                    tags,
                    ..Ticket::default()
                }),
            };
            let response = api.create(batch)?;
            output::print_output(&util::render_entity(&response.entity(), global), global.quiet);
            Ok(())
        }

        TicketsCommand::Update {
            id,
            status,
            priority,
            subject,
            assignee_id,
            unassign,
            comment,
            private,
        } => {
            let ticket_id = id.parse::<u64>().map_err(|_| CliError::Validation {
                field: "id".into(),
                reason: format!("expected a numeric ticket id, got '{id}'"),
            })?;
            let ticket = Ticket {
                id: Some(ticket_id),
                status,
                priority,
                subject,
                assignee_id: match assignee_id {
                    Some(assignee) => Nullable::Value(assignee),
                    None if unassign => Nullable::Null,
                    None => Nullable::Absent,
                },
                comment: comment.map(|body| Comment {
                    body: Some(body),
                    public: Some(!private),
                    ..Comment::default()
                }),
                ..Ticket::default()
            };
            let response = api
                .update(ticket)
                .map_err(|e| CliError::lookup(e, "ticket", &id, "tickets list"))?;
            output::print_output(&util::render_entity(&response.entity(), global), global.quiet);
            Ok(())
        }

        TicketsCommand::Delete { ids } => {
            util::ensure_confirmed(global, "tickets delete")?;
            let ids = util::parse_ids(&ids);
            api.delete_ids(&ids)?;
            util::report_deleted(ids.len(), "ticket", global);
            Ok(())
        }
    }
}

/// A ticket object, a list of them, or `{"ticket": ..}` / `{"tickets": [..]}`.
fn batch_from_json(client: &HelpdeskClient, value: serde_json::Value) -> Result<Batch, CliError> {
    let mapper = client.mapper();
    let value = match value {
        serde_json::Value::Object(mut map) if map.contains_key(Ticket::KIND.name()) => {
            map.remove(Ticket::KIND.name()).unwrap_or_default()
        }
        serde_json::Value::Object(mut map) if map.contains_key(Ticket::KIND.collection_key()) => {
            map.remove(Ticket::KIND.collection_key()).unwrap_or_default()
        }
        other => other,
    };

    match value {
        serde_json::Value::Array(items) => {
            let tickets = items
                .iter()
                .map(|item| mapper.build_kind(Ticket::KIND, item))
                .collect::<Result<Vec<Entity>, _>>()?;
            Ok(Batch::from(tickets))
        }
        single => Ok(Batch::from(mapper.build_kind(Ticket::KIND, &single)?)),
    }
}
