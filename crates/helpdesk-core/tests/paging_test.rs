#![allow(clippy::unwrap_used)]

mod common;

use common::{BASE, Method, harness};
use helpdesk_core::{CoreError, EntityId, EntityKind, Ticket};
use pretty_assertions::assert_eq;
use serde_json::json;

fn page_two_url() -> String {
    format!("{BASE}tickets.json?page=2")
}

#[test]
fn two_pages_fetch_the_second_lazily_and_once() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "tickets.json",
        200,
        json!({
            "tickets": [{ "id": 1, "subject": "a" }, { "id": 2, "subject": "b" }],
            "next_page": page_two_url(),
            "count": 3,
        }),
    );
    h.transport.respond(
        Method::Get,
        "tickets.json",
        200,
        json!({ "tickets": [{ "id": 3, "subject": "c" }], "next_page": null, "count": 3 }),
    );

    let mut generator = h.client.tickets().list(&[]).unwrap();
    assert_eq!(generator.total(), Some(3));
    assert_eq!(h.transport.count(), 1);

    let first: Ticket = generator.next().unwrap().unwrap().into_type().unwrap();
    let second: Ticket = generator.next().unwrap().unwrap().into_type().unwrap();
    assert_eq!((first.id, second.id), (Some(1), Some(2)));
    assert_eq!(h.transport.count(), 1);

    let third: Ticket = generator.next().unwrap().unwrap().into_type().unwrap();
    assert_eq!(third.subject.as_deref(), Some("c"));
    assert_eq!(h.transport.count(), 2);
    assert_eq!(h.transport.requests()[1].url.as_str(), page_two_url());

    assert!(generator.next().is_none());
    assert!(generator.next().is_none());
    assert_eq!(h.transport.count(), 2);
}

#[test]
fn each_page_is_cached_when_fetched() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "tickets.json",
        200,
        json!({ "tickets": [{ "id": 1 }, { "id": 2 }], "next_page": page_two_url() }),
    );
    h.transport.respond(
        Method::Get,
        "tickets.json",
        200,
        json!({ "tickets": [{ "id": 3 }], "next_page": null }),
    );

    let mut generator = h.client.tickets().list(&[]).unwrap();
    let cache = h.client.cache();
    assert!(cache.lookup(EntityKind::Ticket, &EntityId::Number(2)).is_some());
    assert!(cache.lookup(EntityKind::Ticket, &EntityId::Number(3)).is_none());

    generator.by_ref().take(3).for_each(drop);
    assert!(cache.lookup(EntityKind::Ticket, &EntityId::Number(3)).is_some());
}

#[test]
fn empty_page_ends_iteration_despite_next_page() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "tickets.json",
        200,
        json!({ "tickets": [{ "id": 1 }], "next_page": page_two_url() }),
    );
    h.transport.respond(
        Method::Get,
        "tickets.json",
        200,
        json!({ "tickets": [], "next_page": format!("{BASE}tickets.json?page=3") }),
    );

    let items: Vec<_> = h.client.tickets().list(&[]).unwrap().collect();
    assert_eq!(items.len(), 1);
    assert_eq!(h.transport.count(), 2);
}

#[test]
fn empty_first_page_yields_nothing() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "groups.json",
        200,
        json!({ "groups": [], "next_page": null }),
    );

    let mut generator = h.client.groups().list(&[]).unwrap();
    assert!(generator.next().is_none());
}

#[test]
fn failed_page_fetch_is_yielded_then_ends() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "tickets.json",
        200,
        json!({ "tickets": [{ "id": 1 }], "next_page": page_two_url() }),
    );
    h.transport.respond(
        Method::Get,
        "tickets.json",
        500,
        json!({ "error": "InternalError" }),
    );

    let mut generator = h.client.tickets().list(&[]).unwrap();
    assert!(generator.next().unwrap().is_ok());
    let err = generator.next().unwrap().unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(generator.next().is_none());
}

#[test]
fn list_passes_filters_and_never_uses_cache() {
    let h = harness();
    for _ in 0..2 {
        h.transport.respond(
            Method::Get,
            "users.json",
            200,
            json!({ "users": [{ "id": 1 }], "next_page": null }),
        );
    }

    h.client.users().list(&[("role", "agent")]).unwrap().for_each(drop);
    h.client.users().list(&[("role", "agent")]).unwrap().for_each(drop);

    assert_eq!(h.transport.count(), 2);
    let url = &h.transport.requests()[0].url;
    assert!(url.query().unwrap().starts_with("role=agent"));
}

// ── Search ──────────────────────────────────────────────────────────

#[test]
fn search_maps_each_result_by_its_type() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "search.json",
        200,
        json!({
            "results": [
                { "id": 1, "result_type": "ticket", "subject": "Printer" },
                { "id": 2, "result_type": "user", "name": "Ann" },
                { "id": 3, "result_type": "organization", "name": "Acme" },
            ],
            "next_page": null,
            "count": 3,
        }),
    );

    let kinds: Vec<EntityKind> = h
        .client
        .search("printer", &[("sort_by", "created_at")])
        .unwrap()
        .map(|e| e.unwrap().kind())
        .collect();

    assert_eq!(
        kinds,
        vec![EntityKind::Ticket, EntityKind::User, EntityKind::Organization]
    );
    let url = &h.transport.requests()[0].url;
    assert_eq!(url.query(), Some("query=printer&sort_by=created_at"));
    assert!(h.client.cache().lookup(EntityKind::User, &EntityId::Number(2)).is_some());
}

#[test]
fn search_with_unknown_result_type_fails() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "search.json",
        200,
        json!({ "results": [{ "id": 1, "result_type": "gizmo" }], "next_page": null }),
    );

    let err = h.client.search("x", &[]).unwrap_err();
    assert!(matches!(err, CoreError::UnknownType { ref name } if name == "gizmo"));
}

// ── Sub-resources ───────────────────────────────────────────────────

#[test]
fn user_groups_lists_nested_collection() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "users/7/groups.json",
        200,
        json!({ "groups": [{ "id": 20, "name": "Support" }], "next_page": null }),
    );

    let groups: Vec<_> = h.client.users().groups(7_u64).unwrap().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].as_ref().unwrap().kind(), EntityKind::Group);
    assert_eq!(h.transport.requests()[0].url.query(), None);
}

#[test]
fn requested_tickets_use_nested_path() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "users/7/tickets/requested.json",
        200,
        json!({ "tickets": [{ "id": 1 }, { "id": 2 }], "next_page": null }),
    );

    assert_eq!(h.client.users().requested(7_u64).unwrap().count(), 2);
}

#[test]
fn ticket_comments_carry_attachments() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "tickets/5/comments.json",
        200,
        json!({
            "comments": [{
                "id": 100,
                "type": "Comment",
                "body": "See attached",
                "attachments": [{ "id": 9, "file_name": "log.txt", "thumbnails": [] }],
            }],
            "next_page": null,
        }),
    );

    let comment = h.client.tickets().comments(5_u64).unwrap().next().unwrap().unwrap();
    let comment: helpdesk_core::Comment = comment.into_type().unwrap();
    assert_eq!(comment.attachments[0].file_name.as_deref(), Some("log.txt"));
    assert!(h.client.cache().lookup(EntityKind::Comment, &EntityId::Number(100)).is_some());
}

#[test]
fn ticket_audits_decode_events() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "tickets/5/audits.json",
        200,
        json!({
            "audits": [{
                "id": 200,
                "ticket_id": 5,
                "events": [
                    { "id": 1, "type": "Create", "field_name": "status", "value": "new" },
                    { "id": 2, "type": "notification", "subject": "Ticket received" },
                    { "id": 3, "type": "Change", "field_name": "priority", "value": "high", "previous_value": null },
                    { "id": 4, "type": "VoiceComment", "data": { "call_duration": 40 } },
                ],
            }],
            "next_page": null,
        }),
    );

    let audit = h.client.tickets().audits(5_u64).unwrap().next().unwrap().unwrap();
    let audit: helpdesk_core::Audit = audit.into_type().unwrap();
    let kinds: Vec<_> = audit.events.iter().map(|e| e.kind().ok()).collect();
    assert_eq!(
        kinds,
        vec![
            Some(EntityKind::CreateEvent),
            Some(EntityKind::Notification),
            Some(EntityKind::ChangeEvent),
            None,
        ]
    );
    assert_eq!(audit.events[3].tag(), Some("VoiceComment"));
}

#[test]
fn recent_tickets() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "tickets/recent.json",
        200,
        json!({ "tickets": [{ "id": 1 }], "next_page": null }),
    );

    assert_eq!(h.client.tickets().recent().unwrap().count(), 1);
}
