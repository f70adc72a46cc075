#![allow(clippy::unwrap_used)]

mod common;

use std::time::Duration;

use common::{Method, harness, harness_with, query_param};
use helpdesk_core::{CacheConfig, CoreError, Entity, EntityId, EntityKind, Lookup, User};
use pretty_assertions::assert_eq;
use serde_json::json;

fn one(lookup: Lookup) -> Entity {
    lookup.into_one().expect("expected a single entity")
}

// ── get ─────────────────────────────────────────────────────────────

#[test]
fn get_serves_repeat_lookups_from_cache() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "users/1.json",
        200,
        json!({ "user": { "id": 1, "name": "Ann" } }),
    );

    let first = one(h.client.users().get(1).unwrap());
    let second = one(h.client.users().get(1).unwrap());

    assert_eq!(first, second);
    assert_eq!(h.transport.count(), 1);
    let user: User = second.into_type().unwrap();
    assert_eq!(user.name.as_deref(), Some("Ann"));
}

#[test]
fn get_requests_sideloads_and_caches_them() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "tickets/5.json",
        200,
        json!({
            "ticket": { "id": 5, "requester_id": 9 },
            "users": [{ "id": 9, "name": "Requester" }],
        }),
    );

    h.client.tickets().get(5).unwrap();

    let request = &h.transport.requests()[0];
    assert_eq!(
        query_param(&request.url, "include").as_deref(),
        Some("users,groups,organizations")
    );
    h.client.users().get(9).unwrap();
    assert_eq!(h.transport.count(), 1);
}

#[test]
fn get_with_paged_response_returns_a_generator() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "groups/3.json",
        200,
        json!({ "groups": [{ "id": 3 }, { "id": 4 }], "next_page": null }),
    );

    match h.client.groups().get(3).unwrap() {
        Lookup::Paged(generator) => {
            let ids: Vec<_> = generator.map(|e| e.unwrap().id()).collect();
            assert_eq!(ids, vec![Some(EntityId::Number(3)), Some(EntityId::Number(4))]);
        }
        other => panic!("expected paged result, got {other:?}"),
    }
}

#[test]
fn get_missing_key_is_reported() {
    let h = harness();
    h.transport
        .respond(Method::Get, "brands/2.json", 200, json!({ "unexpected": {} }));

    let err = h.client.brands().get(2).unwrap_err();
    assert!(matches!(err, CoreError::MissingKey { ref key } if key == "brand"));
}

#[test]
fn not_found_surfaces_as_transport_error() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "users/404.json",
        404,
        json!({ "error": "RecordNotFound", "description": "Not found" }),
    );

    let err = h.client.users().get(404).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("error: RecordNotFound"));
}

#[test]
fn job_statuses_are_never_cached() {
    let h = harness();
    for status in ["queued", "completed"] {
        h.transport.respond(
            Method::Get,
            "job_statuses/8b72.json",
            200,
            json!({ "job_status": { "id": "8b72", "status": status } }),
        );
    }

    h.client.job_statuses().get("8b72").unwrap();
    let latest = one(h.client.job_statuses().get("8b72").unwrap());

    assert_eq!(h.transport.count(), 2);
    assert_eq!(latest.kind(), EntityKind::JobStatus);
}

// ── Cache policies ──────────────────────────────────────────────────

#[test]
fn reference_cache_keeps_most_recently_used() {
    let h = harness_with(&CacheConfig {
        user_capacity: 2,
        ..CacheConfig::default()
    });
    for id in 1..=3 {
        h.transport.respond(
            Method::Get,
            &format!("users/{id}.json"),
            200,
            json!({ "user": { "id": id } }),
        );
    }

    let users = h.client.users();
    users.get(1).unwrap();
    users.get(2).unwrap();
    users.get(1).unwrap(); // hit, 1 is now most recent
    users.get(3).unwrap(); // evicts 2
    assert_eq!(h.transport.count(), 3);

    let cache = h.client.cache();
    assert!(cache.lookup(EntityKind::User, &1.into()).is_some());
    assert!(cache.lookup(EntityKind::User, &3.into()).is_some());
    assert!(cache.lookup(EntityKind::User, &2.into()).is_none());
}

#[test]
fn volatile_cache_expires_after_ttl() {
    let h = harness();
    for _ in 0..2 {
        h.transport
            .respond(Method::Get, "tickets/7.json", 200, json!({ "ticket": { "id": 7 } }));
    }

    let tickets = h.client.tickets();
    tickets.get(7).unwrap();

    h.clock.advance(Duration::from_secs(30));
    tickets.get(7).unwrap();
    assert_eq!(h.transport.count(), 1);

    h.clock.advance(Duration::from_secs(1));
    tickets.get(7).unwrap();
    assert_eq!(h.transport.count(), 2);
}

#[test]
fn disabled_cache_always_fetches() {
    let h = harness_with(&CacheConfig::disabled());
    for _ in 0..2 {
        h.transport
            .respond(Method::Get, "users/1.json", 200, json!({ "user": { "id": 1 } }));
    }

    h.client.users().get(1).unwrap();
    h.client.users().get(1).unwrap();
    assert_eq!(h.transport.count(), 2);
}

// ── get_many ────────────────────────────────────────────────────────

#[test]
fn get_many_all_cached_makes_no_calls() {
    let h = harness();
    for id in 1..=3 {
        h.client.cache().put(&Entity::User(User {
            id: Some(id),
            ..User::default()
        }));
    }

    let lookup = h.client.users().get_many([1_u64, 2, 3]).unwrap();

    assert!(matches!(lookup, Lookup::Cached(ref items) if items.len() == 3));
    assert_eq!(h.transport.count(), 0);
}

#[test]
fn get_many_with_one_miss_queries_every_id_once() {
    let h = harness();
    for id in [1, 3] {
        h.client.cache().put(&Entity::User(User {
            id: Some(id),
            ..User::default()
        }));
    }
    h.transport.respond(
        Method::Get,
        "users/show_many.json",
        200,
        json!({ "users": [{ "id": 1 }, { "id": 2 }, { "id": 3 }], "next_page": null }),
    );

    let entities = h.client.users().get_many([1_u64, 2, 3]).unwrap().collect_all().unwrap();

    assert_eq!(entities.len(), 3);
    assert_eq!(h.transport.count(), 1);
    let request = &h.transport.requests()[0];
    assert_eq!(query_param(&request.url, "ids").as_deref(), Some("1,2,3"));
    assert!(h.client.cache().lookup(EntityKind::User, &2.into()).is_some());
}

#[test]
fn get_many_of_nothing_is_empty() {
    let h = harness();
    let lookup = h.client.users().get_many(Vec::<u64>::new()).unwrap();
    assert_eq!(lookup.collect_all().unwrap(), Vec::new());
    assert_eq!(h.transport.count(), 0);
}
