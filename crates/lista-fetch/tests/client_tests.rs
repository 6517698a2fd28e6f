// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use lista_app::{ItemId, ListId};
use lista_fetch::Client;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

fn json_header() -> Header {
    Header::from_bytes("Content-Type", "application/json").expect("valid content type header")
}

#[test]
fn fetch_error_names_the_unreachable_endpoint() {
    let client = Client::new("http://127.0.0.1:1/items.json", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .fetch_items()
        .expect_err("fetch should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(message.contains("cannot reach"));
    assert!(message.contains("127.0.0.1:1"));
}

#[test]
fn fetch_decodes_items_with_null_and_absent_names() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/items.json", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/items.json");
        let body = concat!(
            r#"[{"id": 755, "listId": 2, "name": ""},"#,
            r#" {"id": 203, "listId": 2, "name": null},"#,
            r#" {"id": 684, "listId": 1, "name": "Item 684"},"#,
            r#" {"id": 276, "listId": 1}]"#,
        );
        let response = Response::from_string(body)
            .with_status_code(200)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let items = client.fetch_items()?;

    assert_eq!(items.len(), 4);
    assert_eq!(items[0].id, ItemId::new(755));
    assert_eq!(items[0].list_id, ListId::new(2));
    assert_eq!(items[0].name.as_deref(), Some(""));
    assert_eq!(items[1].name, None);
    assert_eq!(items[2].name.as_deref(), Some("Item 684"));
    assert_eq!(items[3].name, None);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_surfaces_the_status_code_on_server_errors() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/items.json", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string("catalog offline").with_status_code(503);
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .fetch_items()
        .expect_err("503 should surface as an error");
    let message = error.to_string();
    assert!(message.contains("503"));
    assert!(message.contains("catalog offline"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_uses_a_json_error_message_when_the_server_sends_one() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/items.json", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string(r#"{"message":"catalog rebuilding"}"#)
            .with_status_code(500)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .fetch_items()
        .expect_err("500 should surface as an error");
    let message = error.to_string();
    assert!(message.contains("500"));
    assert!(message.contains("catalog rebuilding"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_rejects_items_missing_required_fields() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/items.json", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string(r#"[{"id": 1, "name": "Item 1"}]"#)
            .with_status_code(200)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .fetch_items()
        .expect_err("missing listId should fail decoding");
    assert!(error.to_string().contains("decode catalog items"));

    handle.join().expect("server thread should join");
    Ok(())
}
