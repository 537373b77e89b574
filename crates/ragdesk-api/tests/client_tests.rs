// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use ragdesk_api::Client;
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Response, Server};

fn json_response(body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

#[test]
fn set_groq_api_key_posts_camel_case_body() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.url(), "/api/set-groq-api-key");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("request body should be readable");
        let parsed: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(parsed, serde_json::json!({"apiKey": "gsk-test"}));

        request
            .respond(json_response(r#"{"success":true}"#, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    assert!(client.set_groq_api_key("gsk-test")?);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn set_groq_api_key_reports_backend_refusal() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(r#"{"success":false}"#, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    assert!(!client.set_groq_api_key("bad")?);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn set_groq_api_key_errors_on_malformed_response() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(r#"{"ok":"yes"}"#, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .set_groq_api_key("gsk-test")
        .expect_err("missing success field should fail");
    assert!(error.to_string().contains("decode set-groq-api-key response"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn set_groq_api_key_surfaces_server_error_message() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(
                r#"{"success":false,"message":"could not write .env"}"#,
                500,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .set_groq_api_key("gsk-test")
        .expect_err("500 should fail");
    assert_eq!(error.to_string(), "server error (500): could not write .env");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unreachable_backend_names_base_url() -> Result<()> {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))?;

    let error = client
        .set_groq_api_key("gsk-test")
        .expect_err("unreachable endpoint should fail");
    let message = error.to_string();
    assert!(message.contains("cannot reach backend at http://127.0.0.1:1"));
    Ok(())
}

#[test]
fn list_collections_returns_names() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        for body in [
            r#"{"success":true,"collections":["ragtest","manuals"]}"#,
            r#"{"success":false,"message":"db offline"}"#,
        ] {
            let request = server.recv().expect("request expected");
            assert_eq!(request.method(), &Method::Get);
            assert_eq!(request.url(), "/api/list-collections");
            request
                .respond(json_response(body, 200))
                .expect("response should succeed");
        }
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    assert_eq!(
        client.list_collections()?,
        vec!["ragtest".to_owned(), "manuals".to_owned()]
    );

    let error = client
        .list_collections()
        .expect_err("success=false should fail");
    assert!(error.to_string().contains("db offline"));

    handle.join().expect("server thread should join");
    Ok(())
}
