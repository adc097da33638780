use mockrest::matchers::{body_json, header, method, request_to};
use mockrest::responses::{with_created, with_status, with_success, with_success_body};
use mockrest::{
    Error, ExpectedCount, MockClient, MockRestServer, Request, RequestOrder, ResponseTemplate,
};
use serde_json::json;
use std::thread;
use std::time::Duration;

#[test]
fn responds_with_the_declared_response() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client).build();
    server
        .expect(request_to("/users"))
        .and_expect(method("POST"))
        .and_expect(header("content-type", "application/json"))
        .and_expect(body_json(json!({"name": "ferris"})))
        .and_respond(with_created("/users/1"));

    // Act
    let response = client
        .execute(&Request::post("/users").json(&json!({"name": "ferris"})))
        .unwrap();

    // Assert
    assert_eq!(response.status(), 201);
    assert_eq!(response.headers()["location"], "/users/1");
    server.verify();
}

#[test]
fn response_bodies_and_headers_are_passed_through() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client).build();
    server
        .expect(request_to("/json"))
        .and_respond(ResponseTemplate::new(200).set_body_json(json!({"hello": "world"})));
    server
        .expect(request_to("/raw"))
        .and_respond(with_success_body("<p>hi</p>", "text/html"));
    server
        .expect(request_to("/teapot"))
        .and_respond(with_status(418).append_header("x-a", "1").append_header("x-a", "2"));

    // Act
    let json_response = client.get("/json").unwrap();
    let raw_response = client.get("/raw").unwrap();
    let teapot_response = client.get("/teapot").unwrap();

    // Assert
    assert_eq!(json_response.headers()["content-type"], "application/json");
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(json_response.body()).unwrap(),
        json!({"hello": "world"})
    );
    assert_eq!(raw_response.headers()["content-type"], "text/html");
    assert_eq!(raw_response.body(), b"<p>hi</p>");
    assert_eq!(teapot_response.status(), 418);
    assert_eq!(teapot_response.headers().get_all("x-a").iter().count(), 2);
}

#[test]
fn out_of_order_requests_are_rejected_by_default() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client).build();
    server.expect(request_to("/a")).and_respond(with_success());
    server.expect(request_to("/b")).and_respond(with_success());

    // Act
    let outcome = client.get("/b");

    // Assert
    assert_eq!(
        outcome.unwrap_err().to_string(),
        "Unexpected Request. expected: </a> but was: </b>"
    );
    assert!(matches!(server.manager().verify(), Err(Error::FailedRequests(_))));
    server.reset();
}

#[test]
fn ignoring_request_order_accepts_any_order() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client)
        .ignore_request_order(true)
        .build();
    server.expect(request_to("/a")).and_respond(with_success());
    server.expect(request_to("/b")).and_respond(with_success());

    // Act
    let second = client.get("/b");
    let first = client.get("/a");

    // Assert
    assert!(second.is_ok());
    assert!(first.is_ok());
    assert_eq!(server.request_order(), RequestOrder::Unordered);
    server.verify();
}

#[test]
fn expect_count_accepts_repeated_requests() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client)
        .request_order(RequestOrder::Strict)
        .build();
    server
        .expect_count(ExpectedCount::between(2, 3), request_to("/poll"))
        .and_respond(with_success());

    // Act
    for _ in 0..3 {
        client.get("/poll").unwrap();
    }

    // Assert
    assert_eq!(server.received_requests().len(), 3);
    server.verify();
}

#[test]
#[should_panic(expected = "Further request(s) expected leaving 1 unsatisfied expectation(s).")]
fn verify_panics_on_unsatisfied_expectations() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client)
        .verify_on_drop(false)
        .build();
    server.expect(request_to("/hello")).and_respond(with_success());

    // Assert
    server.verify();
}

#[test]
#[should_panic(expected = "Some requests did not execute successfully.")]
fn verify_panics_after_a_swallowed_failure() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client)
        .verify_on_drop(false)
        .build();

    // Act
    let _ = client.get("/hello");

    // Assert
    server.verify();
}

#[test]
#[should_panic(expected = "Further request(s) expected leaving 1 unsatisfied expectation(s).")]
fn dropping_the_server_verifies_expectations() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client).build();
    server.expect(request_to("/hello")).and_respond(with_success());

    // Act
    drop(server);
}

#[test]
fn verification_on_drop_can_be_disabled() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client)
        .verify_on_drop(false)
        .build();
    server.expect(request_to("/hello")).and_respond(with_success());

    // Act
    drop(server);
}

#[test]
fn reset_allows_reusing_the_server() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client).build();
    server.expect(request_to("/hello")).and_respond(with_success());
    let _ = client.get("/goodbye");

    // Act
    server.reset();
    server.expect(request_to("/goodbye")).and_respond(with_success());

    // Assert
    assert_eq!(client.get("/goodbye").unwrap().status(), 200);
    server.verify();
}

#[test]
fn building_again_rebinds_the_client() {
    // Arrange
    let client = MockClient::new();
    let component_client = client.clone();
    let builder = MockRestServer::bind_to(&client);
    let first = builder.build();
    first.expect(request_to("/first")).and_respond(with_success());
    component_client.get("/first").unwrap();
    first.verify();

    // Act
    let second = builder.build();
    second.expect(request_to("/second")).and_respond(with_success());

    // Assert
    assert!(component_client.get("/second").is_ok());
    second.verify();
    assert_eq!(first.received_requests().len(), 1);
}

#[test]
fn an_unbound_client_fails() {
    // Arrange
    let client = MockClient::new();

    // Act
    let outcome = client.get("/hello");

    // Assert
    assert!(matches!(outcome, Err(Error::NotBound)));
}

#[test]
fn verify_timeout_waits_for_background_requests() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client)
        .verify_poll_interval(Duration::from_millis(1))
        .build();
    server
        .expect_count(ExpectedCount::times(2), request_to("/job"))
        .and_respond(with_success());
    let background = {
        let client = client.clone();
        thread::spawn(move || {
            for _ in 0..2 {
                thread::sleep(Duration::from_millis(20));
                client.get("/job").unwrap();
            }
        })
    };

    // Assert
    server.verify_timeout(Duration::from_secs(10));
    background.join().unwrap();
}

#[test]
#[should_panic(expected = "Further request(s) expected leaving 1 unsatisfied expectation(s).")]
fn verify_timeout_panics_when_requests_never_arrive() {
    // Arrange
    let client = MockClient::new();
    let server = MockRestServer::bind_to(&client)
        .verify_on_drop(false)
        .build();
    server.expect(request_to("/never")).and_respond(with_success());

    // Assert
    server.verify_timeout(Duration::from_millis(50));
}
