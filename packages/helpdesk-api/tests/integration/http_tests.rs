//! End-to-end RPC calls over HTTP.

use serde_json::json;

use super::helpers::{send, start_server, AGENT};

#[tokio::test]
async fn test_health() {
    let server = start_server().await;
    let response = send(server.addr, "GET", "/health", None, None).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({"success": true, "data": {"status": "ok"}}));
}

#[tokio::test]
async fn test_unknown_route_and_method() {
    let server = start_server().await;

    let response = send(server.addr, "GET", "/api/resource/HD%20Ticket", None, None).await;
    assert_eq!(response.status, 404);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"]["code"], "404");

    let response = send(server.addr, "GET", "/api/method/frappe.client.delete", Some(AGENT), None).await;
    assert_eq!(response.status, 404);

    let response = send(server.addr, "DELETE", "/api/method/sort_options", Some(AGENT), None).await;
    assert_eq!(response.status, 405);
}

#[tokio::test]
async fn test_get_list_data_over_post() {
    let server = start_server().await;
    let body = json!({
        "doctype": "HD Ticket",
        "filters": {"status": "Open"},
        "order_by": "name asc",
    })
    .to_string();

    let response = send(
        server.addr,
        "POST",
        "/api/method/helpdesk.api.doc.get_list_data",
        Some(AGENT),
        Some(&body),
    )
    .await;
    assert_eq!(response.status, 200, "{}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["total_count"], 2);
    assert_eq!(data["row_count"], 2);
    let names: Vec<&str> = data["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["1", "3"]);
    assert!(data["rows"].as_array().unwrap().contains(&json!("name")));
}

#[tokio::test]
async fn test_query_string_arguments() {
    let server = start_server().await;
    let target = "/api/method/get_list_data?doctype=HD+Ticket&page_length=1&filters=%7B%22status%22%3A%22Closed%22%7D";

    let response = send(server.addr, "GET", target, Some(AGENT), None).await;
    assert_eq!(response.status, 200, "{}", response.body);
    assert_eq!(response.body["data"]["total_count"], 1);
    assert_eq!(response.body["data"]["data"][0]["name"], "2");
}

#[tokio::test]
async fn test_field_catalog_and_sort_options() {
    let server = start_server().await;

    let response = send(
        server.addr,
        "GET",
        "/api/method/get_filterable_fields?doctype=HD+Ticket",
        Some(AGENT),
        None,
    )
    .await;
    assert_eq!(response.status, 200, "{}", response.body);
    let fields = response.body["data"].as_array().unwrap();
    assert_eq!(fields[fields.len() - 2]["fieldname"], "_assign");
    assert_eq!(fields[fields.len() - 1]["fieldname"], "name");

    let response = send(
        server.addr,
        "GET",
        "/api/method/sort_options?doctype=HD+Ticket",
        Some(AGENT),
        None,
    )
    .await;
    assert_eq!(response.status, 200, "{}", response.body);
    let options = response.body["data"].as_array().unwrap();
    assert!(options.iter().any(|option| option["value"] == "modified"));
}

#[tokio::test]
async fn test_error_statuses() {
    let server = start_server().await;

    // No user header runs as Guest, which holds no roles.
    let response = send(server.addr, "GET", "/api/method/sort_options?doctype=HD+Ticket", None, None).await;
    assert_eq!(response.status, 403);

    let response = send(server.addr, "GET", "/api/method/sort_options?doctype=Nope", Some("Administrator"), None).await;
    assert_eq!(response.status, 404);

    let response = send(server.addr, "GET", "/api/method/sort_options?doctype=Nope", Some(AGENT), None).await;
    assert_eq!(response.status, 404);

    let response = send(server.addr, "POST", "/api/method/get_list_data", Some(AGENT), Some("[1]")).await;
    assert_eq!(response.status, 400);

    let response = send(server.addr, "POST", "/api/method/get_list_data", Some(AGENT), Some("{}")).await;
    assert_eq!(response.status, 400);

    let body = json!({"doctype": "HD Ticket"}).to_string();
    let response = send(server.addr, "POST", "/api/method/get_tickets_list", Some(AGENT), Some(&body)).await;
    assert_eq!(response.status, 400);
    assert!(response.body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("owner"));
}
