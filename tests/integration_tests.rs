use httpmock::prelude::*;
use hypernav::{ClientError, Credential, Headers, Params, Resource};
use serde_json::json;

fn api(server: &MockServer) -> Resource {
    Resource::new(
        format!("{}/api", server.base_url()),
        Credential::basic("user", "name"),
    )
}

#[test]
fn test_get() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/admin/datacenters");
        then.status(200).body("{}");
    });

    let (status, body) = api(&server)
        .child("admin")
        .child("datacenters")
        .get(None, None, None)
        .unwrap();

    mock.assert();
    assert_eq!(status, 200);
    assert!(body.is_some());
}

#[test]
fn test_get_with_id_params_and_headers() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/admin/datacenters/1")
            .query_param("p1", "a")
            .query_param("p2", "b")
            .header("h1", "a");
        then.status(200).body("{}");
    });

    let mut params = Params::new();
    params.insert("p1".to_string(), "a".to_string());
    params.insert("p2".to_string(), "b".to_string());
    let mut headers = Headers::new();
    headers.insert("h1".to_string(), "a".to_string());

    let datacenters = api(&server).child("admin").child("datacenters");
    let (status, _) = datacenters
        .get(Some("1"), Some(&params), Some(&headers))
        .unwrap();

    mock.assert();
    assert_eq!(status, 200);
    // The id affected the single outgoing request only.
    assert!(datacenters.url().ends_with("/api/admin/datacenters"));
}

#[test]
fn test_post_with_data() {
    let server = MockServer::start();
    let data = json!({"id": 1, "name": "test"}).to_string();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/admin/datacenters")
            .body(data.clone());
        then.status(201);
    });

    let (status, body) = api(&server)
        .child("admin")
        .child("datacenters")
        .post(None, None, None, Some(&data))
        .unwrap();

    mock.assert();
    assert_eq!(status, 201);
    assert!(body.is_none());
}

#[test]
fn test_put_with_id_and_data() {
    let server = MockServer::start();
    let data = json!({"name": "renamed"}).to_string();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/admin/datacenters/1")
            .body(data.clone());
        then.status(200).body("{}");
    });

    let (status, _) = api(&server)
        .child("admin")
        .child("datacenters")
        .put(Some("1"), None, None, Some(&data))
        .unwrap();

    mock.assert();
    assert_eq!(status, 200);
}

#[test]
fn test_delete() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/admin/datacenters/1");
        then.status(204);
    });

    let (status, body) = api(&server)
        .child("admin")
        .child("datacenters")
        .delete(Some("1"), None, None)
        .unwrap();

    mock.assert();
    assert_eq!(status, 204);
    assert!(body.is_none());
}

#[test]
fn test_basic_auth_is_attached() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/login")
            // base64("user:name")
            .header("authorization", "Basic dXNlcjpuYW1l");
        then.status(200).body("{}");
    });

    api(&server).child("login").get(None, None, None).unwrap();
    mock.assert();
}

#[test]
fn test_empty_body_is_distinct_from_empty_object() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/empty");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/object");
        then.status(200).body("{}");
    });

    let api = api(&server);

    let (status, body) = api.child("empty").get(None, None, None).unwrap();
    assert_eq!(status, 200);
    assert!(body.is_none());

    let (status, body) = api.child("object").get(None, None, None).unwrap();
    assert_eq!(status, 200);
    let dto = body.unwrap();
    // A `{}` body is a wrapper exposing no collection protocol.
    assert!(dto.len().unwrap_err().is_collection_misuse());
}

#[test]
fn test_malformed_body_is_fatal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/admin/racks");
        then.status(200).body("<dc></dc>");
    });

    let result = api(&server)
        .child("admin")
        .child("racks")
        .post(None, None, None, None);

    assert!(matches!(result.unwrap_err(), ClientError::Json(_)));
}

#[test]
fn test_parent_headers_merge() {
    let server = MockServer::start();
    let credential = Credential::basic("user", "name");
    let mut defaults = Headers::new();
    defaults.insert("h1".to_string(), "a".to_string());

    // Defaults alone.
    let mock = server.mock(|when, then| {
        when.method(POST).path("/a").header("h1", "a");
        then.status(200).body("{}");
    });
    Resource::with_headers(server.url("/a"), credential.clone(), defaults.clone())
        .post(None, None, None, None)
        .unwrap();
    mock.assert();

    // Per-call header wins on collision.
    let mock = server.mock(|when, then| {
        when.method(POST).path("/b").header("h1", "c");
        then.status(200).body("{}");
    });
    let mut headers = Headers::new();
    headers.insert("h1".to_string(), "c".to_string());
    Resource::with_headers(server.url("/b"), credential.clone(), defaults.clone())
        .post(None, None, Some(&headers), None)
        .unwrap();
    mock.assert();

    // Disjoint keys form a union.
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/c")
            .header("h1", "a")
            .header("h2", "b");
        then.status(200).body("{}");
    });
    let mut headers = Headers::new();
    headers.insert("h2".to_string(), "b".to_string());
    Resource::with_headers(server.url("/c"), credential.clone(), defaults.clone())
        .post(None, None, Some(&headers), None)
        .unwrap();
    mock.assert();

    // Both at once.
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/d")
            .header("h1", "c")
            .header("h2", "b");
        then.status(200).body("{}");
    });
    let mut headers = Headers::new();
    headers.insert("h1".to_string(), "c".to_string());
    headers.insert("h2".to_string(), "b".to_string());
    Resource::with_headers(server.url("/d"), credential, defaults)
        .post(None, None, Some(&headers), None)
        .unwrap();
    mock.assert();
}

#[test]
fn test_link_follow_round_trip() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/admin");
        then.status(200).json_body(json!({
            "links": [
                {
                    "rel": "datacenters",
                    "type": "application/vnd.dc+json",
                    "href": server.url("/api/admin/datacenters")
                }
            ]
        }));
    });
    let follow_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/admin/datacenters")
            .header("accept", "application/vnd.dc+json");
        then.status(200).json_body(json!({"collection": []}));
    });

    let (_, admin) = api(&server).child("admin").get(None, None, None).unwrap();
    let datacenters = admin.unwrap().follow("datacenters").unwrap();
    assert_eq!(datacenters.url(), server.url("/api/admin/datacenters"));

    let (status, body) = datacenters.get(None, None, None).unwrap();
    follow_mock.assert();
    assert_eq!(status, 200);
    assert_eq!(body.unwrap().len().unwrap(), 0);
}

#[test]
fn test_collection_over_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/vms");
        then.status(200).json_body(json!({
            "collection": [
                {"name": "vm1"},
                {"name": "vm2"},
                {"name": "vm3"}
            ],
            "totalSize": 3
        }));
    });

    let (_, body) = api(&server).child("vms").get(None, None, None).unwrap();
    let vms = body.unwrap();

    assert_eq!(vms.len().unwrap(), 3);
    assert_eq!(vms.item(1).unwrap().get_str("name").unwrap(), "vm2");
    let names: Vec<String> = vms
        .iter()
        .unwrap()
        .map(|vm| vm.get_str("name").unwrap().to_string())
        .collect();
    assert_eq!(names, ["vm1", "vm2", "vm3"]);
}

#[test]
fn test_error_status_passes_through() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/boom");
        then.status(500).json_body(json!({"error": "boom"}));
    });

    // The client polices nothing: status and body go straight to the caller.
    let (status, body) = api(&server).child("boom").get(None, None, None).unwrap();
    assert_eq!(status, 500);
    assert_eq!(body.unwrap().get_str("error").unwrap(), "boom");
}
