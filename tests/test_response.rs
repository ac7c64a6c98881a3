use herald::http::response::{Body, Cookie, Response, ResponseBuilder};

#[test]
fn test_builder_basic() {
    let response = ResponseBuilder::new(200).body("Hello, World!").build();

    assert_eq!(response.status(), 200);
    assert!(matches!(response.body(), Body::InMemory(b) if &b[..] == b"Hello, World!"));
    assert!(!response.is_cacheable());
    assert!(!response.close_connection());
}

#[test]
fn test_builder_with_headers() {
    let response = ResponseBuilder::new(200)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body("test")
        .build();

    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(response.header("X-Custom"), Some("value"));
    assert_eq!(response.header("Missing"), None);
}

#[test]
fn test_header_last_write_wins_keeps_position() {
    let response = ResponseBuilder::new(200)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-cache")
        .header("Content-Type", "application/json")
        .build();

    let headers = response.headers();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0].0, "Content-Type");
    assert_eq!(headers[0].1, "application/json");
    assert_eq!(headers[1].0, "Cache-Control");
}

#[test]
fn test_set_header_replaces_value() {
    let mut response = ResponseBuilder::new(200).header("X-Trace", "a").build();
    response.set_header("X-Trace", "b");

    assert_eq!(response.headers().len(), 1);
    assert_eq!(response.header("X-Trace"), Some("b"));
}

#[test]
fn test_expiry_controls_cacheability() {
    assert!(!ResponseBuilder::new(200).build().is_cacheable());
    assert!(ResponseBuilder::new(200).expiry(0).build().is_cacheable());
    assert!(ResponseBuilder::new(200).expiry(3600).build().is_cacheable());
    assert!(!ResponseBuilder::new(200).expiry(-5).build().is_cacheable());
}

#[test]
fn test_file_body_replaces_in_memory_body() {
    let response = ResponseBuilder::new(200)
        .body("ignored")
        .send_file("/var/www/index.html")
        .build();

    assert!(matches!(response.body(), Body::File(p) if p.to_str() == Some("/var/www/index.html")));
}

#[test]
fn test_cookie_line_basic() {
    let cookie = Cookie::new("session", "abc123");
    let response = ResponseBuilder::new(200).cookie(cookie).build();

    assert_eq!(response.cookies().len(), 1);
    assert_eq!(response.cookies()[0].name, "session");
}

#[test]
fn test_ok_helper() {
    let response = Response::ok("test content");

    assert_eq!(response.status(), 200);
    assert!(matches!(response.body(), Body::InMemory(b) if &b[..] == b"test content"));
}

#[test]
fn test_not_found_helper() {
    let response = Response::not_found();

    assert_eq!(response.status(), 404);
    assert!(matches!(response.body(), Body::InMemory(b) if &b[..] == b"404 Not Found"));
}

#[test]
fn test_redirect_helper() {
    let response = Response::redirect("/login");

    assert_eq!(response.status(), 302);
    assert_eq!(response.header("Location"), Some("/login"));
}
