//! Tests for static file resolution

use turnstile::http::files::FileResponder;
use turnstile::http::response::{ResponseOutcome, StatusCode};

mod common;

use common::TestDir;

#[tokio::test]
async fn test_root_serves_index() {
    let dir = TestDir::new();
    dir.write("index.html", b"<h1>hello</h1>");
    let files = FileResponder::new(dir.path());

    for path in ["/", "/index.html"] {
        match files.resolve(path).await {
            ResponseOutcome::Ok {
                content_type,
                content_length,
                ..
            } => {
                assert_eq!(content_type, "text/html");
                assert_eq!(content_length, 14);
            }
            other => panic!("unexpected outcome for {}: {:?}", path, other),
        }
    }
}

#[tokio::test]
async fn test_missing_index_is_not_found() {
    let dir = TestDir::new();
    let files = FileResponder::new(dir.path());

    assert!(matches!(files.resolve("/").await, ResponseOutcome::NotFound));
}

#[tokio::test]
async fn test_redirect_route() {
    let dir = TestDir::new();
    // Even an existing file named "301" does not shadow the route.
    dir.write("301", b"file");

    let files = FileResponder::new(dir.path());
    assert!(matches!(
        files.resolve("/301").await,
        ResponseOutcome::Redirect { location: None }
    ));

    let files = files.with_redirect_location(Some("/index.html".to_string()));
    match files.resolve("/301").await {
        ResponseOutcome::Redirect { location } => assert_eq!(location.as_deref(), Some("/index.html")),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_content_types_by_extension() {
    let dir = TestDir::new();
    dir.write("picture.gif", b"GIF89a");
    dir.write("photo.jpeg", b"\xff\xd8\xff");
    dir.write("notes.txt", b"notes");
    dir.write("page.html", b"<p>");
    let files = FileResponder::new(dir.path());

    let cases = [
        ("/picture.gif", "image/gif", 6),
        ("/photo.jpeg", "image/jpeg", 3),
        ("/notes.txt", "text/plain", 5),
        ("/page.html", "text/plain", 3),
    ];

    for (path, expected_type, expected_len) in cases {
        match files.resolve(path).await {
            ResponseOutcome::Ok {
                content_type,
                content_length,
                ..
            } => {
                assert_eq!(content_type, expected_type, "{}", path);
                assert_eq!(content_length, expected_len, "{}", path);
            }
            other => panic!("unexpected outcome for {}: {:?}", path, other),
        }
    }
}

#[tokio::test]
async fn test_nested_file() {
    let dir = TestDir::new();
    dir.write("docs/guide/intro.txt", b"intro");
    let files = FileResponder::new(dir.path());

    assert_eq!(files.resolve("/docs/guide/intro.txt").await.status(), StatusCode::Ok);
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = TestDir::new();
    let files = FileResponder::new(dir.path());

    assert_eq!(files.resolve("/nonexistent.txt").await.status(), StatusCode::NotFound);
}

#[tokio::test]
async fn test_directory_is_not_found() {
    let dir = TestDir::new();
    dir.write("docs/readme.txt", b"x");
    let files = FileResponder::new(dir.path());

    assert_eq!(files.resolve("/docs").await.status(), StatusCode::NotFound);
    assert_eq!(files.resolve("/docs/").await.status(), StatusCode::NotFound);
}

#[tokio::test]
async fn test_traversal_is_not_found() {
    let outer = TestDir::new();
    outer.write("secret.txt", b"secret");
    outer.write("public/index.html", b"index");
    let files = FileResponder::new(outer.path().join("public"));

    assert_eq!(files.resolve("/index.html").await.status(), StatusCode::Ok);
    assert_eq!(files.resolve("/../secret.txt").await.status(), StatusCode::NotFound);
    assert_eq!(files.resolve("/a/../../secret.txt").await.status(), StatusCode::NotFound);

    let absolute = format!("/{}", outer.path().join("secret.txt").display());
    assert_eq!(files.resolve(&absolute).await.status(), StatusCode::NotFound);
}
