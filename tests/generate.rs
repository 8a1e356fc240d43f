use std::fs;
use std::path::Path;

use course_catalog::config::ApiConfig;
use course_catalog::Site;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "ssr-secret";

fn intro_response() -> Value {
    json!({
        "data": [{
            "id": 1,
            "attributes": {
                "header": "Intro",
                "description": "# Hi",
                "publishedAt": "2023-01-15T00:00:00Z",
                "cover": { "data": { "attributes": { "formats": {
                    "medium": { "url": "/a.jpg", "width": 100, "height": 50 }
                } } } }
            }
        }],
        "meta": {},
        "error": null
    })
}

fn course(id: u64, header: &str) -> Value {
    json!({
        "id": id,
        "attributes": {
            "header": header,
            "description": format!("About **{header}**"),
            "publishedAt": "2023-02-01T09:30:00.000Z",
            "cover": { "data": { "attributes": { "formats": {
                "medium": { "url": format!("/uploads/medium_{id}.jpg"), "width": 750, "height": 422 }
            } } } }
        }
    })
}

async fn content_api(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .and(query_param("populate", "*"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn api_for(server: &MockServer) -> ApiConfig {
    ApiConfig::new(Some(&format!("{}/api", server.uri())), Some(TOKEN)).unwrap()
}

fn read(public: &Path, file: &str) -> String {
    fs::read_to_string(public.join(file)).unwrap()
}

#[tokio::test]
async fn renders_single_course_end_to_end() {
    let server = content_api(200, intro_response()).await;
    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();

    let report = site.generate(&api_for(&server)).await.unwrap();
    assert_eq!(report.courses, 1);

    let index = read(&site.public_dir, "index.html");
    assert_eq!(index.matches(r#"class="course-card""#).count(), 1);
    assert!(index.contains(r#"<h2 class="course-card__header">Intro</h2>"#));
    assert!(index.contains("<h1>Hi</h1>"));
    assert!(index.contains(r#"src="http://localhost:1337/a.jpg" width="100" height="50""#));
    assert!(index.contains(r#"alt="Cover for Intro""#));
    assert!(index.contains(r#"href="/course/1""#));
    assert!(index.contains("Sun Jan 15 2023"));
    assert!(index.contains("<title>Courses</title>"));
    assert!(index.contains(r#"<link rel="icon" href="/favicon.ico">"#));

    let detail = read(&site.public_dir, "course/1/index.html");
    assert!(detail.contains("<title>Intro | Courses</title>"));
    assert!(detail.contains("<h1>Hi</h1>"));

    let data: Value = serde_json::from_str(&read(&site.public_dir, "courses.json")).unwrap();
    assert_eq!(data["courses"][0]["attributes"]["description"], "<h1>Hi</h1>\n");
    assert_eq!(data["meta"], json!({}));
}

#[tokio::test]
async fn card_count_matches_course_count() {
    let courses: Vec<Value> = (1..=5).map(|id| course(id, &format!("Course {id}"))).collect();
    let server = content_api(
        200,
        json!({ "data": courses, "meta": { "pagination": { "total": 5 } } }),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();

    let report = site.generate(&api_for(&server)).await.unwrap();
    assert_eq!(report.courses, 5);

    let index = read(&site.public_dir, "index.html");
    assert_eq!(index.matches(r#"class="course-card""#).count(), 5);
    for id in 1..=5 {
        assert!(index.contains(&format!(r#"href="/course/{id}""#)));
        assert!(site.public_dir.join(format!("course/{id}/index.html")).is_file());
    }
    assert!(index.contains("<strong>Course 3</strong>"));
    assert!(index.contains("Wed Feb 01 2023"));
}

#[tokio::test]
async fn error_envelope_renders_empty_page() {
    let server = content_api(
        500,
        json!({
            "data": null,
            "error": { "status": 500, "name": "InternalServerError", "message": "boom" }
        }),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();

    let report = site.generate(&api_for(&server)).await.unwrap();
    assert_eq!(report.courses, 0);

    let index = read(&site.public_dir, "index.html");
    assert_eq!(index.matches(r#"class="course-card""#).count(), 0);
    assert!(index.contains(r#"<div class="courses">"#));

    let data: Value = serde_json::from_str(&read(&site.public_dir, "courses.json")).unwrap();
    assert_eq!(data, json!({ "courses": [], "meta": {} }));
}

#[tokio::test]
async fn unauthorized_envelope_ignores_payload() {
    let server = content_api(
        401,
        json!({
            "data": [{ "id": 1, "attributes": { "header": "hidden" } }],
            "meta": { "pagination": { "total": 1 } },
            "error": { "status": 401, "name": "UnauthorizedError" }
        }),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();

    let report = site.generate(&api_for(&server)).await.unwrap();
    assert_eq!(report.courses, 0);
    assert!(!read(&site.public_dir, "index.html").contains("hidden"));
}

#[tokio::test]
async fn missing_cover_uses_placeholder() {
    let server = content_api(
        200,
        json!({
            "data": [{
                "id": 9,
                "attributes": {
                    "header": "No cover",
                    "description": "text",
                    "publishedAt": "2023-01-15T00:00:00Z",
                    "cover": { "data": null }
                }
            }],
            "meta": {}
        }),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();

    site.generate(&api_for(&server)).await.unwrap();

    let index = read(&site.public_dir, "index.html");
    assert!(index.contains(r#"src="/images/placeholder.svg" width="750" height="500""#));
    assert!(site.public_dir.join("images/placeholder.svg").is_file());
}

#[tokio::test]
async fn site_config_controls_media_host_and_timezone() {
    let server = content_api(200, intro_response()).await;
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("_config.yml"),
        "title: Academy\nmedia_host: https://cdn.example.com\ntimezone: America/New_York\npublic_dir: dist\n",
    )
    .unwrap();
    let site = Site::new(dir.path()).unwrap();

    site.generate(&api_for(&server)).await.unwrap();

    let index = fs::read_to_string(dir.path().join("dist/index.html")).unwrap();
    assert!(index.contains("<title>Academy</title>"));
    assert!(index.contains(r#"src="https://cdn.example.com/a.jpg""#));
    assert!(index.contains("Sat Jan 14 2023"));
}

#[tokio::test]
async fn transport_failure_fails_the_build() {
    // Nothing listens on a port we just released
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let api = ApiConfig::new(Some(&format!("http://127.0.0.1:{port}/api")), Some(TOKEN)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();

    let err = site.generate(&api).await.unwrap_err();
    assert!(format!("{err:#}").contains("failed to fetch courses"));
    assert!(!site.public_dir.exists());
}

#[tokio::test]
async fn undecodable_body_fails_the_build() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();

    let err = site.generate(&api_for(&server)).await.unwrap_err();
    assert!(format!("{err:#}").contains("failed to decode response"));
    assert!(!site.public_dir.join("index.html").exists());
}

#[tokio::test]
async fn rebuild_after_error_envelope_drops_old_course_pages() {
    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();

    let first = content_api(200, intro_response()).await;
    site.generate(&api_for(&first)).await.unwrap();
    assert!(site.public_dir.join("course/1/index.html").is_file());

    let second = content_api(
        500,
        json!({ "data": null, "error": { "status": 500, "name": "InternalServerError" } }),
    )
    .await;
    let report = site.generate(&api_for(&second)).await.unwrap();

    assert_eq!(report.courses, 0);
    assert!(!site.public_dir.join("course/1").exists());
    assert!(!read(&site.public_dir, "index.html").contains("Intro"));
}

#[tokio::test]
async fn bad_cover_falls_back_to_placeholder_without_losing_courses() {
    let mut no_media = course(2, "No media");
    no_media["attributes"]["cover"] = json!({ "data": { "id": 4 } });
    let mut no_size = course(3, "No size");
    no_size["attributes"]["cover"] =
        json!({ "data": { "attributes": { "formats": { "medium": { "url": "/x.jpg" } } } } });

    let server = content_api(
        200,
        json!({ "data": [course(1, "Good"), no_media, no_size], "meta": {} }),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();

    let report = site.generate(&api_for(&server)).await.unwrap();
    assert_eq!(report.courses, 3);

    let index = read(&site.public_dir, "index.html");
    assert!(index.contains(r#"src="http://localhost:1337/uploads/medium_1.jpg""#));
    assert_eq!(index.matches(r#"src="/images/placeholder.svg""#).count(), 2);
}
