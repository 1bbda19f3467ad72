//! HTTP integration tests
//! Each test serves the app on an ephemeral port and drives it with reqwest.

use reqwest::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use timetable::api::{serve, AppState, SharedState};
use timetable::auth::models::RegisterRequest;
use timetable::auth::Claims;
use timetable::config::Config;
use timetable::schedule::{NewClass, Schedule};

struct TestApp {
    base: String,
    state: SharedState,
    client: Client,
    handle: JoinHandle<()>,
    _dir: TempDir,
}

impl TestApp {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.store.users_file = dir.path().join("users.json");
        config.auth.bcrypt_cost = 4;
        config.schedule.sample_classes = 0;

        let state = Arc::new(AppState::new(config, Schedule::new()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server_state = Arc::clone(&state);
        let handle = tokio::spawn(async move {
            let _ = serve(listener, server_state).await;
        });

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base: format!("http://{}", addr),
            state,
            client,
            handle,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn register(&self, login: &str, role: &str) {
        self.state
            .users
            .register(RegisterRequest {
                name: format!("{} name", login),
                group: "G-1".to_string(),
                login: login.to_string(),
                password: "secret".to_string(),
                role: role.to_string(),
            })
            .await
            .unwrap();
    }

    async fn post_form(&self, path: &str, body: &str, cookie: Option<&str>) -> reqwest::Response {
        let mut request = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.to_string());
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        request.send().await.unwrap()
    }

    async fn get(&self, path: &str, cookie: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        request.send().await.unwrap()
    }

    /// Log in over HTTP and return the `token=...` cookie pair
    async fn login(&self, login: &str) -> String {
        let response = self
            .post_form("/login", &format!("login={}&password=secret", login), None)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .expect("login sets a cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn seed_class(&self) -> u64 {
        self.state
            .schedule
            .write()
            .await
            .add(NewClass {
                group_name: "Alpha".to_string(),
                teacher_name: "Anna".to_string(),
                classroom: "101".to_string(),
                date: "2024-09-01".to_string(),
                time: "09:00:00".to_string(),
            })
            .id
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

const NEW_CLASS_FORM: &str =
    "group_name=Beacon&teacher_name=Igor&classroom=202&date=2024-09-05&time=12:00:00";

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::start().await;
    let response = app.get("/api/health", None).await;
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"], "healthy");
}

#[tokio::test]
async fn test_public_pages_render_for_anonymous() {
    let app = TestApp::start().await;
    for path in ["/", "/login", "/register", "/add_class", "/view_schedule", "/search_class", "/statistics"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", path);
    }
}

#[tokio::test]
async fn test_static_files_served() {
    let app = TestApp::start().await;
    let response = app.get("/static/style.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_add_class_without_token_is_unauthorized() {
    let app = TestApp::start().await;
    let response = app.post_form("/add_class", NEW_CLASS_FORM, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.state.schedule.read().await.is_empty());
}

#[tokio::test]
async fn test_add_class_as_student_is_forbidden() {
    let app = TestApp::start().await;
    app.register("sam", "student").await;
    let cookie = app.login("sam").await;

    let response = app.post_form("/add_class", NEW_CLASS_FORM, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.state.schedule.read().await.is_empty());
}

#[tokio::test]
async fn test_add_class_as_teacher() {
    let app = TestApp::start().await;
    app.register("tina", "teacher").await;
    let cookie = app.login("tina").await;

    let response = app.post_form("/add_class", NEW_CLASS_FORM, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Class added successfully!"));

    let page = app.get("/view_schedule", Some(&cookie)).await.text().await.unwrap();
    assert!(page.contains("Beacon"));
    assert!(page.contains("/delete_class"));
}

#[tokio::test]
async fn test_expired_cookie_is_unauthorized_but_pages_still_render() {
    let app = TestApp::start().await;
    let claims = Claims::new("tina", "teacher", AppState::now() - 10);
    let cookie = format!("token={}", app.state.gate.codec().encode(&claims));

    let response = app.post_form("/add_class", NEW_CLASS_FORM, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.get("/view_schedule", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();
    assert!(page.contains("Log in"));
    assert!(!page.contains("/delete_class"));
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let app = TestApp::start().await;
    let claims = Claims::new("ada", "admin", AppState::now() + 60);
    let token = app.state.gate.codec().encode(&claims);

    let response = app
        .client
        .post(app.url("/add_class"))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .bearer_auth(token)
        .body(NEW_CLASS_FORM)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.state.schedule.read().await.len(), 1);
}

#[tokio::test]
async fn test_delete_class() {
    let app = TestApp::start().await;
    let id = app.seed_class().await;
    app.register("ada", "admin").await;
    app.register("sam", "student").await;

    let body = format!("class_id={}", id);

    let response = app.post_form("/delete_class", &body, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let student = app.login("sam").await;
    let response = app.post_form("/delete_class", &body, Some(&student)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.state.schedule.read().await.len(), 1);

    let admin = app.login("ada").await;
    let response = app.post_form("/delete_class", &body, Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/view_schedule");
    assert!(app.state.schedule.read().await.is_empty());
}

#[tokio::test]
async fn test_gate_answers_before_malformed_forms() {
    let app = TestApp::start().await;
    app.register("sam", "student").await;
    app.register("tina", "teacher").await;

    let response = app.post_form("/add_class", "group_name=X", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = app.post_form("/delete_class", "class_id=abc", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let student = app.login("sam").await;
    let response = app.post_form("/delete_class", "", Some(&student)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = app.post_form("/add_class", "group_name=X", Some(&student)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let teacher = app.login("tina").await;
    let response = app.post_form("/add_class", "group_name=X", Some(&teacher)).await;
    assert!(response.status().is_client_error());
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.state.schedule.read().await.is_empty());
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::start().await;
    app.register("tina", "teacher").await;

    let response = app.post_form("/login", "login=tina&password=nope", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert!(response.text().await.unwrap().contains("Invalid login or password"));
}

#[tokio::test]
async fn test_register_flow() {
    let app = TestApp::start().await;
    let form = "name=Bob&group=G-2&login=bob&password=secret&role=student";

    let response = app.post_form("/register", form, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/login");

    let response = app.post_form("/register", form, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("already exists"));

    let response = app
        .post_form("/register", "name=Eve&group=G&login=eve&password=x&role=root", None)
        .await;
    assert!(response.text().await.unwrap().contains("Unknown role"));

    let cookie = app.login("bob").await;
    let page = app.get("/", Some(&cookie)).await.text().await.unwrap();
    assert!(page.contains("Bob (student"));
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::start().await;
    let response = app.post_form("/logout", "", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_search_and_statistics() {
    let app = TestApp::start().await;
    app.seed_class().await;

    let response = app
        .post_form("/search_class", "group_name=Alpha&teacher_name=&classroom=", None)
        .await;
    let page = response.text().await.unwrap();
    assert!(page.contains("Classes found!"));
    assert!(page.contains("Anna"));

    let response = app.post_form("/search_class", "group_name=Nobody", None).await;
    assert!(response.text().await.unwrap().contains("No classes found"));

    let page = app.get("/statistics", None).await.text().await.unwrap();
    assert!(page.contains("<dd>1</dd>"));
}
