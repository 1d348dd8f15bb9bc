use gate_flow::{
    FlowConfig, FlowController, MemorySessionStore, SessionId, SessionStore, FORMAT_MESSAGE,
    INCORRECT_MESSAGE,
};
use gate_server::{routes, App, CookieSigner};
use gate_test_utils::{ManualClock, ThreadRecordingStore, T0};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;

const SECRET: &[u8] = b"integration-test-secret";
const FORM: &str = "application/x-www-form-urlencoded";

struct Harness {
    app: Arc<App>,
    clock: Arc<ManualClock>,
    store: Arc<MemorySessionStore>,
}

impl Harness {
    fn new(secure_cookies: bool) -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let store = Arc::new(MemorySessionStore::new());
        let controller = FlowController::new(FlowConfig::default(), store.clone())
            .unwrap()
            .with_clock(clock.clone())
            .with_seed(5);
        let app = Arc::new(App::new(
            controller,
            CookieSigner::from_secret(SECRET),
            secure_cookies,
        ));
        Self { app, clock, store }
    }

    async fn get(&self, path: &str, cookie: Option<&str>) -> warp::http::Response<Bytes> {
        let mut req = warp::test::request().method("GET").path(path);
        if let Some(cookie) = cookie {
            req = req.header("cookie", cookie);
        }
        req.reply(&routes(self.app.clone())).await
    }

    async fn post(&self, path: &str, cookie: &str, body: &str) -> warp::http::Response<Bytes> {
        warp::test::request()
            .method("POST")
            .path(path)
            .header("cookie", cookie)
            .header("content-type", FORM)
            .body(body.to_string())
            .reply(&routes(self.app.clone()))
            .await
    }

    fn session(&self, cookie: &str) -> SessionId {
        let value = cookie.trim_start_matches("gate_session=");
        self.app.cookies().decode(value).expect("signed cookie")
    }

    fn answer(&self, cookie: &str) -> String {
        let id = self.session(cookie);
        self.store
            .get(&id)
            .unwrap()
            .unwrap()
            .pending_answer()
            .unwrap()
            .to_string()
    }
}

fn set_cookie(res: &warp::http::Response<Bytes>) -> Option<String> {
    res.headers()
        .get("set-cookie")
        .map(|v| v.to_str().unwrap().to_string())
}

/// `name=value` part of a Set-Cookie header, ready to send back
fn cookie_pair(res: &warp::http::Response<Bytes>) -> String {
    let header = set_cookie(res).expect("Set-Cookie present");
    header.split(';').next().unwrap().to_string()
}

fn body(res: &warp::http::Response<Bytes>) -> String {
    String::from_utf8_lossy(res.body()).into_owned()
}

#[tokio::test]
async fn test_first_visit_queues_and_sets_cookie() {
    let h = Harness::new(false);
    let res = h.get("/", None).await;

    assert_eq!(res.status(), StatusCode::OK);
    let header = set_cookie(&res).unwrap();
    assert!(header.starts_with("gate_session="));
    assert!(header.contains("HttpOnly"));
    assert!(!header.contains("Secure"));
    assert!(body(&res).contains("You are in the queue"));
    assert!(body(&res).contains(r#"http-equiv="refresh""#));

    assert_eq!(res.headers()["x-frame-options"], "DENY");
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert!(res.headers().contains_key("content-security-policy"));
    assert!(res.headers().contains_key("referrer-policy"));
}

#[tokio::test]
async fn test_secure_flag_outside_dev() {
    let h = Harness::new(true);
    let res = h.get("/", None).await;
    assert!(set_cookie(&res).unwrap().ends_with("; Secure"));
}

#[tokio::test]
async fn test_full_walk_to_assign() {
    let h = Harness::new(false);
    let cookie = cookie_pair(&h.get("/", None).await);

    h.clock.advance(20);
    let res = h.get("/captcha", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(set_cookie(&res).is_none());
    let page = body(&res);
    assert!(page.contains(r#"name="captcha_answer""#));
    assert!(page.contains("Find the appropriate box for the letter"));

    let answer = h.answer(&cookie);
    let res = h
        .post("/captcha", &cookie, &format!("captcha_answer={answer}"))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body(&res).contains("Verification complete"));

    let res = h.get("/assign", Some(&cookie)).await;
    assert!(body(&res).contains("Verification complete"));
}

#[tokio::test]
async fn test_assign_before_solving_shows_captcha() {
    let h = Harness::new(false);
    let cookie = cookie_pair(&h.get("/", None).await);
    h.clock.advance(20);

    let res = h.get("/assign", Some(&cookie)).await;
    let page = body(&res);
    assert!(page.contains(r#"name="captcha_answer""#));
    assert!(!page.contains("Verification complete"));
}

#[tokio::test]
async fn test_submit_alias_and_wrong_answer() {
    let h = Harness::new(false);
    let cookie = cookie_pair(&h.get("/", None).await);
    h.clock.advance(20);
    h.get("/captcha", Some(&cookie)).await;

    let wrong = if h.answer(&cookie) == "1-1" { "1-2" } else { "1-1" };
    let res = h
        .post("/submit", &cookie, &format!("captcha_answer={wrong}"))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body(&res).contains(INCORRECT_MESSAGE));
}

#[tokio::test]
async fn test_missing_field_is_a_format_error() {
    let h = Harness::new(false);
    let cookie = cookie_pair(&h.get("/", None).await);
    h.clock.advance(20);
    h.get("/captcha", Some(&cookie)).await;

    let res = h.post("/captcha", &cookie, "").await;
    assert!(body(&res).contains(FORMAT_MESSAGE));

    let res = h.post("/captcha", &cookie, "captcha_answer=9-9").await;
    assert!(body(&res).contains(FORMAT_MESSAGE));
}

#[tokio::test]
async fn test_tampered_cookie_starts_over() {
    let h = Harness::new(false);
    let cookie = cookie_pair(&h.get("/", None).await);
    let id = h.session(&cookie);
    h.clock.advance(20);

    let forged = format!("gate_session={id}.{}", "00".repeat(64));
    let res = h.get("/captcha", Some(&forged)).await;
    assert!(body(&res).contains("You are in the queue"));
    let reissued = cookie_pair(&res);
    assert_ne!(h.session(&reissued), id);
}

#[tokio::test]
async fn test_idle_session_gets_new_cookie() {
    let h = Harness::new(false);
    let cookie = cookie_pair(&h.get("/", None).await);

    h.clock.advance(301);
    let res = h.get("/", Some(&cookie)).await;
    let reissued = cookie_pair(&res);
    assert_ne!(reissued, cookie);
    assert!(body(&res).contains("You are in the queue"));
}

#[tokio::test]
async fn test_unknown_path_redirects_home() {
    let h = Harness::new(false);
    let res = h.get("/admin", None).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "/");
    assert_eq!(res.headers()["x-frame-options"], "DENY");

    // wrong method on a known path
    let res = warp::test::request()
        .method("DELETE")
        .path("/captcha")
        .reply(&routes(h.app.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_session_store_is_used_off_the_runtime_thread() {
    let store = Arc::new(ThreadRecordingStore::new());
    let controller = FlowController::new(FlowConfig::default(), store.clone())
        .unwrap()
        .with_clock(Arc::new(ManualClock::new(T0)))
        .with_seed(5);
    let app = Arc::new(App::new(controller, CookieSigner::from_secret(SECRET), false));

    let res = warp::test::request().path("/").reply(&routes(app.clone())).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = cookie_pair(&res);
    let res = warp::test::request()
        .path("/captcha")
        .header("cookie", cookie)
        .reply(&routes(app))
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let runtime_thread = std::thread::current().id();
    let threads = store.threads();
    assert!(threads.len() >= 4, "store calls: {}", threads.len());
    assert!(threads.iter().all(|t| *t != runtime_thread));
}
