//! HTTP routes
//!
//! | method | path       | request            |
//! |--------|------------|--------------------|
//! | GET    | `/`        | `Index`            |
//! | GET    | `/captcha` | `ShowCaptcha`      |
//! | POST   | `/captcha` | `SubmitAnswer`     |
//! | POST   | `/submit`  | `SubmitAnswer`     |
//! | GET    | `/assign`  | `ShowAssign`       |
//!
//! Anything else is redirected to `/`. The controller runs on tokio's
//! blocking pool, since a file-backed session store does synchronous I/O.

use crate::cookie::{CookieSigner, COOKIE_NAME};
use crate::render::HtmlRenderer;
use gate_flow::{FlowController, RenderSink, Request};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error};
use warp::http::header::{
    HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, SET_COOKIE,
    X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
};
use warp::http::{StatusCode, Uri};
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Largest accepted form body
pub const MAX_FORM_BYTES: u64 = 4 * 1024;

/// Submitted captcha form; a missing field counts as an empty answer
#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    /// Raw `col-row` text as typed
    #[serde(default)]
    pub captcha_answer: String,
}

/// Shared request state
#[derive(Debug)]
pub struct App {
    controller: FlowController,
    cookies: CookieSigner,
    renderer: HtmlRenderer,
    secure_cookies: bool,
}

impl App {
    /// Bundle the controller with cookie signing
    pub fn new(controller: FlowController, cookies: CookieSigner, secure_cookies: bool) -> Self {
        Self {
            controller,
            cookies,
            renderer: HtmlRenderer::new(),
            secure_cookies,
        }
    }

    /// The flow controller behind every route
    #[inline]
    #[must_use]
    pub fn controller(&self) -> &FlowController {
        &self.controller
    }

    /// The cookie signer
    #[inline]
    #[must_use]
    pub fn cookies(&self) -> &CookieSigner {
        &self.cookies
    }

    /// Run one request through the controller and build the HTML reply
    pub fn respond(&self, cookie: Option<&str>, request: Request) -> Response {
        let presented = cookie.and_then(|value| self.cookies.decode(value));
        if cookie.is_some() && presented.is_none() {
            debug!("rejected unsigned or tampered session cookie");
        }

        let response = self.controller.handle(presented.as_ref(), request);
        let mut reply = warp::reply::html(self.renderer.render(&response.view)).into_response();

        if presented != Some(response.session_id) {
            let header = self.cookies.set_cookie(&response.session_id, self.secure_cookies);
            match HeaderValue::from_str(&header) {
                Ok(value) => {
                    reply.headers_mut().insert(SET_COOKIE, value);
                }
                Err(e) => error!(error = %e, "could not encode session cookie"),
            }
        }
        reply
    }
}

/// Headers added to every response
pub fn security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'none'; style-src 'unsafe-inline'; form-action 'self'; frame-ancestors 'none'",
        ),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("strict-origin-when-cross-origin"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers
}

fn with_app(app: Arc<App>) -> impl Filter<Extract = (Arc<App>,), Error = Infallible> + Clone {
    warp::any().map(move || app.clone())
}

fn answer_form() -> impl Filter<Extract = (AnswerForm,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_FORM_BYTES).and(warp::body::form())
}

/// Run [`App::respond`] on the blocking pool; stores may do file I/O.
async fn serve(
    app: Arc<App>,
    cookie: Option<String>,
    request: Request,
) -> Result<Response, Rejection> {
    match tokio::task::spawn_blocking(move || app.respond(cookie.as_deref(), request)).await {
        Ok(reply) => Ok(reply),
        Err(e) => {
            error!(error = %e, "request handler panicked");
            Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

/// All gate routes plus the redirect fallback, with security headers
pub fn routes(app: Arc<App>) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let session = warp::cookie::optional(COOKIE_NAME);

    let index = warp::path::end()
        .and(warp::get())
        .and(with_app(app.clone()))
        .and(session)
        .and_then(|app: Arc<App>, cookie: Option<String>| serve(app, cookie, Request::Index));

    let show_captcha = warp::path!("captcha")
        .and(warp::get())
        .and(with_app(app.clone()))
        .and(session)
        .and_then(|app: Arc<App>, cookie: Option<String>| {
            serve(app, cookie, Request::ShowCaptcha)
        });

    let submit = warp::path!("captcha")
        .or(warp::path!("submit"))
        .unify()
        .and(warp::post())
        .and(with_app(app.clone()))
        .and(session)
        .and(answer_form())
        .and_then(|app: Arc<App>, cookie: Option<String>, form: AnswerForm| {
            serve(app, cookie, Request::SubmitAnswer(form.captcha_answer))
        });

    let assign = warp::path!("assign")
        .and(warp::get())
        .and(with_app(app))
        .and(session)
        .and_then(|app: Arc<App>, cookie: Option<String>| {
            serve(app, cookie, Request::ShowAssign)
        });

    let fallback = warp::any().map(|| warp::redirect::found(Uri::from_static("/")).into_response());

    index
        .or(show_captcha)
        .unify()
        .or(submit)
        .unify()
        .or(assign)
        .unify()
        .or(fallback)
        .unify()
        .with(warp::reply::with::headers(security_headers()))
}
