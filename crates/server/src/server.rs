use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::extract::CookieJar;
use report::Branding;

use std::sync::Arc;

use crate::{
    ServerError, auth, income, reports, summary, tickets,
    uploads::{self, UploadStore},
    users,
};
use engine::{Engine, EngineError, User};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "staffbook_session";

/// Uploads are sent base64 encoded inside JSON.
const UPLOAD_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Everything the server needs besides the engine.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub branding: Branding,
    pub uploads: UploadStore,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            branding: Branding::default(),
            uploads: UploadStore::new("uploads", "/uploads"),
            secure_cookies: false,
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub branding: Arc<Branding>,
    pub uploads: Arc<UploadStore>,
    pub secure_cookies: bool,
}

/// The authenticated caller of a request, inserted by `require_session`.
#[derive(Clone, Debug)]
pub struct Caller {
    pub user: User,
    pub token: String,
}

async fn require_session(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Err(EngineError::Unauthorized("not logged in".to_string()).into());
    };
    let token = cookie.value().to_string();
    let user = state.engine.authenticate(&token).await?;

    request.extensions_mut().insert(Caller { user, token });
    Ok(next.run(request).await)
}

pub fn router(engine: Engine, options: ServerOptions) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        branding: Arc::new(options.branding),
        uploads: Arc::new(options.uploads),
        secure_cookies: options.secure_cookies,
    };

    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    Router::new()
        .route("/auth/password", post(auth::change_password))
        .route("/income", get(income::list).post(income::create))
        .route("/income/my", get(income::my))
        .route("/income/all", get(income::all))
        .route(
            "/income/{id}",
            patch(income::update).delete(income::delete),
        )
        .route("/tickets", get(tickets::list).post(tickets::create))
        .route("/tickets/my", get(tickets::my))
        .route("/tickets/all", get(tickets::all))
        .route(
            "/tickets/{id}",
            patch(tickets::update).delete(tickets::delete),
        )
        .route("/users", get(users::list))
        .route("/summary", get(summary::get))
        .route("/reports/pdf", get(reports::pdf))
        .route("/reports/income.csv", get(reports::income_csv))
        .route("/reports/tickets.csv", get(reports::tickets_csv))
        .route(
            "/uploads",
            post(uploads::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/uploads/{name}", get(uploads::download))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
        .merge(public)
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, options)).await
}
