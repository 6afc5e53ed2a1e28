use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    extract::CookieJar,
    headers::{Authorization, authorization::Basic},
};
use chrono::Duration;

use std::sync::Arc;

use crate::{
    auth, categories, costs, dashboard, distributions, funds, nomenclature, receipts, reports,
    sponsors, transfers,
};
use engine::{Engine, EngineError, User};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "fundbook_session";

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Lifetime of the sessions opened at login.
    pub session_ttl: Duration,
}

impl ServerState {
    pub fn new(engine: Engine, session_ttl: Duration) -> Self {
        Self {
            engine: Arc::new(engine),
            session_ttl,
        }
    }
}

/// Resolve the caller from the session cookie, falling back to HTTP Basic
/// credentials.
async fn auth(
    jar: CookieJar,
    basic: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user: Result<User, EngineError> = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.engine.session_user(cookie.value()).await
    } else if let Some(TypedHeader(basic)) = basic {
        state
            .engine
            .authenticate(basic.username(), basic.password())
            .await
    } else {
        Err(EngineError::Unauthorized)
    };

    let user = match user {
        Ok(user) => user,
        Err(EngineError::Unauthorized) => return Err(StatusCode::UNAUTHORIZED),
        Err(err) => {
            tracing::error!("authentication failed: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/sponsors", get(sponsors::list).post(sponsors::create))
        .route(
            "/sponsors/{id}",
            get(sponsors::get)
                .patch(sponsors::update)
                .delete(sponsors::delete),
        )
        .route("/funds", get(funds::list).post(funds::create))
        .route("/funds/unallocated", get(distributions::unallocated))
        .route(
            "/funds/{id}",
            get(funds::get).patch(funds::update).delete(funds::delete),
        )
        .route("/receipts", get(receipts::list).post(receipts::create))
        .route(
            "/receipts/{id}",
            get(receipts::get)
                .patch(receipts::update)
                .delete(receipts::delete),
        )
        .route("/costs", get(costs::list).post(costs::create))
        .route(
            "/costs/{id}",
            get(costs::get).patch(costs::update).delete(costs::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/nomenclature",
            get(nomenclature::list).post(nomenclature::create),
        )
        .route(
            "/nomenclature/{id}",
            get(nomenclature::get)
                .patch(nomenclature::update)
                .delete(nomenclature::delete),
        )
        .route(
            "/manual-fund-distributions",
            get(distributions::list).post(distributions::create),
        )
        .route(
            "/manual-fund-distributions/{id}",
            get(distributions::get)
                .patch(distributions::update)
                .delete(distributions::delete),
        )
        .route(
            "/fund-transfers",
            get(transfers::list).post(transfers::create),
        )
        .route(
            "/fund-transfers/{id}",
            get(transfers::get)
                .patch(transfers::update)
                .delete(transfers::delete),
        )
        .route("/reports/expenses", get(reports::expenses))
        .route("/reports/sponsors", get(reports::sponsors))
        .route("/reports/fund-balance", get(reports::fund_balance))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/activity", get(dashboard::activity))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .merge(protected);

    Router::new().nest("/api", api).with_state(state)
}

pub async fn run(engine: Engine, bind: &str, session_ttl: Duration) {
    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {bind}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, session_ttl, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    session_ttl: Duration,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, session_ttl);
    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    session_ttl: Duration,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, session_ttl, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
