mod responses;
mod routes;


use anyhow::{anyhow, Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, TraceLayer};
use tracing::{info, Level};

use crate::state::State;

pub struct Server {
    socket: TcpListener,
    app: Router,
}

impl Server {
    pub async fn new(state: State) -> Result<Self> {
        let bind_addr = state.cfg.bind_addr().await?;
        let socket = TcpListener::bind(bind_addr)
            .await
            .with_context(|| anyhow!("could not bind to `{bind_addr}`"))?;
        info!(
            "Serving feeds at http://{}{}",
            socket.local_addr().unwrap_or(bind_addr),
            state.cfg.endpoint
        );

        Ok(Self {
            socket,
            app: app(state),
        })
    }

    pub async fn serve(self, cancel: CancellationToken) -> Result<()> {
        axum::serve(self.socket, self.app)
            .with_graceful_shutdown(cancel.cancelled_owned())
            .await
            .context("the HTTP server encountered a failure")
    }
}

pub fn app(state: State) -> Router {
    use axum::routing::get;

    let router = Router::new().route(&state.cfg.endpoint, get(routes::get_feed));

    with_middleware(router).with_state(state)
}

/// Wraps `routes` in the tracing and panic-handling layers every request goes through.
fn with_middleware(routes: Router<State>) -> Router<State> {
    routes.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_request(DefaultOnRequest::new().level(Level::INFO)),
            )
            .layer(CatchPanicLayer::custom(responses::handle_panic)),
    )
}
