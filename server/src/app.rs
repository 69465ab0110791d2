use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::{Next, from_fn_with_state},
    response::Response,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::server_state::ServerState;

/// Assets under `/frontend/dist`, `index.html` for every other path so the
/// frontend can route `/` and `/reset` itself.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .nest_service("/frontend/dist", ServeDir::new(&state.dist))
        .fallback_service(ServeFile::new(state.dist.join("index.html")))
        .layer(from_fn_with_state(state.clone(), log_visit))
}

async fn log_visit(State(state): State<Arc<ServerState>>, req: Request<Body>, next: Next) -> Response {
    // Assets are fetched along with every page, only count the page itself
    if !req.uri().path().starts_with("/frontend/dist/") {
        let visits = state.record_visit();
        match req.extensions().get::<ConnectInfo<SocketAddr>>() {
            Some(ConnectInfo(addr)) => tracing::debug!("Visit #{} from {}", visits, addr.ip()),
            None => tracing::debug!("Visit #{}", visits),
        }
    }

    next.run(req).await
}
