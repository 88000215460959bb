// # dyndns-http
//
// HTTP transport for the DynDNS responder.
//
// Maps an incoming `/nic/update` request onto an `UpdateRequest`, hands it
// to the shared `DynDnsResponder`, and writes the single-line protocol answer
// back as `text/plain`. All protocol decisions live in `dyndns-core`; this
// crate only moves bytes.

use axum::extract::{ConnectInfo, Query, Request, State};
use axum::http::{header, HeaderMap, HeaderName, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use dyndns_core::{DynDnsResponder, UpdateRequest};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Path of the DynDNS update endpoint
pub const UPDATE_PATH: &str = "/nic/update";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Build the router serving [`UPDATE_PATH`]
///
/// The route accepts every method so that non-GET requests get the
/// protocol's `badagent` answer instead of a framework 405.
pub fn router(responder: Arc<DynDnsResponder>) -> Router {
    Router::new()
        .route(UPDATE_PATH, any(nic_update))
        .with_state(responder)
}

/// Serve `router` on `listener` until `shutdown` resolves
///
/// In-flight requests are allowed to finish after `shutdown` fires.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, path = UPDATE_PATH, "DynDNS endpoint listening");
    }

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}

async fn nic_update(State(responder): State<Arc<DynDnsResponder>>, request: Request) -> Response {
    let update = update_request(request);
    let response = responder.respond(update).await;

    (
        response.status,
        [(header::CONTENT_TYPE, TEXT_PLAIN)],
        response.body(),
    )
        .into_response()
}

/// Extract the transport-independent view of an update request
fn update_request(request: Request) -> UpdateRequest {
    let (parts, _body) = request.into_parts();

    let mut update = UpdateRequest::new(parts.method);

    // Absent when served without connect-info (e.g., router tests)
    if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
        update = update.with_remote_addr(*addr);
    }
    if let Some(user_agent) = header_str(&parts.headers, header::USER_AGENT) {
        update = update.with_user_agent(user_agent);
    }
    if let Some(authorization) = header_str(&parts.headers, header::AUTHORIZATION) {
        update = update.with_authorization(authorization);
    }

    let params = query_params(&parts.uri);
    if let Some(hostname) = first_param(&params, "hostname") {
        update = update.with_hostname(hostname);
    }
    if let Some(myip) = first_param(&params, "myip") {
        update = update.with_myip(myip);
    }

    update
}

/// Non-UTF-8 header values are treated as absent
fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Decoded query pairs; an unparseable query yields none
fn query_params(uri: &Uri) -> Vec<(String, String)> {
    match Query::<Vec<(String, String)>>::try_from_uri(uri) {
        Ok(Query(params)) => params,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unparseable query string");
            Vec::new()
        }
    }
}

fn first_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
