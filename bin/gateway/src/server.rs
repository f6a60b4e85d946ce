//! The CCIP-Read HTTP surface.
//!
//! Two forms of the same endpoint, per EIP-3668: a templated-URL GET
//! (`/{sender}/{data}.json`) and a POST to the root with a JSON body. Both
//! return the identical `{"data": "0x..."}` schema on success and a JSON
//! `{"message": "..."}` with a classifying status on failure.

use crate::{
    config::GatewayConfig,
    envelope::{decode_request, DataResponse, LookupBody},
    errors::GatewayError,
    service::ProofService,
};
use actix_web::{web, App, HttpResponse, HttpServer};
use alloy_primitives::hex;
use serde::Serialize;
use tracing::{info, warn};

/// The JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Human-readable failure reason.
    message: String,
}

/// Binds and runs the HTTP server until shutdown.
pub(crate) async fn serve(cfg: &GatewayConfig, service: ProofService) -> std::io::Result<()> {
    let data = web::Data::new(service);
    info!(target: "gateway", addr = %cfg.addr, port = cfg.port, "gateway listening");
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/", web::post().to(handle_post))
            .route("/{sender}/{data}.json", web::get().to(handle_get))
    })
    .bind((cfg.addr.as_str(), cfg.port))?
    .run()
    .await
}

async fn handle_get(
    service: web::Data<ProofService>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (sender, data) = path.into_inner();
    respond(&service, &sender, &data).await
}

async fn handle_post(
    service: web::Data<ProofService>,
    body: web::Json<LookupBody>,
) -> HttpResponse {
    respond(&service, &body.sender, &body.data).await
}

/// The shared request path: decode, execute, encode, classify failures.
async fn respond(service: &ProofService, sender: &str, data: &str) -> HttpResponse {
    let request = match decode_request(sender, data) {
        Ok(request) => request,
        Err(e) => return failure(GatewayError::from(e)),
    };
    match service.execute(request).await {
        Ok(payload) => {
            HttpResponse::Ok().json(DataResponse { data: hex::encode_prefixed(&payload) })
        }
        Err(e) => failure(e),
    }
}

fn failure(err: GatewayError) -> HttpResponse {
    let status = err.status();
    if status.is_server_error() {
        warn!(target: "gateway", %err, "request failed");
    }
    HttpResponse::build(status).json(ErrorBody { message: err.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cli::Cli, config::GatewayConfig};
    use actix_web::{http::StatusCode, test};
    use clap::Parser;

    /// A service wired to unreachable upstreams; decode-stage failures must
    /// short-circuit before anything would touch them.
    fn offline_service() -> ProofService {
        let cli = Cli::try_parse_from([
            "spyglass",
            "--l1-rpc-url",
            "http://127.0.0.1:1",
            "--l2-rpc-url",
            "http://127.0.0.1:1",
            "--oracle-address",
            "0xdfe97868233d1aa22e815a266982f2cf17685a27",
        ])
        .unwrap();
        ProofService::new(&GatewayConfig::from_cli(cli).unwrap()).unwrap()
    }

    #[actix_web::test]
    async fn get_with_unknown_selector_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_service()))
                .route("/{sender}/{data}.json", web::get().to(handle_get)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/0x226159d592e2b063810a10ebf6dcbada94ed68b8/0xdeadbeef.json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn post_with_malformed_data_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_service()))
                .route("/", web::post().to(handle_post)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/")
            .set_json(serde_json::json!({
                "sender": "0x226159d592e2b063810a10ebf6dcbada94ed68b8",
                "data": "0x01"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
