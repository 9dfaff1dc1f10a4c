use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::store::Store;

/// Health check endpoint
///
/// Reports whether the store answers, with the current timestamp. Always `200`
/// so load balancers can tell a degraded instance from a dead one.
#[get("/health")]
pub async fn health(store: web::Data<dyn Store>) -> impl Responder {
    let (status, database) = match store.ping().await {
        Ok(()) => ("ok", "ok"),
        Err(e) => {
            log::warn!("Health check could not reach the store: {}", e);
            ("degraded", "unavailable")
        }
    };

    HttpResponse::Ok().json(json!({
        "status": status,
        "database": database,
        "timestamp": Utc::now()
    }))
}
