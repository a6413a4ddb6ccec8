use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn accessory_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accessory", get(controller::get_accessory))
        .route("/temperature", get(controller::get_temperature))
        .route("/contact", get(controller::get_contact_state))
        .route("/status", get(controller::get_status))
}
