#![forbid(unsafe_code)]

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post, put};
use axum::Router;
use showready_store::{
    AccessDirectory, AccessGuard, ChecklistStore, Db, OverlayStore, TemplateApplier,
    TemplateStore,
};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod http;
pub mod services;

pub use config::{validate_startup_config, ApiConfig};

pub const CRATE_NAME: &str = "showready-server";

#[derive(Clone)]
pub struct AppState {
    pub checklists: ChecklistStore,
    pub templates: TemplateStore,
    pub applier: TemplateApplier,
    pub overlay: OverlayStore,
    pub guard: AccessGuard,
    pub directory: Arc<dyn AccessDirectory>,
    pub api: ApiConfig,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(db: Db, directory: Arc<dyn AccessDirectory>) -> Self {
        Self::with_config(db, directory, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(db: Db, directory: Arc<dyn AccessDirectory>, api: ApiConfig) -> Self {
        let checklists = ChecklistStore::new(db.clone());
        let templates = TemplateStore::new(db.clone());
        let applier = TemplateApplier::new(templates.clone(), checklists.clone());
        Self {
            checklists,
            templates,
            applier,
            overlay: OverlayStore::new(db),
            guard: AccessGuard::new(directory.clone()),
            directory,
            api,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.api.max_body_bytes;
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route(
            "/checklist/templates",
            get(http::template_endpoints::list_templates_handler)
                .post(http::template_endpoints::create_template_handler),
        )
        .route(
            "/checklist/templates/:id",
            patch(http::template_endpoints::update_template_handler)
                .delete(http::template_endpoints::delete_template_handler),
        )
        .route(
            "/checklist/:id",
            get(http::checklist_endpoints::aggregate_handler)
                .patch(http::checklist_endpoints::update_main_fields_handler),
        )
        .route(
            "/checklist/:id/apply-templates",
            post(http::template_endpoints::apply_templates_handler),
        )
        .route(
            "/checklist/:id/flights",
            post(http::checklist_endpoints::create_flight_handler),
        )
        .route(
            "/checklist/flights/:id",
            patch(http::checklist_endpoints::update_flight_handler)
                .delete(http::checklist_endpoints::delete_flight_handler),
        )
        .route(
            "/checklist/:id/hotels",
            post(http::checklist_endpoints::create_hotel_handler),
        )
        .route(
            "/checklist/hotels/:id",
            patch(http::checklist_endpoints::update_hotel_handler)
                .delete(http::checklist_endpoints::delete_hotel_handler),
        )
        .route(
            "/checklist/:id/car-rentals",
            post(http::checklist_endpoints::create_car_rental_handler),
        )
        .route(
            "/checklist/car-rentals/:id",
            patch(http::checklist_endpoints::update_car_rental_handler)
                .delete(http::checklist_endpoints::delete_car_rental_handler),
        )
        .route(
            "/checklist/:id/booth-shipping",
            post(http::checklist_endpoints::create_booth_shipping_handler),
        )
        .route(
            "/checklist/booth-shipping/:id",
            patch(http::checklist_endpoints::update_booth_shipping_handler)
                .delete(http::checklist_endpoints::delete_booth_shipping_handler),
        )
        .route(
            "/checklist/:id/custom-items",
            get(http::checklist_endpoints::list_custom_items_handler)
                .post(http::checklist_endpoints::create_custom_item_handler),
        )
        .route(
            "/checklist/custom-items/:id",
            patch(http::checklist_endpoints::update_custom_item_handler)
                .delete(http::checklist_endpoints::delete_custom_item_handler),
        )
        .route(
            "/user-checklist/:event_id",
            get(http::overlay_endpoints::list_overlay_handler),
        )
        .route(
            "/user-checklist/:event_id/stats",
            get(http::overlay_endpoints::overlay_stats_handler),
        )
        .route(
            "/user-checklist/:event_id/item/:item_type",
            put(http::overlay_endpoints::set_completion_handler)
                .delete(http::overlay_endpoints::delete_overlay_item_handler),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
