//! Backend da oficina de tapeçaria: CRUD das entidades e relatórios.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod services;

pub use common::error::AppError;
pub use config::{AppState, Config};

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{docs::ApiDoc, handlers::entities};

pub const WELCOME_MESSAGE: &str = "Bienvenido a la API de Servicios de Tapiceria Automotriz";

async fn root() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

/// Monta o router completo da aplicação.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(|| async { "OK" }))
        .merge(entity_routes())
        .nest("/analytics", analytics_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

fn entity_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/clientes/",
            post(entities::clientes::create).get(entities::clientes::list),
        )
        .route("/clientes/bulk/", post(entities::clientes::create_bulk))
        .route(
            "/empleados/",
            post(entities::empleados::create).get(entities::empleados::list),
        )
        .route("/empleados/bulk/", post(entities::empleados::create_bulk))
        .route(
            "/proveedores/",
            post(entities::proveedores::create).get(entities::proveedores::list),
        )
        .route("/proveedores/bulk/", post(entities::proveedores::create_bulk))
        .route(
            "/productos/",
            post(entities::productos::create).get(entities::productos::list),
        )
        .route("/productos/bulk/", post(entities::productos::create_bulk))
        .route(
            "/servicios/",
            post(entities::servicios::create).get(entities::servicios::list),
        )
        .route("/servicios/bulk/", post(entities::servicios::create_bulk))
        .route(
            "/facturas/",
            post(entities::facturas::create).get(entities::facturas::list),
        )
        .route("/facturas/bulk/", post(entities::facturas::create_bulk))
}

fn analytics_routes() -> Router<AppState> {
    use handlers::analytics::*;

    Router::new()
        .route("/cliente-gastos", get(client_spending))
        .route("/ranking-empleados", get(employee_ranking))
        .route("/servicios-periodo", get(services_in_period))
        .route("/proveedor-productos", get(supplier_products))
        .route("/tendencias-mensuales", get(monthly_trends))
        .route("/clientes-frecuentes", get(frequent_clients))
        .route("/rentabilidad-servicios", get(service_profitability))
        .route("/stock-critico", get(critical_stock))
        .route("/tendencias-estacionales", get(seasonal_trends))
        .route("/retencion-clientes", get(customer_retention))
        .route("/comparativa-precios", get(price_comparison))
        .route("/eficiencia-empleados", get(employee_efficiency))
        .route("/servicios-por-empleado", get(employee_service_breakdown))
        .route("/rendimiento-diario", get(daily_performance))
        .route("/metodos-pago", get(payment_methods))
}
