// src/handlers/analytics.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Datelike;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::{dates::DateRange, db_utils::acquire_connection, error::AppError},
    config::AppState,
    models::analytics::*,
    services::analytics_service::today,
};

// =============================================================================
//  PARÂMETROS
// =============================================================================

fn default_min_servicios() -> u32 {
    3
}
fn default_seis_meses() -> u32 {
    6
}
fn default_doce_meses() -> u32 {
    12
}
fn default_nivel_critico() -> i32 {
    10
}
fn default_treinta_dias() -> u32 {
    30
}
fn default_siete_dias() -> u32 {
    7
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClienteParams {
    /// ID do cliente
    pub cliente_id: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProveedorParams {
    /// ID do fornecedor
    pub proveedor_id: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodoParams {
    /// Início do período (AAAA-MM-DD), inclusive
    #[param(example = "2024-01-01")]
    pub fecha_inicio: String,
    /// Fim do período (AAAA-MM-DD), inclusive
    #[param(example = "2024-01-31")]
    pub fecha_fin: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnioParams {
    /// Ano de referência; o ano corrente quando omitido
    #[serde(rename = "año", alias = "anio")]
    #[validate(range(min = 1900, max = 2200, message = "El año debe estar entre 1900 y 2200"))]
    pub anio: Option<i32>,
}

impl AnioParams {
    fn year(&self) -> i32 {
        self.anio.unwrap_or_else(|| today().year())
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FrecuentesParams {
    #[serde(default = "default_min_servicios")]
    #[validate(range(min = 1, message = "min_servicios debe ser al menos 1"))]
    #[param(default = 3)]
    pub min_servicios: u32,

    #[serde(default = "default_seis_meses")]
    #[validate(range(min = 1, max = 600, message = "periodo_meses debe estar entre 1 y 600"))]
    #[param(default = 6)]
    pub periodo_meses: u32,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RetencionParams {
    #[serde(default = "default_doce_meses")]
    #[validate(range(min = 1, max = 600, message = "periodo_meses debe estar entre 1 y 600"))]
    #[param(default = 12)]
    pub periodo_meses: u32,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MetodosPagoParams {
    #[serde(default = "default_seis_meses")]
    #[validate(range(min = 1, max = 600, message = "periodo_meses debe estar entre 1 y 600"))]
    #[param(default = 6)]
    pub periodo_meses: u32,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockParams {
    #[serde(default = "default_nivel_critico")]
    #[validate(range(min = 0, message = "nivel_critico no puede ser negativo"))]
    #[param(default = 10)]
    pub nivel_critico: i32,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VentanaDiasParams {
    #[serde(default = "default_treinta_dias")]
    #[validate(range(min = 1, max = 3650, message = "dias debe estar entre 1 y 3650"))]
    #[param(default = 30)]
    pub dias: u32,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DiarioParams {
    #[serde(default = "default_siete_dias")]
    #[validate(range(min = 1, max = 3650, message = "dias debe estar entre 1 y 3650"))]
    #[param(default = 7)]
    pub dias: u32,
}

// =============================================================================
//  1. CLIENTES E FUNCIONÁRIOS
// =============================================================================

// GET /analytics/cliente-gastos
#[utoipa::path(
    get,
    path = "/analytics/cliente-gastos",
    tag = "Analytics",
    params(ClienteParams),
    responses(
        (status = 200, description = "Resumen de gastos del cliente", body = ResumenGastoCliente),
        (status = 404, description = "Cliente no encontrado")
    )
)]
pub async fn client_spending(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ClienteParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = acquire_connection(&app_state).await?;

    let report = app_state
        .analytics_service
        .client_spending(&mut *conn, params.cliente_id)
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/ranking-empleados
#[utoipa::path(
    get,
    path = "/analytics/ranking-empleados",
    tag = "Analytics",
    responses(
        (status = 200, description = "Empleados ordenados por ventas", body = ReporteRankingEmpleados)
    )
)]
pub async fn employee_ranking(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .employee_ranking(&mut *conn)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/clientes-frecuentes
#[utoipa::path(
    get,
    path = "/analytics/clientes-frecuentes",
    tag = "Analytics",
    params(FrecuentesParams),
    responses(
        (status = 200, description = "Clientes con muchos servicios en la ventana", body = ClientesFrecuentes),
        (status = 400, description = "Parámetros inválidos")
    )
)]
pub async fn frequent_clients(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<FrecuentesParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .frequent_clients(&mut *conn, params.min_servicios, params.periodo_meses)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/retencion-clientes
#[utoipa::path(
    get,
    path = "/analytics/retencion-clientes",
    tag = "Analytics",
    params(RetencionParams),
    responses(
        (status = 200, description = "Retención de clientes", body = RetencionClientes),
        (status = 400, description = "Parámetros inválidos")
    )
)]
pub async fn customer_retention(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<RetencionParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .customer_retention(&mut *conn, params.periodo_meses)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/eficiencia-empleados
#[utoipa::path(
    get,
    path = "/analytics/eficiencia-empleados",
    tag = "Analytics",
    params(VentanaDiasParams),
    responses(
        (status = 200, description = "Eficiencia por empleado", body = EficienciaEmpleados),
        (status = 400, description = "Parámetros inválidos")
    )
)]
pub async fn employee_efficiency(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<VentanaDiasParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .employee_efficiency(&mut *conn, params.dias)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/servicios-por-empleado
#[utoipa::path(
    get,
    path = "/analytics/servicios-por-empleado",
    tag = "Analytics",
    params(VentanaDiasParams),
    responses(
        (status = 200, description = "Tipos de servicio por empleado", body = DesgloseServiciosEmpleados),
        (status = 400, description = "Parámetros inválidos")
    )
)]
pub async fn employee_service_breakdown(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<VentanaDiasParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .employee_service_breakdown(&mut *conn, params.dias)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// =============================================================================
//  2. SERVIÇOS E RECEITA
// =============================================================================

// GET /analytics/servicios-periodo
#[utoipa::path(
    get,
    path = "/analytics/servicios-periodo",
    tag = "Analytics",
    params(PeriodoParams),
    responses(
        (status = 200, description = "Servicios e ingresos del período", body = ServiciosPeriodo),
        (status = 400, description = "Fecha inválida")
    )
)]
pub async fn services_in_period(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<PeriodoParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::parse(&params.fecha_inicio, &params.fecha_fin)?;

    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .services_in_period(&mut *conn, range)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/tendencias-mensuales
#[utoipa::path(
    get,
    path = "/analytics/tendencias-mensuales",
    tag = "Analytics",
    params(AnioParams),
    responses(
        (status = 200, description = "Servicios e ingresos mes a mes", body = TendenciasMensuales),
        (status = 400, description = "Año inválido")
    )
)]
pub async fn monthly_trends(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<AnioParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .monthly_trends(&mut *conn, params.year())
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/tendencias-estacionales
#[utoipa::path(
    get,
    path = "/analytics/tendencias-estacionales",
    tag = "Analytics",
    params(AnioParams),
    responses(
        (status = 200, description = "Servicios por temporada", body = TendenciasEstacionales),
        (status = 400, description = "Año inválido")
    )
)]
pub async fn seasonal_trends(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<AnioParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .seasonal_trends(&mut *conn, params.year())
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/rentabilidad-servicios
#[utoipa::path(
    get,
    path = "/analytics/rentabilidad-servicios",
    tag = "Analytics",
    responses(
        (status = 200, description = "Rentabilidad por tipo de servicio", body = ReporteRentabilidad)
    )
)]
pub async fn service_profitability(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .service_profitability(&mut *conn)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/comparativa-precios
#[utoipa::path(
    get,
    path = "/analytics/comparativa-precios",
    tag = "Analytics",
    responses(
        (status = 200, description = "Precios por tipo de servicio", body = ComparativaPrecios)
    )
)]
pub async fn price_comparison(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .price_comparison(&mut *conn)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/rendimiento-diario
#[utoipa::path(
    get,
    path = "/analytics/rendimiento-diario",
    tag = "Analytics",
    params(DiarioParams),
    responses(
        (status = 200, description = "Rendimiento día a día", body = RendimientoDiario),
        (status = 400, description = "Parámetros inválidos")
    )
)]
pub async fn daily_performance(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<DiarioParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .daily_performance(&mut *conn, params.dias)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/metodos-pago
#[utoipa::path(
    get,
    path = "/analytics/metodos-pago",
    tag = "Analytics",
    params(MetodosPagoParams),
    responses(
        (status = 200, description = "Uso de cada método de pago", body = AnalisisMetodosPago),
        (status = 400, description = "Parámetros inválidos")
    )
)]
pub async fn payment_methods(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<MetodosPagoParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .payment_methods(&mut *conn, params.periodo_meses)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// =============================================================================
//  3. ESTOQUE E FORNECEDORES
// =============================================================================

// GET /analytics/proveedor-productos
#[utoipa::path(
    get,
    path = "/analytics/proveedor-productos",
    tag = "Analytics",
    params(ProveedorParams),
    responses(
        (status = 200, description = "Productos del proveedor", body = AnalisisProveedor),
        (status = 404, description = "Proveedor no encontrado")
    )
)]
pub async fn supplier_products(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ProveedorParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .supplier_products(&mut *conn, params.proveedor_id)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /analytics/stock-critico
#[utoipa::path(
    get,
    path = "/analytics/stock-critico",
    tag = "Analytics",
    params(StockParams),
    responses(
        (status = 200, description = "Productos con stock crítico", body = StockCritico),
        (status = 400, description = "Parámetros inválidos")
    )
)]
pub async fn critical_stock(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<StockParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let mut conn = acquire_connection(&app_state).await?;
    let report = app_state
        .analytics_service
        .critical_stock(&mut *conn, params.nivel_critico)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}
