// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API de Servicios de Tapiceria Automotriz",
        description = "Clientes, empleados, proveedores, productos, servicios, facturas y reportes del taller"
    ),
    paths(
        // --- Clientes ---
        handlers::entities::clientes::create,
        handlers::entities::clientes::list,
        handlers::entities::clientes::create_bulk,

        // --- Empleados ---
        handlers::entities::empleados::create,
        handlers::entities::empleados::list,
        handlers::entities::empleados::create_bulk,

        // --- Proveedores ---
        handlers::entities::proveedores::create,
        handlers::entities::proveedores::list,
        handlers::entities::proveedores::create_bulk,

        // --- Productos ---
        handlers::entities::productos::create,
        handlers::entities::productos::list,
        handlers::entities::productos::create_bulk,

        // --- Servicios ---
        handlers::entities::servicios::create,
        handlers::entities::servicios::list,
        handlers::entities::servicios::create_bulk,

        // --- Facturas ---
        handlers::entities::facturas::create,
        handlers::entities::facturas::list,
        handlers::entities::facturas::create_bulk,

        // --- ANALYTICS ---
        handlers::analytics::client_spending,
        handlers::analytics::employee_ranking,
        handlers::analytics::services_in_period,
        handlers::analytics::supplier_products,
        handlers::analytics::monthly_trends,
        handlers::analytics::frequent_clients,
        handlers::analytics::service_profitability,
        handlers::analytics::critical_stock,
        handlers::analytics::seasonal_trends,
        handlers::analytics::customer_retention,
        handlers::analytics::price_comparison,
        handlers::analytics::employee_efficiency,
        handlers::analytics::employee_service_breakdown,
        handlers::analytics::daily_performance,
        handlers::analytics::payment_methods,
    ),
    components(
        schemas(
            // --- Entidades ---
            models::entities::NuevoCliente,
            models::entities::Cliente,
            models::entities::NuevoEmpleado,
            models::entities::Empleado,
            models::entities::NuevoProveedor,
            models::entities::Proveedor,
            models::entities::NuevoProducto,
            models::entities::Producto,
            models::entities::NuevoServicio,
            models::entities::Servicio,
            models::entities::NuevaFactura,
            models::entities::Factura,

            // --- Reportes ---
            models::analytics::TipoServicioFrecuente,
            models::analytics::ResumenGastoCliente,
            models::analytics::RankingEmpleado,
            models::analytics::ReporteRankingEmpleados,
            models::analytics::ServiciosPeriodo,
            models::analytics::AnalisisProveedor,
            models::analytics::TendenciaMes,
            models::analytics::TendenciasMensuales,
            models::analytics::ClienteFrecuente,
            models::analytics::ClientesFrecuentes,
            models::analytics::PuntoTendencia,
            models::analytics::RentabilidadServicio,
            models::analytics::ReporteRentabilidad,
            models::analytics::ContactoProveedor,
            models::analytics::ProductoCritico,
            models::analytics::StockCritico,
            models::analytics::Temporada,
            models::analytics::ResumenTemporada,
            models::analytics::TendenciasEstacionales,
            models::analytics::NuevosClientesMes,
            models::analytics::RetencionClientes,
            models::analytics::PuntoPrecio,
            models::analytics::ComparativaPrecio,
            models::analytics::ComparativaPrecios,
            models::analytics::EficienciaEmpleado,
            models::analytics::EficienciaEmpleados,
            models::analytics::DesgloseTipo,
            models::analytics::DesgloseEmpleado,
            models::analytics::DesgloseServiciosEmpleados,
            models::analytics::RendimientoDia,
            models::analytics::RendimientoDiario,
            models::analytics::PuntoMetodoPago,
            models::analytics::MetodoPago,
            models::analytics::AnalisisMetodosPago,
        )
    ),
    tags(
        (name = "Clientes", description = "Clientes del taller"),
        (name = "Empleados", description = "Empleados y tapiceros"),
        (name = "Proveedores", description = "Proveedores de materiales"),
        (name = "Productos", description = "Telas, cueros y demás insumos"),
        (name = "Servicios", description = "Trabajos realizados"),
        (name = "Facturas", description = "Cobro de los servicios"),
        (name = "Analytics", description = "Reportes de gestión")
    )
)]
pub struct ApiDoc;
