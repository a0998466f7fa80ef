// src/handlers/entities.rs
//
// CRUD das seis entidades. Os handlers de cada entidade são gerados pela
// macro `entity_handlers!` e delegam para as três funções genéricas abaixo.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::WithRejection;

use crate::{
    common::{db_utils::acquire_connection, error::AppError},
    config::AppState,
    db::schema::Entity,
};

// ---
// Implementação genérica
// ---

async fn create_entity<T: Entity>(
    app_state: &AppState,
    payload: T,
) -> Result<(StatusCode, Json<T::Record>), AppError> {
    // Validação antes de tocar na pool
    payload.validate()?;

    let mut conn = acquire_connection(app_state).await?;
    let created = app_state
        .entity_service
        .create(&mut *conn, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_entities<T: Entity>(app_state: &AppState) -> Result<Json<Vec<T::Record>>, AppError> {
    let mut conn = acquire_connection(app_state).await?;
    let records = app_state.entity_service.list::<T, _>(&mut *conn).await?;
    Ok(Json(records))
}

async fn create_entities<T: Entity>(
    app_state: &AppState,
    payload: Vec<T>,
) -> Result<(StatusCode, Json<Vec<T::Record>>), AppError> {
    // Um item inválido rejeita o lote inteiro
    for record in &payload {
        record.validate()?;
    }

    let mut conn = acquire_connection(app_state).await?;
    let created = app_state
        .entity_service
        .create_bulk(&mut *conn, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// ---
// Handlers por entidade (com a documentação OpenAPI de cada rota)
// ---

macro_rules! entity_handlers {
    ($module:ident, $path:tt, $bulk_path:tt, $tag:tt, $payload:ident, $record:ident) => {
        pub mod $module {
            use super::*;
            use crate::models::entities::{$payload, $record};

            #[utoipa::path(
                post,
                path = $path,
                tag = $tag,
                operation_id = concat!("crear_", stringify!($module)),
                request_body = $payload,
                responses(
                    (status = 201, description = "Registro creado", body = $record),
                    (status = 400, description = "Datos inválidos"),
                    (status = 404, description = "Referencia no encontrada")
                )
            )]
            pub async fn create(
                State(app_state): State<AppState>,
                WithRejection(Json(payload), _): WithRejection<Json<$payload>, AppError>,
            ) -> Result<impl IntoResponse, AppError> {
                create_entity(&app_state, payload).await
            }

            #[utoipa::path(
                get,
                path = $path,
                tag = $tag,
                operation_id = concat!("listar_", stringify!($module)),
                responses(
                    (status = 200, description = "Todos los registros", body = Vec<$record>)
                )
            )]
            pub async fn list(
                State(app_state): State<AppState>,
            ) -> Result<impl IntoResponse, AppError> {
                list_entities::<$payload>(&app_state).await
            }

            #[utoipa::path(
                post,
                path = $bulk_path,
                tag = $tag,
                operation_id = concat!("crear_", stringify!($module), "_en_lote"),
                request_body = Vec<$payload>,
                responses(
                    (status = 201, description = "Registros creados, en el orden recibido", body = Vec<$record>),
                    (status = 400, description = "Datos inválidos"),
                    (status = 404, description = "Referencia no encontrada; no se insertó ningún registro")
                )
            )]
            pub async fn create_bulk(
                State(app_state): State<AppState>,
                WithRejection(Json(payload), _): WithRejection<Json<Vec<$payload>>, AppError>,
            ) -> Result<impl IntoResponse, AppError> {
                create_entities(&app_state, payload).await
            }
        }
    };
}

entity_handlers!(clientes, "/clientes/", "/clientes/bulk/", "Clientes", NuevoCliente, Cliente);
entity_handlers!(empleados, "/empleados/", "/empleados/bulk/", "Empleados", NuevoEmpleado, Empleado);
entity_handlers!(proveedores, "/proveedores/", "/proveedores/bulk/", "Proveedores", NuevoProveedor, Proveedor);
entity_handlers!(productos, "/productos/", "/productos/bulk/", "Productos", NuevoProducto, Producto);
entity_handlers!(servicios, "/servicios/", "/servicios/bulk/", "Servicios", NuevoServicio, Servicio);
entity_handlers!(facturas, "/facturas/", "/facturas/bulk/", "Facturas", NuevaFactura, Factura);
