// src/db/schema.rs

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, query_builder::Separated, FromRow, Postgres};
use validator::Validate;

/// Descritor estático de uma tabela: nome, rótulo para mensagens e as
/// colunas gravadas no INSERT (sem o `id`, que o banco atribui).
#[derive(Debug, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub label: &'static str,
    pub columns: &'static [&'static str],
}

pub const CLIENTES: Table = Table {
    name: "clientes",
    label: "Cliente",
    columns: &["nombre", "telefono", "correo", "direccion", "fecha_registro"],
};

pub const EMPLEADOS: Table = Table {
    name: "empleados",
    label: "Empleado",
    columns: &["nombre", "puesto", "telefono", "correo", "fecha_contratacion"],
};

pub const PROVEEDORES: Table = Table {
    name: "proveedores",
    label: "Proveedor",
    columns: &["nombre", "telefono", "correo", "direccion"],
};

pub const PRODUCTOS: Table = Table {
    name: "productos",
    label: "Producto",
    columns: &["nombre", "tipo", "stock", "precio", "id_proveedor"],
};

pub const SERVICIOS: Table = Table {
    name: "servicios",
    label: "Servicio",
    columns: &["id_cliente", "tipo", "fecha", "material", "costo", "id_empleado"],
};

pub const FACTURAS: Table = Table {
    name: "facturas",
    label: "Factura",
    columns: &["id_servicio", "fecha", "total", "metodo_pago"],
};

/// Uma referência que precisa existir antes do INSERT.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKey {
    pub table: &'static Table,
    pub id: Option<i32>,
}

/// Payload de criação de uma entidade, ligado à sua tabela.
///
/// O serviço genérico usa `references` para a checagem de integridade e
/// `push_values` para montar o INSERT parametrizado; a ordem dos binds tem
/// que seguir `TABLE.columns`.
pub trait Entity: DeserializeOwned + Validate + Send + Sync + 'static {
    /// O registro completo, com o `id` atribuído pelo banco.
    type Record: for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin + 'static;

    const TABLE: &'static Table;

    fn references(&self) -> Vec<ForeignKey> {
        Vec::new()
    }

    fn push_values(&self, row: Separated<'_, '_, Postgres, &'static str>);
}
