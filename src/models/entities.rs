// src/models/entities.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, FromRow, Postgres};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::db::schema::{
    Entity, ForeignKey, Table, CLIENTES, EMPLEADOS, FACTURAS, PRODUCTOS, PROVEEDORES, SERVICIOS,
};

// ---
// Validações customizadas
// ---
fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("El nombre es obligatorio.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("El valor no puede ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// =========================================================================
//  CLIENTES
// =========================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct NuevoCliente {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "María López")]
    pub nombre: String,

    #[serde(rename = "Teléfono")]
    #[schema(example = "555-0101")]
    pub telefono: Option<String>,

    #[validate(email(message = "Correo inválido."))]
    pub correo: Option<String>,

    #[serde(rename = "Dirección")]
    pub direccion: Option<String>,

    pub fecha_registro: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Cliente {
    #[serde(rename = "ID")]
    pub id: i32,
    pub nombre: String,
    #[serde(rename = "Teléfono")]
    pub telefono: Option<String>,
    pub correo: Option<String>,
    #[serde(rename = "Dirección")]
    pub direccion: Option<String>,
    pub fecha_registro: Option<NaiveDate>,
}

impl Entity for NuevoCliente {
    type Record = Cliente;
    const TABLE: &'static Table = &CLIENTES;

    fn push_values(&self, mut row: Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.nombre.trim().to_string())
            .push_bind(self.telefono.clone())
            .push_bind(self.correo.clone())
            .push_bind(self.direccion.clone())
            .push_bind(self.fecha_registro);
    }
}

// =========================================================================
//  EMPLEADOS
// =========================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct NuevoEmpleado {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Carlos Pérez")]
    pub nombre: String,

    #[schema(example = "Tapicero")]
    pub puesto: Option<String>,

    #[serde(rename = "Teléfono")]
    pub telefono: Option<String>,

    #[validate(email(message = "Correo inválido."))]
    pub correo: Option<String>,

    #[serde(rename = "FechaContratación")]
    pub fecha_contratacion: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Empleado {
    #[serde(rename = "ID")]
    pub id: i32,
    pub nombre: String,
    pub puesto: Option<String>,
    #[serde(rename = "Teléfono")]
    pub telefono: Option<String>,
    pub correo: Option<String>,
    #[serde(rename = "FechaContratación")]
    pub fecha_contratacion: Option<NaiveDate>,
}

impl Entity for NuevoEmpleado {
    type Record = Empleado;
    const TABLE: &'static Table = &EMPLEADOS;

    fn push_values(&self, mut row: Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.nombre.trim().to_string())
            .push_bind(self.puesto.clone())
            .push_bind(self.telefono.clone())
            .push_bind(self.correo.clone())
            .push_bind(self.fecha_contratacion);
    }
}

// =========================================================================
//  PROVEEDORES
// =========================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct NuevoProveedor {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Telas del Norte")]
    pub nombre: String,

    #[serde(rename = "Teléfono")]
    pub telefono: Option<String>,

    #[validate(email(message = "Correo inválido."))]
    pub correo: Option<String>,

    #[serde(rename = "Dirección")]
    pub direccion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Proveedor {
    #[serde(rename = "ID")]
    pub id: i32,
    pub nombre: String,
    #[serde(rename = "Teléfono")]
    pub telefono: Option<String>,
    pub correo: Option<String>,
    #[serde(rename = "Dirección")]
    pub direccion: Option<String>,
}

impl Entity for NuevoProveedor {
    type Record = Proveedor;
    const TABLE: &'static Table = &PROVEEDORES;

    fn push_values(&self, mut row: Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.nombre.trim().to_string())
            .push_bind(self.telefono.clone())
            .push_bind(self.correo.clone())
            .push_bind(self.direccion.clone());
    }
}

// =========================================================================
//  PRODUCTOS
// =========================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct NuevoProducto {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Cuero sintético negro")]
    pub nombre: String,

    #[schema(example = "Tela")]
    pub tipo: Option<String>,

    #[validate(range(min = 0, message = "El stock no puede ser negativo."))]
    #[serde(default)]
    pub stock: i32,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(value_type = f64, example = 250.0)]
    pub precio: Decimal,

    #[serde(rename = "IDProveedor")]
    pub id_proveedor: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Producto {
    #[serde(rename = "ID")]
    pub id: i32,
    pub nombre: String,
    pub tipo: Option<String>,
    pub stock: i32,
    #[schema(value_type = f64)]
    pub precio: Decimal,
    #[serde(rename = "IDProveedor")]
    pub id_proveedor: Option<i32>,
}

impl Entity for NuevoProducto {
    type Record = Producto;
    const TABLE: &'static Table = &PRODUCTOS;

    fn references(&self) -> Vec<ForeignKey> {
        vec![ForeignKey { table: &PROVEEDORES, id: self.id_proveedor }]
    }

    fn push_values(&self, mut row: Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.nombre.trim().to_string())
            .push_bind(self.tipo.clone())
            .push_bind(self.stock)
            .push_bind(self.precio)
            .push_bind(self.id_proveedor);
    }
}

// =========================================================================
//  SERVICIOS
// =========================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct NuevoServicio {
    #[serde(rename = "IDCliente")]
    pub id_cliente: i32,

    #[schema(example = "Tapizado de asientos")]
    pub tipo: Option<String>,

    pub fecha: Option<NaiveDate>,

    // Texto livre; os relatórios de estoque o comparam com o nome do produto
    #[schema(example = "Cuero sintético negro")]
    pub material: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(value_type = f64)]
    pub costo: Decimal,

    #[serde(rename = "IDEmpleado")]
    pub id_empleado: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Servicio {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "IDCliente")]
    pub id_cliente: i32,
    pub tipo: Option<String>,
    pub fecha: Option<NaiveDate>,
    pub material: Option<String>,
    #[schema(value_type = f64)]
    pub costo: Decimal,
    #[serde(rename = "IDEmpleado")]
    pub id_empleado: Option<i32>,
}

impl Entity for NuevoServicio {
    type Record = Servicio;
    const TABLE: &'static Table = &SERVICIOS;

    fn references(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey { table: &CLIENTES, id: Some(self.id_cliente) },
            ForeignKey { table: &EMPLEADOS, id: self.id_empleado },
        ]
    }

    fn push_values(&self, mut row: Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id_cliente)
            .push_bind(self.tipo.clone())
            .push_bind(self.fecha)
            .push_bind(self.material.clone())
            .push_bind(self.costo)
            .push_bind(self.id_empleado);
    }
}

// =========================================================================
//  FACTURAS
// =========================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct NuevaFactura {
    #[serde(rename = "IDServicio")]
    pub id_servicio: i32,

    pub fecha: Option<NaiveDate>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(value_type = f64, example = 1200.0)]
    pub total: Decimal,

    #[serde(rename = "MétodoPago")]
    #[schema(example = "Efectivo")]
    pub metodo_pago: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Factura {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "IDServicio")]
    pub id_servicio: i32,
    pub fecha: Option<NaiveDate>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    #[serde(rename = "MétodoPago")]
    pub metodo_pago: Option<String>,
}

impl Entity for NuevaFactura {
    type Record = Factura;
    const TABLE: &'static Table = &FACTURAS;

    fn references(&self) -> Vec<ForeignKey> {
        vec![ForeignKey { table: &SERVICIOS, id: Some(self.id_servicio) }]
    }

    fn push_values(&self, mut row: Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id_servicio)
            .push_bind(self.fecha)
            .push_bind(self.total)
            .push_bind(self.metodo_pago.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_defaults_fill_missing_fields() {
        let producto: NuevoProducto = serde_json::from_value(json!({
            "Nombre": "Vinil gris",
            "IDProveedor": 3
        }))
        .unwrap();
        assert_eq!(producto.stock, 0);
        assert_eq!(producto.precio, Decimal::ZERO);
        assert_eq!(producto.id_proveedor, Some(3));
    }

    #[test]
    fn accented_keys_are_accepted() {
        let cliente: NuevoCliente = serde_json::from_value(json!({
            "Nombre": "Ana",
            "Teléfono": "555-0000",
            "Dirección": "Av. Siempre Viva 742",
            "FechaRegistro": "2024-03-01"
        }))
        .unwrap();
        assert_eq!(cliente.telefono.as_deref(), Some("555-0000"));
        assert_eq!(cliente.direccion.as_deref(), Some("Av. Siempre Viva 742"));
        assert_eq!(cliente.fecha_registro, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn blank_names_are_rejected() {
        let cliente: NuevoCliente = serde_json::from_value(json!({ "Nombre": "   " })).unwrap();
        assert!(cliente.validate().is_err());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let producto: NuevoProducto = serde_json::from_value(json!({
            "Nombre": "Espuma",
            "Stock": -1
        }))
        .unwrap();
        assert!(producto.validate().is_err());

        let factura: NuevaFactura = serde_json::from_value(json!({
            "IDServicio": 1,
            "Total": -10.5
        }))
        .unwrap();
        assert!(factura.validate().is_err());
    }

    #[test]
    fn records_serialize_with_accented_keys() {
        let factura = Factura {
            id: 7,
            id_servicio: 2,
            fecha: NaiveDate::from_ymd_opt(2024, 1, 15),
            total: "100.00".parse().unwrap(),
            metodo_pago: Some("Tarjeta".to_string()),
        };
        let value = serde_json::to_value(&factura).unwrap();
        assert_eq!(value["ID"], json!(7));
        assert_eq!(value["IDServicio"], json!(2));
        assert_eq!(value["Fecha"], json!("2024-01-15"));
        assert_eq!(value["Total"], json!(100.0));
        assert_eq!(value["MétodoPago"], json!("Tarjeta"));
    }

    #[test]
    fn services_reference_client_and_employee() {
        let servicio: NuevoServicio = serde_json::from_value(json!({
            "IDCliente": 4,
            "IDEmpleado": 9
        }))
        .unwrap();
        let refs = servicio.references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].table.name, "clientes");
        assert_eq!(refs[0].id, Some(4));
        assert_eq!(refs[1].table.name, "empleados");
        assert_eq!(refs[1].id, Some(9));
    }
}
