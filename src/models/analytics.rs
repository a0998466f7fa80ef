// src/models/analytics.rs
//
// Estruturas de resposta dos relatórios. Todas serializam com as chaves em
// espanhol (PascalCase), como o resto da API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::entities::Producto;

// --- Blocos reutilizados ---

/// Um tipo de serviço e quantas vezes apareceu (os "top 3" dos relatórios).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TipoServicioFrecuente {
    pub tipo: Option<String>,
    pub cantidad: i64,
}

// --- 1. Gastos de um cliente ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ResumenGastoCliente {
    #[serde(rename = "IDCliente")]
    pub id_cliente: i32,
    pub nombre_cliente: String,
    pub total_servicios: i64,
    #[schema(value_type = f64)]
    pub gasto_total: Decimal,
    #[schema(value_type = f64)]
    pub gasto_promedio: Decimal,
    #[schema(value_type = f64)]
    pub gasto_minimo: Decimal,
    #[schema(value_type = f64)]
    pub gasto_maximo: Decimal,
    pub ultimo_servicio: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 2. Ranking de funcionários ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RankingEmpleado {
    #[serde(rename = "IDEmpleado")]
    pub id_empleado: i32,
    pub nombre: String,
    pub puesto: Option<String>,
    pub total_servicios: i64,
    #[schema(value_type = f64)]
    pub total_ventas: Decimal,
    // Nulo para quem ainda não tem fatura
    #[schema(value_type = Option<f64>)]
    pub promedio_venta: Option<Decimal>,
    pub ultimo_servicio: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ReporteRankingEmpleados {
    pub empleados: Vec<RankingEmpleado>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 3. Serviços num período ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ServiciosPeriodo {
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub total_servicios: i64,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
    #[schema(value_type = f64)]
    pub ingreso_promedio: Decimal,
    pub servicios_populares: Vec<TipoServicioFrecuente>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 4. Produtos de um fornecedor ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AnalisisProveedor {
    #[serde(rename = "IDProveedor")]
    pub id_proveedor: i32,
    pub nombre_proveedor: String,
    pub total_productos: i64,
    #[schema(value_type = f64)]
    pub valor_inventario: Decimal,
    #[schema(value_type = f64)]
    pub precio_promedio: Decimal,
    pub productos_mas_caros: Vec<Producto>,
    pub productos_stock_bajo: Vec<Producto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 5. Tendências mensais ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TendenciaMes {
    pub mes: u32,
    pub nombre_mes: String,
    pub total_servicios: i64,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
    #[schema(value_type = f64)]
    pub ingreso_promedio: Decimal,
    pub servicio_mas_popular: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TendenciasMensuales {
    #[serde(rename = "Año")]
    pub anio: i32,
    pub meses: Vec<TendenciaMes>,
    pub total_servicios_anual: i64,
    #[schema(value_type = f64)]
    pub ingreso_total_anual: Decimal,
    #[schema(value_type = f64)]
    pub ingreso_promedio_mensual: Decimal,
    pub mes_mayor_ingreso: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 6. Clientes frequentes ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ClienteFrecuente {
    #[serde(rename = "IDCliente")]
    pub id_cliente: i32,
    pub nombre: String,
    #[serde(rename = "Teléfono")]
    pub telefono: Option<String>,
    pub correo: Option<String>,
    pub total_servicios: i64,
    #[schema(value_type = f64)]
    pub gasto_total: Decimal,
    #[schema(value_type = f64)]
    pub gasto_promedio: Decimal,
    pub ultima_visita: Option<NaiveDate>,
    pub servicios_preferidos: Vec<TipoServicioFrecuente>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ClientesFrecuentes {
    pub min_servicios: u32,
    pub periodo_meses: u32,
    pub desde: NaiveDate,
    pub clientes: Vec<ClienteFrecuente>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 7. Rentabilidade por tipo de serviço ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PuntoTendencia {
    pub mes: String,
    pub total_servicios: i64,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RentabilidadServicio {
    pub tipo: Option<String>,
    pub total_servicios: i64,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
    #[schema(value_type = f64)]
    pub ingreso_promedio: Decimal,
    #[schema(value_type = f64)]
    pub ingreso_minimo: Decimal,
    #[schema(value_type = f64)]
    pub ingreso_maximo: Decimal,
    #[schema(value_type = f64)]
    pub costo_total: Decimal,
    #[schema(value_type = f64)]
    pub margen: Decimal,
    #[schema(value_type = f64)]
    pub margen_porcentaje: Decimal,
    pub tendencia: Vec<PuntoTendencia>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ReporteRentabilidad {
    pub desde: NaiveDate,
    pub servicios: Vec<RentabilidadServicio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 8. Estoque crítico ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ContactoProveedor {
    #[serde(rename = "IDProveedor")]
    pub id_proveedor: i32,
    pub nombre: String,
    #[serde(rename = "Teléfono")]
    pub telefono: Option<String>,
    pub correo: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ProductoCritico {
    #[serde(rename = "IDProducto")]
    pub id_producto: i32,
    pub nombre: String,
    pub tipo: Option<String>,
    pub stock: i32,
    #[schema(value_type = f64)]
    pub precio: Decimal,
    pub proveedor: Option<ContactoProveedor>,
    pub usos_registrados: i64,
    pub primer_uso: Option<NaiveDate>,
    #[schema(value_type = Option<f64>)]
    pub uso_mensual_estimado: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub dias_para_agotar: Option<Decimal>,
    #[serde(rename = "EstadoCrítico")]
    pub estado_critico: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct StockCritico {
    pub nivel_critico: i32,
    pub total_productos: usize,
    pub productos_criticos: usize,
    pub productos: Vec<ProductoCritico>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 9. Tendências sazonais ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum Temporada {
    Invierno,
    Primavera,
    Verano,
    #[serde(rename = "Otoño")]
    Otono,
}

impl Temporada {
    pub const ALL: [Temporada; 4] = [
        Temporada::Invierno,
        Temporada::Primavera,
        Temporada::Verano,
        Temporada::Otono,
    ];

    /// Estações fixas de 3 meses; dezembro conta no inverno do mesmo ano.
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Temporada::Invierno),
            3..=5 => Some(Temporada::Primavera),
            6..=8 => Some(Temporada::Verano),
            9..=11 => Some(Temporada::Otono),
            _ => None,
        }
    }

    pub fn months(self) -> [u32; 3] {
        match self {
            Temporada::Invierno => [12, 1, 2],
            Temporada::Primavera => [3, 4, 5],
            Temporada::Verano => [6, 7, 8],
            Temporada::Otono => [9, 10, 11],
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ResumenTemporada {
    pub temporada: Temporada,
    pub meses: Vec<u32>,
    pub total_servicios: i64,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
    #[schema(value_type = f64)]
    pub ingreso_promedio: Decimal,
    pub servicios_populares: Vec<TipoServicioFrecuente>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TendenciasEstacionales {
    #[serde(rename = "Año")]
    pub anio: i32,
    pub temporadas: Vec<ResumenTemporada>,
    pub temporada_mas_activa: Option<Temporada>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 10. Retenção de clientes ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct NuevosClientesMes {
    pub mes: String,
    pub cantidad: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RetencionClientes {
    pub periodo_meses: u32,
    pub desde: NaiveDate,
    pub total_clientes: i64,
    pub clientes_recurrentes: i64,
    /// Percentual de clientes com mais de uma visita na janela.
    #[schema(value_type = f64)]
    pub tasa_retencion: Decimal,
    #[schema(value_type = f64)]
    pub promedio_visitas: Decimal,
    #[schema(value_type = Option<f64>)]
    pub promedio_dias_entre_visitas: Option<Decimal>,
    pub nuevos_clientes_por_mes: Vec<NuevosClientesMes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 11. Comparativo de preços ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PuntoPrecio {
    pub mes: String,
    #[schema(value_type = f64)]
    pub precio_promedio: Decimal,
    pub total_facturas: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ComparativaPrecio {
    pub tipo: Option<String>,
    pub total_facturas: i64,
    #[schema(value_type = f64)]
    pub precio_minimo: Decimal,
    #[schema(value_type = f64)]
    pub precio_maximo: Decimal,
    #[schema(value_type = f64)]
    pub precio_promedio: Decimal,
    #[schema(value_type = f64)]
    pub desviacion_estandar: Decimal,
    pub tendencia: Vec<PuntoPrecio>,
    #[schema(value_type = Option<f64>)]
    pub variacion_porcentual: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nota: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ComparativaPrecios {
    pub desde: NaiveDate,
    pub servicios: Vec<ComparativaPrecio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 12. Eficiência por funcionário ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct EficienciaEmpleado {
    #[serde(rename = "IDEmpleado")]
    pub id_empleado: i32,
    pub nombre: String,
    pub puesto: Option<String>,
    pub total_servicios: i64,
    pub dias_activos: i64,
    #[schema(value_type = f64)]
    pub servicios_por_dia: Decimal,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
    #[schema(value_type = f64)]
    pub ingreso_por_servicio: Decimal,
    #[schema(value_type = f64)]
    pub porcentaje_ingresos: Decimal,
    /// 100 = exatamente a média dos funcionários no período.
    #[schema(value_type = f64)]
    pub indice_vs_promedio: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct EficienciaEmpleados {
    pub periodo_dias: u32,
    pub desde: NaiveDate,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
    #[schema(value_type = f64)]
    pub promedio_ingreso_por_empleado: Decimal,
    pub empleados: Vec<EficienciaEmpleado>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 13. Serviços por funcionário ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct DesgloseTipo {
    pub tipo: Option<String>,
    pub cantidad: i64,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
    #[schema(value_type = f64)]
    pub porcentaje: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct DesgloseEmpleado {
    #[serde(rename = "IDEmpleado")]
    pub id_empleado: i32,
    pub nombre: String,
    pub total_servicios: i64,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
    pub servicios: Vec<DesgloseTipo>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct DesgloseServiciosEmpleados {
    pub periodo_dias: u32,
    pub desde: NaiveDate,
    pub empleados: Vec<DesgloseEmpleado>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 14. Desempenho diário ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RendimientoDia {
    pub fecha: NaiveDate,
    pub total_servicios: i64,
    pub clientes_atendidos: i64,
    pub empleados_activos: i64,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
    #[schema(value_type = f64)]
    pub ticket_promedio: Decimal,
    #[schema(value_type = f64)]
    pub variacion_vs_promedio: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RendimientoDiario {
    pub dias: u32,
    pub desde: NaiveDate,
    pub total_servicios: i64,
    #[schema(value_type = f64)]
    pub ingreso_total: Decimal,
    #[schema(value_type = f64)]
    pub promedio_ingreso_diario: Decimal,
    pub mejor_dia: Option<NaiveDate>,
    pub detalle: Vec<RendimientoDia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

// --- 15. Formas de pagamento ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PuntoMetodoPago {
    pub mes: String,
    pub transacciones: i64,
    #[schema(value_type = f64)]
    pub monto_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct MetodoPago {
    #[serde(rename = "MétodoPago")]
    pub metodo_pago: String,
    pub transacciones: i64,
    #[schema(value_type = f64)]
    pub monto_total: Decimal,
    #[schema(value_type = f64)]
    pub monto_promedio: Decimal,
    #[schema(value_type = f64)]
    pub monto_minimo: Decimal,
    #[schema(value_type = f64)]
    pub monto_maximo: Decimal,
    #[schema(value_type = f64)]
    pub porcentaje_transacciones: Decimal,
    #[schema(value_type = f64)]
    pub porcentaje_monto: Decimal,
    pub tendencia: Vec<PuntoMetodoPago>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AnalisisMetodosPago {
    pub periodo_meses: u32,
    pub desde: NaiveDate,
    pub total_transacciones: i64,
    #[schema(value_type = f64)]
    pub monto_total: Decimal,
    pub metodos: Vec<MetodoPago>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}
