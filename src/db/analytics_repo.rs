// src/db/analytics_repo.rs
//
// Consultas somente-leitura dos relatórios. Cada consulta é um template fixo
// com parâmetros ligados por `bind`; nada da requisição entra no texto SQL.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, Postgres};

use crate::{common::error::AppError, models::entities::Producto};

// =========================================================================
//  LINHAS (o formato cru que volta do banco)
// =========================================================================

#[derive(Debug, Clone, FromRow)]
pub struct ClientSpendingRow {
    pub total_servicios: i64,
    pub gasto_total: Decimal,
    pub gasto_promedio: Option<Decimal>,
    pub gasto_minimo: Option<Decimal>,
    pub gasto_maximo: Option<Decimal>,
    pub ultimo_servicio: Option<NaiveDate>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRankingRow {
    pub id: i32,
    pub nombre: String,
    pub puesto: Option<String>,
    pub total_servicios: i64,
    pub total_ventas: Decimal,
    pub promedio_venta: Option<Decimal>,
    pub ultimo_servicio: Option<NaiveDate>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PeriodTotalsRow {
    pub total_servicios: i64,
    pub total_facturas: i64,
    pub ingreso_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TypeCountRow {
    pub tipo: Option<String>,
    pub cantidad: i64,
}

/// Contagem de um tipo dentro de um grupo (cliente, por exemplo).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct KeyedTypeCountRow {
    pub clave: i32,
    pub tipo: Option<String>,
    pub cantidad: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct SupplierStockRow {
    pub total_productos: i64,
    pub valor_inventario: Decimal,
    pub precio_promedio: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MonthlyTotalsRow {
    pub mes: i32,
    pub total_servicios: i64,
    pub total_facturas: i64,
    pub ingreso_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MonthlyTypeCountRow {
    pub mes: i32,
    pub tipo: Option<String>,
    pub cantidad: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct FrequentClientRow {
    pub id: i32,
    pub nombre: String,
    pub telefono: Option<String>,
    pub correo: Option<String>,
    pub total_servicios: i64,
    pub gasto_total: Decimal,
    pub ultima_visita: Option<NaiveDate>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TypeProfitabilityRow {
    pub tipo: Option<String>,
    pub total_servicios: i64,
    pub ingreso_total: Decimal,
    pub ingreso_promedio: Decimal,
    pub ingreso_minimo: Decimal,
    pub ingreso_maximo: Decimal,
    pub costo_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TypeMonthRow {
    pub tipo: Option<String>,
    pub mes: String,
    pub total_servicios: i64,
    pub ingreso_total: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct CriticalStockRow {
    pub id: i32,
    pub nombre: String,
    pub tipo: Option<String>,
    pub stock: i32,
    pub precio: Decimal,
    pub id_proveedor: Option<i32>,
    pub proveedor: Option<String>,
    pub telefono_proveedor: Option<String>,
    pub correo_proveedor: Option<String>,
    pub usos: i64,
    pub primer_uso: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ClientVisitsRow {
    pub id_cliente: i32,
    pub visitas: i64,
    pub primera_visita: Option<NaiveDate>,
    pub ultima_visita: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MonthCountRow {
    pub mes: String,
    pub cantidad: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct TypePriceRow {
    pub tipo: Option<String>,
    pub total_facturas: i64,
    pub precio_minimo: Decimal,
    pub precio_maximo: Decimal,
    pub precio_promedio: Decimal,
    pub desviacion_estandar: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TypePriceMonthRow {
    pub tipo: Option<String>,
    pub mes: String,
    pub precio_promedio: Decimal,
    pub total_facturas: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct EmployeeEfficiencyRow {
    pub id: i32,
    pub nombre: String,
    pub puesto: Option<String>,
    pub total_servicios: i64,
    pub dias_activos: i64,
    pub ingreso_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct EmployeeTypeRow {
    pub id_empleado: i32,
    pub nombre: String,
    pub tipo: Option<String>,
    pub cantidad: i64,
    pub ingreso_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DailyRow {
    pub fecha: NaiveDate,
    pub total_servicios: i64,
    pub clientes_atendidos: i64,
    pub empleados_activos: i64,
    pub ingreso_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PaymentMethodRow {
    pub metodo_pago: String,
    pub transacciones: i64,
    pub monto_total: Decimal,
    pub monto_promedio: Decimal,
    pub monto_minimo: Decimal,
    pub monto_maximo: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PaymentMethodMonthRow {
    pub metodo_pago: String,
    pub mes: String,
    pub transacciones: i64,
    pub monto_total: Decimal,
}

// =========================================================================
//  REPOSITÓRIO
// =========================================================================

#[derive(Clone, Default)]
pub struct AnalyticsRepository;

impl AnalyticsRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Lookups de existência (clientes e fornecedores)
    // ---

    pub async fn find_client_name<'e, E>(
        &self,
        executor: E,
        client_id: i32,
    ) -> Result<Option<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let name = sqlx::query_scalar::<_, String>("SELECT nombre FROM clientes WHERE id = $1")
            .bind(client_id)
            .fetch_optional(executor)
            .await?;
        Ok(name)
    }

    pub async fn find_supplier_name<'e, E>(
        &self,
        executor: E,
        supplier_id: i32,
    ) -> Result<Option<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let name = sqlx::query_scalar::<_, String>("SELECT nombre FROM proveedores WHERE id = $1")
            .bind(supplier_id)
            .fetch_optional(executor)
            .await?;
        Ok(name)
    }

    // ---
    // 1. Gastos de um cliente
    // ---

    pub async fn client_spending<'e, E>(
        &self,
        executor: E,
        client_id: i32,
    ) -> Result<ClientSpendingRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Agregado sem GROUP BY: sempre devolve uma linha, mesmo sem serviços
        let row = sqlx::query_as::<_, ClientSpendingRow>(
            r#"
            SELECT
                COUNT(DISTINCT s.id) AS total_servicios,
                COALESCE(ROUND(SUM(f.total), 2), 0) AS gasto_total,
                ROUND(AVG(f.total), 2) AS gasto_promedio,
                MIN(f.total) AS gasto_minimo,
                MAX(f.total) AS gasto_maximo,
                MAX(s.fecha) AS ultimo_servicio
            FROM servicios s
            LEFT JOIN facturas f ON f.id_servicio = s.id
            WHERE s.id_cliente = $1
            "#,
        )
        .bind(client_id)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    // ---
    // 2. Ranking de funcionários (LEFT JOIN: quem não vendeu também aparece)
    // ---

    pub async fn employee_ranking<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<EmployeeRankingRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, EmployeeRankingRow>(
            r#"
            SELECT
                e.id,
                e.nombre,
                e.puesto,
                COUNT(DISTINCT s.id) AS total_servicios,
                COALESCE(ROUND(SUM(f.total), 2), 0) AS total_ventas,
                ROUND(AVG(f.total), 2) AS promedio_venta,
                MAX(s.fecha) AS ultimo_servicio
            FROM empleados e
            LEFT JOIN servicios s ON s.id_empleado = e.id
            LEFT JOIN facturas f ON f.id_servicio = s.id
            GROUP BY e.id, e.nombre, e.puesto
            ORDER BY total_ventas DESC, e.id ASC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 3. Serviços num intervalo fechado de datas
    // ---

    pub async fn period_totals<'e, E>(
        &self,
        executor: E,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PeriodTotalsRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, PeriodTotalsRow>(
            r#"
            SELECT
                COUNT(DISTINCT s.id) AS total_servicios,
                COUNT(f.id) AS total_facturas,
                COALESCE(ROUND(SUM(f.total), 2), 0) AS ingreso_total
            FROM servicios s
            LEFT JOIN facturas f ON f.id_servicio = s.id
            WHERE s.fecha BETWEEN $1 AND $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    /// Tipos mais frequentes no período. Serviços sem tipo não entram no ranking.
    pub async fn top_types_in_period<'e, E>(
        &self,
        executor: E,
        start: NaiveDate,
        end: NaiveDate,
        limit: i64,
    ) -> Result<Vec<TypeCountRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, TypeCountRow>(
            r#"
            SELECT s.tipo, COUNT(*) AS cantidad
            FROM servicios s
            WHERE s.fecha BETWEEN $1 AND $2 AND s.tipo IS NOT NULL
            GROUP BY s.tipo
            ORDER BY cantidad DESC, s.tipo ASC
            LIMIT $3
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 4. Produtos de um fornecedor
    // ---

    pub async fn supplier_stock<'e, E>(
        &self,
        executor: E,
        supplier_id: i32,
    ) -> Result<SupplierStockRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SupplierStockRow>(
            r#"
            SELECT
                COUNT(*) AS total_productos,
                COALESCE(ROUND(SUM(p.stock * p.precio), 2), 0) AS valor_inventario,
                ROUND(AVG(p.precio), 2) AS precio_promedio
            FROM productos p
            WHERE p.id_proveedor = $1
            "#,
        )
        .bind(supplier_id)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn most_expensive_products<'e, E>(
        &self,
        executor: E,
        supplier_id: i32,
        limit: i64,
    ) -> Result<Vec<Producto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Producto>(
            r#"
            SELECT * FROM productos
            WHERE id_proveedor = $1
            ORDER BY precio DESC, id ASC
            LIMIT $2
            "#,
        )
        .bind(supplier_id)
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn low_stock_products<'e, E>(
        &self,
        executor: E,
        supplier_id: i32,
        below: i32,
    ) -> Result<Vec<Producto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Producto>(
            r#"
            SELECT * FROM productos
            WHERE id_proveedor = $1 AND stock < $2
            ORDER BY stock ASC, id ASC
            "#,
        )
        .bind(supplier_id)
        .bind(below)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 5 e 9. Agregados mensais (a base das tendências mensais e sazonais)
    // ---

    pub async fn monthly_totals<'e, E>(
        &self,
        executor: E,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MonthlyTotalsRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, MonthlyTotalsRow>(
            r#"
            SELECT
                EXTRACT(MONTH FROM s.fecha)::int AS mes,
                COUNT(DISTINCT s.id) AS total_servicios,
                COUNT(f.id) AS total_facturas,
                COALESCE(SUM(f.total), 0) AS ingreso_total
            FROM servicios s
            LEFT JOIN facturas f ON f.id_servicio = s.id
            WHERE s.fecha BETWEEN $1 AND $2
            GROUP BY mes
            ORDER BY mes
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn monthly_type_counts<'e, E>(
        &self,
        executor: E,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MonthlyTypeCountRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, MonthlyTypeCountRow>(
            r#"
            SELECT
                EXTRACT(MONTH FROM s.fecha)::int AS mes,
                s.tipo,
                COUNT(*) AS cantidad
            FROM servicios s
            WHERE s.fecha BETWEEN $1 AND $2 AND s.tipo IS NOT NULL
            GROUP BY mes, s.tipo
            ORDER BY mes, cantidad DESC, s.tipo ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 6. Clientes frequentes
    // ---

    pub async fn frequent_clients<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
        min_services: i64,
    ) -> Result<Vec<FrequentClientRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, FrequentClientRow>(
            r#"
            SELECT
                c.id,
                c.nombre,
                c.telefono,
                c.correo,
                COUNT(DISTINCT s.id) AS total_servicios,
                COALESCE(SUM(f.total), 0) AS gasto_total,
                MAX(s.fecha) AS ultima_visita
            FROM clientes c
            JOIN servicios s ON s.id_cliente = c.id
            LEFT JOIN facturas f ON f.id_servicio = s.id
            WHERE s.fecha >= $1
            GROUP BY c.id, c.nombre, c.telefono, c.correo
            HAVING COUNT(DISTINCT s.id) >= $2
            ORDER BY total_servicios DESC, gasto_total DESC, c.id ASC
            "#,
        )
        .bind(since)
        .bind(min_services)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Top N tipos de serviço de cada cliente da lista, dentro da janela (só serviços com tipo).
    pub async fn top_types_per_client<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
        client_ids: &[i32],
        limit: i64,
    ) -> Result<Vec<KeyedTypeCountRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, KeyedTypeCountRow>(
            r#"
            SELECT clave, tipo, cantidad
            FROM (
                SELECT
                    s.id_cliente AS clave,
                    s.tipo,
                    COUNT(*) AS cantidad,
                    ROW_NUMBER() OVER (
                        PARTITION BY s.id_cliente
                        ORDER BY COUNT(*) DESC, s.tipo ASC
                    ) AS posicion
                FROM servicios s
                WHERE s.fecha >= $1 AND s.id_cliente = ANY($2) AND s.tipo IS NOT NULL
                GROUP BY s.id_cliente, s.tipo
            ) ranking
            WHERE posicion <= $3
            ORDER BY clave, posicion
            "#,
        )
        .bind(since)
        .bind(client_ids)
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 7. Rentabilidade por tipo
    // ---

    pub async fn type_profitability<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<TypeProfitabilityRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Faturamento somado por serviço antes, para o custo não duplicar no join
        let rows = sqlx::query_as::<_, TypeProfitabilityRow>(
            r#"
            WITH por_servicio AS (
                SELECT s.id, s.tipo, s.costo, COALESCE(SUM(f.total), 0) AS facturado
                FROM servicios s
                LEFT JOIN facturas f ON f.id_servicio = s.id
                GROUP BY s.id, s.tipo, s.costo
            )
            SELECT
                tipo,
                COUNT(*) AS total_servicios,
                ROUND(SUM(facturado), 2) AS ingreso_total,
                ROUND(AVG(facturado), 2) AS ingreso_promedio,
                ROUND(MIN(facturado), 2) AS ingreso_minimo,
                ROUND(MAX(facturado), 2) AS ingreso_maximo,
                ROUND(SUM(costo), 2) AS costo_total
            FROM por_servicio
            GROUP BY tipo
            ORDER BY ingreso_total DESC, tipo ASC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn type_monthly_trend<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
    ) -> Result<Vec<TypeMonthRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, TypeMonthRow>(
            r#"
            SELECT
                s.tipo,
                to_char(date_trunc('month', s.fecha), 'YYYY-MM') AS mes,
                COUNT(DISTINCT s.id) AS total_servicios,
                COALESCE(SUM(f.total), 0) AS ingreso_total
            FROM servicios s
            LEFT JOIN facturas f ON f.id_servicio = s.id
            WHERE s.fecha >= $1
            GROUP BY s.tipo, mes
            ORDER BY s.tipo, mes
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 8. Estoque crítico
    // ---

    pub async fn critical_stock<'e, E>(
        &self,
        executor: E,
        threshold: i32,
    ) -> Result<Vec<CriticalStockRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // O uso de um produto é o serviço cujo material tem o mesmo nome
        let rows = sqlx::query_as::<_, CriticalStockRow>(
            r#"
            SELECT
                p.id,
                p.nombre,
                p.tipo,
                p.stock,
                p.precio,
                pr.id AS id_proveedor,
                pr.nombre AS proveedor,
                pr.telefono AS telefono_proveedor,
                pr.correo AS correo_proveedor,
                COUNT(s.id) AS usos,
                MIN(s.fecha) AS primer_uso
            FROM productos p
            LEFT JOIN proveedores pr ON pr.id = p.id_proveedor
            LEFT JOIN servicios s ON LOWER(TRIM(s.material)) = LOWER(TRIM(p.nombre))
            WHERE p.stock <= $1
            GROUP BY p.id, p.nombre, p.tipo, p.stock, p.precio,
                     pr.id, pr.nombre, pr.telefono, pr.correo
            ORDER BY p.stock ASC, p.id ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 10. Retenção
    // ---

    pub async fn client_visits<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
    ) -> Result<Vec<ClientVisitsRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ClientVisitsRow>(
            r#"
            SELECT
                s.id_cliente,
                COUNT(*) AS visitas,
                MIN(s.fecha) AS primera_visita,
                MAX(s.fecha) AS ultima_visita
            FROM servicios s
            WHERE s.fecha >= $1
            GROUP BY s.id_cliente
            ORDER BY s.id_cliente
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn new_clients_per_month<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
    ) -> Result<Vec<MonthCountRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, MonthCountRow>(
            r#"
            SELECT
                to_char(date_trunc('month', c.fecha_registro), 'YYYY-MM') AS mes,
                COUNT(*) AS cantidad
            FROM clientes c
            WHERE c.fecha_registro >= $1
            GROUP BY mes
            ORDER BY mes
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 11. Comparativo de preços
    // ---

    pub async fn type_prices<'e, E>(&self, executor: E) -> Result<Vec<TypePriceRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, TypePriceRow>(
            r#"
            SELECT
                s.tipo,
                COUNT(f.id) AS total_facturas,
                MIN(f.total) AS precio_minimo,
                MAX(f.total) AS precio_maximo,
                ROUND(AVG(f.total), 2) AS precio_promedio,
                ROUND(COALESCE(STDDEV_POP(f.total), 0), 2) AS desviacion_estandar
            FROM servicios s
            JOIN facturas f ON f.id_servicio = s.id
            GROUP BY s.tipo
            ORDER BY precio_promedio DESC, s.tipo ASC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn type_price_trend<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
    ) -> Result<Vec<TypePriceMonthRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, TypePriceMonthRow>(
            r#"
            SELECT
                s.tipo,
                to_char(date_trunc('month', f.fecha), 'YYYY-MM') AS mes,
                ROUND(AVG(f.total), 2) AS precio_promedio,
                COUNT(*) AS total_facturas
            FROM servicios s
            JOIN facturas f ON f.id_servicio = s.id
            WHERE f.fecha >= $1
            GROUP BY s.tipo, mes
            ORDER BY s.tipo, mes
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 12 e 13. Funcionários numa janela de dias
    // ---

    pub async fn employee_efficiency<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
    ) -> Result<Vec<EmployeeEfficiencyRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // O filtro de data fica no JOIN para manter quem não trabalhou no período
        let rows = sqlx::query_as::<_, EmployeeEfficiencyRow>(
            r#"
            SELECT
                e.id,
                e.nombre,
                e.puesto,
                COUNT(DISTINCT s.id) AS total_servicios,
                COUNT(DISTINCT s.fecha) AS dias_activos,
                COALESCE(SUM(f.total), 0) AS ingreso_total
            FROM empleados e
            LEFT JOIN servicios s ON s.id_empleado = e.id AND s.fecha >= $1
            LEFT JOIN facturas f ON f.id_servicio = s.id
            GROUP BY e.id, e.nombre, e.puesto
            ORDER BY ingreso_total DESC, e.id ASC
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn employee_type_breakdown<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
    ) -> Result<Vec<EmployeeTypeRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, EmployeeTypeRow>(
            r#"
            SELECT
                e.id AS id_empleado,
                e.nombre,
                s.tipo,
                COUNT(DISTINCT s.id) AS cantidad,
                COALESCE(SUM(f.total), 0) AS ingreso_total
            FROM empleados e
            JOIN servicios s ON s.id_empleado = e.id
            LEFT JOIN facturas f ON f.id_servicio = s.id
            WHERE s.fecha >= $1
            GROUP BY e.id, e.nombre, s.tipo
            ORDER BY e.id, cantidad DESC, s.tipo ASC
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 14. Desempenho diário
    // ---

    pub async fn daily_performance<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
    ) -> Result<Vec<DailyRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, DailyRow>(
            r#"
            SELECT
                s.fecha,
                COUNT(DISTINCT s.id) AS total_servicios,
                COUNT(DISTINCT s.id_cliente) AS clientes_atendidos,
                COUNT(DISTINCT s.id_empleado) AS empleados_activos,
                COALESCE(SUM(f.total), 0) AS ingreso_total
            FROM servicios s
            LEFT JOIN facturas f ON f.id_servicio = s.id
            WHERE s.fecha >= $1
            GROUP BY s.fecha
            ORDER BY s.fecha DESC
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // ---
    // 15. Formas de pagamento
    // ---

    pub async fn payment_methods<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
    ) -> Result<Vec<PaymentMethodRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, PaymentMethodRow>(
            r#"
            SELECT
                COALESCE(NULLIF(TRIM(f.metodo_pago), ''), 'Sin especificar') AS metodo_pago,
                COUNT(*) AS transacciones,
                COALESCE(SUM(f.total), 0) AS monto_total,
                ROUND(AVG(f.total), 2) AS monto_promedio,
                MIN(f.total) AS monto_minimo,
                MAX(f.total) AS monto_maximo
            FROM facturas f
            WHERE f.fecha >= $1
            GROUP BY 1
            ORDER BY monto_total DESC, metodo_pago ASC
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn payment_method_trend<'e, E>(
        &self,
        executor: E,
        since: NaiveDate,
    ) -> Result<Vec<PaymentMethodMonthRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, PaymentMethodMonthRow>(
            r#"
            SELECT
                COALESCE(NULLIF(TRIM(f.metodo_pago), ''), 'Sin especificar') AS metodo_pago,
                to_char(date_trunc('month', f.fecha), 'YYYY-MM') AS mes,
                COUNT(*) AS transacciones,
                COALESCE(SUM(f.total), 0) AS monto_total
            FROM facturas f
            WHERE f.fecha >= $1
            GROUP BY 1, 2
            ORDER BY 1, 2
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
