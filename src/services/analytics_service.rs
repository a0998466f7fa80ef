// src/services/analytics_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::{
        db_utils::begin_read_snapshot,
        dates::{calendar_months_back, days_back, months_back, DateRange},
        error::AppError,
    },
    db::AnalyticsRepository,
    models::analytics::*,
    services::report_math::{self, TOP_TYPES},
};

/// Limite de estoque usado em "produtos com estoque baixo" de um fornecedor.
const LOW_STOCK_BELOW: i32 = 10;
/// Meses de calendário da tendência de rentabilidade.
const PROFITABILITY_TREND_MONTHS: u32 = 3;
/// Meses da tendência de preços.
const PRICE_TREND_MONTHS: u32 = 6;

/// Data de referência das janelas móveis.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Clone, Default)]
pub struct AnalyticsService {
    repo: AnalyticsRepository,
}

impl AnalyticsService {
    pub fn new(repo: AnalyticsRepository) -> Self {
        Self { repo }
    }

    pub async fn client_spending<'e, E>(
        &self,
        executor: E,
        client_id: i32,
    ) -> Result<ResumenGastoCliente, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        // Lookup e agregado no mesmo snapshot (REPEATABLE READ)
        let mut tx = begin_read_snapshot(executor).await?;

        let nombre = self
            .repo
            .find_client_name(&mut *tx, client_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cliente {client_id}")))?;
        let row = self.repo.client_spending(&mut *tx, client_id).await?;

        tx.commit().await?;
        Ok(report_math::build_client_summary(client_id, nombre, row))
    }

    pub async fn employee_ranking<'e, E>(
        &self,
        executor: E,
    ) -> Result<ReporteRankingEmpleados, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = self.repo.employee_ranking(executor).await?;
        Ok(report_math::build_employee_ranking(rows))
    }

    pub async fn services_in_period<'e, E>(
        &self,
        executor: E,
        range: DateRange,
    ) -> Result<ServiciosPeriodo, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = begin_read_snapshot(executor).await?;

        let totals = self.repo.period_totals(&mut *tx, range.start, range.end).await?;
        let types = self
            .repo
            .top_types_in_period(&mut *tx, range.start, range.end, TOP_TYPES as i64)
            .await?;

        tx.commit().await?;
        Ok(report_math::build_period_report(range, totals, types))
    }

    pub async fn supplier_products<'e, E>(
        &self,
        executor: E,
        supplier_id: i32,
    ) -> Result<AnalisisProveedor, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = begin_read_snapshot(executor).await?;

        let nombre = self
            .repo
            .find_supplier_name(&mut *tx, supplier_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Proveedor {supplier_id}")))?;
        let stock = self.repo.supplier_stock(&mut *tx, supplier_id).await?;
        let most_expensive = self
            .repo
            .most_expensive_products(&mut *tx, supplier_id, TOP_TYPES as i64)
            .await?;
        let low_stock = self
            .repo
            .low_stock_products(&mut *tx, supplier_id, LOW_STOCK_BELOW)
            .await?;

        tx.commit().await?;
        Ok(report_math::build_supplier_analysis(
            supplier_id,
            nombre,
            stock,
            most_expensive,
            low_stock,
        ))
    }

    pub async fn monthly_trends<'e, E>(
        &self,
        executor: E,
        year: i32,
    ) -> Result<TendenciasMensuales, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let range = DateRange::year(year)?;
        let mut tx = begin_read_snapshot(executor).await?;

        let totals = self.repo.monthly_totals(&mut *tx, range.start, range.end).await?;
        let types = self
            .repo
            .monthly_type_counts(&mut *tx, range.start, range.end)
            .await?;

        tx.commit().await?;
        Ok(report_math::build_monthly_trends(year, &totals, &types))
    }

    pub async fn frequent_clients<'e, E>(
        &self,
        executor: E,
        min_servicios: u32,
        periodo_meses: u32,
    ) -> Result<ClientesFrecuentes, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let desde = months_back(today(), periodo_meses)?;
        let mut tx = begin_read_snapshot(executor).await?;

        let rows = self
            .repo
            .frequent_clients(&mut *tx, desde, i64::from(min_servicios))
            .await?;
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        // Sem clientes, a segunda consulta não tem o que enriquecer
        let types = if ids.is_empty() {
            Vec::new()
        } else {
            self.repo
                .top_types_per_client(&mut *tx, desde, &ids, TOP_TYPES as i64)
                .await?
        };

        tx.commit().await?;
        Ok(report_math::build_frequent_clients(
            min_servicios,
            periodo_meses,
            desde,
            rows,
            types,
        ))
    }

    pub async fn service_profitability<'e, E>(
        &self,
        executor: E,
    ) -> Result<ReporteRentabilidad, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let desde = calendar_months_back(today(), PROFITABILITY_TREND_MONTHS)?;
        let mut tx = begin_read_snapshot(executor).await?;

        let rows = self.repo.type_profitability(&mut *tx).await?;
        let trend = self.repo.type_monthly_trend(&mut *tx, desde).await?;

        tx.commit().await?;
        Ok(report_math::build_profitability(desde, rows, trend))
    }

    pub async fn critical_stock<'e, E>(
        &self,
        executor: E,
        nivel_critico: i32,
    ) -> Result<StockCritico, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = self.repo.critical_stock(executor, nivel_critico).await?;
        Ok(report_math::build_critical_stock(nivel_critico, rows, today()))
    }

    pub async fn seasonal_trends<'e, E>(
        &self,
        executor: E,
        year: i32,
    ) -> Result<TendenciasEstacionales, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let range = DateRange::year(year)?;
        let mut tx = begin_read_snapshot(executor).await?;

        let totals = self.repo.monthly_totals(&mut *tx, range.start, range.end).await?;
        let types = self
            .repo
            .monthly_type_counts(&mut *tx, range.start, range.end)
            .await?;

        tx.commit().await?;
        Ok(report_math::build_seasonal_trends(year, &totals, &types))
    }

    pub async fn customer_retention<'e, E>(
        &self,
        executor: E,
        periodo_meses: u32,
    ) -> Result<RetencionClientes, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let desde = months_back(today(), periodo_meses)?;
        let mut tx = begin_read_snapshot(executor).await?;

        let visits = self.repo.client_visits(&mut *tx, desde).await?;
        let new_clients = self.repo.new_clients_per_month(&mut *tx, desde).await?;

        tx.commit().await?;
        Ok(report_math::summarize_retention(
            periodo_meses,
            desde,
            &visits,
            new_clients,
        ))
    }

    pub async fn price_comparison<'e, E>(
        &self,
        executor: E,
    ) -> Result<ComparativaPrecios, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let desde = months_back(today(), PRICE_TREND_MONTHS)?;
        let mut tx = begin_read_snapshot(executor).await?;

        let rows = self.repo.type_prices(&mut *tx).await?;
        let trend = self.repo.type_price_trend(&mut *tx, desde).await?;

        tx.commit().await?;
        Ok(report_math::build_price_comparison(desde, rows, trend))
    }

    pub async fn employee_efficiency<'e, E>(
        &self,
        executor: E,
        dias: u32,
    ) -> Result<EficienciaEmpleados, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let desde = days_back(today(), dias)?;
        let rows = self.repo.employee_efficiency(executor, desde).await?;
        Ok(report_math::build_efficiency(dias, desde, rows))
    }

    pub async fn employee_service_breakdown<'e, E>(
        &self,
        executor: E,
        dias: u32,
    ) -> Result<DesgloseServiciosEmpleados, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let desde = days_back(today(), dias)?;
        let rows = self.repo.employee_type_breakdown(executor, desde).await?;
        Ok(report_math::build_breakdown(dias, desde, rows))
    }

    pub async fn daily_performance<'e, E>(
        &self,
        executor: E,
        dias: u32,
    ) -> Result<RendimientoDiario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let desde = days_back(today(), dias)?;
        let rows = self.repo.daily_performance(executor, desde).await?;
        Ok(report_math::build_daily(dias, desde, rows))
    }

    pub async fn payment_methods<'e, E>(
        &self,
        executor: E,
        periodo_meses: u32,
    ) -> Result<AnalisisMetodosPago, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let desde = months_back(today(), periodo_meses)?;
        let mut tx = begin_read_snapshot(executor).await?;

        let rows = self.repo.payment_methods(&mut *tx, desde).await?;
        let trend = self.repo.payment_method_trend(&mut *tx, desde).await?;

        tx.commit().await?;
        Ok(report_math::build_payment_methods(
            periodo_meses,
            desde,
            rows,
            trend,
        ))
    }
}
