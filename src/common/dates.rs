// src/common/dates.rs

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::common::error::AppError;

/// Formato único aceito nas query strings: `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AppError::InvalidArgument(format!(
            "'{}' debe tener el formato AAAA-MM-DD (recibido '{}')",
            field, value
        ))
    })
}

/// Intervalo fechado de datas, validado na borda da requisição.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn parse(start: &str, end: &str) -> Result<Self, AppError> {
        let start = parse_date("fecha_inicio", start)?;
        let end = parse_date("fecha_fin", end)?;
        if start > end {
            return Err(AppError::InvalidArgument(format!(
                "fecha_inicio ({}) es posterior a fecha_fin ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// 1º de janeiro a 31 de dezembro do ano informado.
    pub fn year(year: i32) -> Result<Self, AppError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        let end = NaiveDate::from_ymd_opt(year, 12, 31);
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(AppError::InvalidArgument(format!("año fuera de rango: {}", year))),
        }
    }
}

/// Início de uma janela móvel de `months` meses terminando em `today`.
pub fn months_back(today: NaiveDate, months: u32) -> Result<NaiveDate, AppError> {
    today
        .checked_sub_months(Months::new(months))
        .ok_or_else(|| AppError::InvalidArgument(format!("periodo_meses fuera de rango: {}", months)))
}

pub fn days_back(today: NaiveDate, days: u32) -> Result<NaiveDate, AppError> {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| AppError::InvalidArgument(format!("dias fuera de rango: {}", days)))
}

/// Primeiro dia do mês de `months` meses de calendário atrás, contando o mês
/// corrente: `months = 3` em 2024-05-20 devolve 2024-03-01.
pub fn calendar_months_back(today: NaiveDate, months: u32) -> Result<NaiveDate, AppError> {
    let first_of_month = today.with_day(1).unwrap_or(today);
    months_back(first_of_month, months.saturating_sub(1))
}
