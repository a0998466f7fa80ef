// src/services/report_math.rs
//
// Montagem dos relatórios a partir das linhas agregadas do banco.
// Tudo aqui é puro (sem I/O), para poder ser testado sem Postgres.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    common::{
        dates::DateRange,
        numeric::{average, percentage, percentage_of_counts, round2, round2_opt, safe_div},
    },
    db::analytics_repo::{
        ClientSpendingRow, ClientVisitsRow, CriticalStockRow, DailyRow, EmployeeEfficiencyRow,
        EmployeeRankingRow, EmployeeTypeRow, FrequentClientRow, KeyedTypeCountRow, MonthCountRow,
        MonthlyTotalsRow, MonthlyTypeCountRow, PaymentMethodMonthRow, PaymentMethodRow,
        PeriodTotalsRow, SupplierStockRow, TypeCountRow, TypeMonthRow, TypePriceMonthRow,
        TypePriceRow, TypeProfitabilityRow,
    },
    models::{analytics::*, entities::Producto},
};

/// Quantos tipos entram nos "top" dos relatórios.
pub const TOP_TYPES: usize = 3;

/// Abaixo de quantos dias de estoque um produto é crítico.
pub const CRITICAL_DAYS: i64 = 30;

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("")
}

// =========================================================================
//  HELPERS
// =========================================================================

/// Ordena por quantidade (desc) e depois pelo nome do tipo, e corta no top N.
pub fn rank_types(mut counts: Vec<TipoServicioFrecuente>, limit: usize) -> Vec<TipoServicioFrecuente> {
    counts.sort_by(|a, b| b.cantidad.cmp(&a.cantidad).then_with(|| a.tipo.cmp(&b.tipo)));
    counts.truncate(limit);
    counts
}

fn to_frecuente(row: TypeCountRow) -> TipoServicioFrecuente {
    TipoServicioFrecuente {
        tipo: row.tipo,
        cantidad: row.cantidad,
    }
}

/// Agrupa preservando a ordem de chegada dentro de cada grupo.
pub fn group_by_key<K, T, U>(
    items: Vec<T>,
    key: impl Fn(&T) -> K,
    map: impl Fn(T) -> U,
) -> HashMap<K, Vec<U>>
where
    K: Eq + Hash,
{
    let mut groups: HashMap<K, Vec<U>> = HashMap::new();
    for item in items {
        let k = key(&item);
        groups.entry(k).or_default().push(map(item));
    }
    groups
}

/// Soma contagens de tipos de vários meses e devolve o top N.
fn merge_type_counts<'a>(
    rows: impl Iterator<Item = &'a MonthlyTypeCountRow>,
    limit: usize,
) -> Vec<TipoServicioFrecuente> {
    let mut totals: HashMap<Option<String>, i64> = HashMap::new();
    for row in rows {
        *totals.entry(row.tipo.clone()).or_default() += row.cantidad;
    }
    let counts = totals
        .into_iter()
        .map(|(tipo, cantidad)| TipoServicioFrecuente { tipo, cantidad })
        .collect();
    rank_types(counts, limit)
}

// =========================================================================
//  1. Gastos de um cliente
// =========================================================================

pub fn build_client_summary(
    client_id: i32,
    nombre: String,
    row: ClientSpendingRow,
) -> ResumenGastoCliente {
    let mensaje = (row.total_servicios == 0)
        .then(|| format!("El cliente {nombre} no tiene servicios registrados"));

    ResumenGastoCliente {
        id_cliente: client_id,
        nombre_cliente: nombre,
        total_servicios: row.total_servicios,
        gasto_total: round2(row.gasto_total),
        gasto_promedio: round2_opt(row.gasto_promedio).unwrap_or(Decimal::ZERO),
        gasto_minimo: round2_opt(row.gasto_minimo).unwrap_or(Decimal::ZERO),
        gasto_maximo: round2_opt(row.gasto_maximo).unwrap_or(Decimal::ZERO),
        ultimo_servicio: row.ultimo_servicio,
        mensaje,
    }
}

// =========================================================================
//  2. Ranking de funcionários
// =========================================================================

pub fn build_employee_ranking(rows: Vec<EmployeeRankingRow>) -> ReporteRankingEmpleados {
    let mensaje = rows
        .is_empty()
        .then(|| "No hay empleados registrados".to_string());

    let empleados = rows
        .into_iter()
        .map(|r| RankingEmpleado {
            id_empleado: r.id,
            nombre: r.nombre,
            puesto: r.puesto,
            total_servicios: r.total_servicios,
            total_ventas: round2(r.total_ventas),
            promedio_venta: round2_opt(r.promedio_venta),
            ultimo_servicio: r.ultimo_servicio,
        })
        .collect();

    ReporteRankingEmpleados { empleados, mensaje }
}

// =========================================================================
//  3. Serviços num período
// =========================================================================

pub fn build_period_report(
    range: DateRange,
    totals: PeriodTotalsRow,
    types: Vec<TypeCountRow>,
) -> ServiciosPeriodo {
    let mensaje = (totals.total_servicios == 0).then(|| {
        format!(
            "No se encontraron servicios entre {} y {}",
            range.start, range.end
        )
    });

    ServiciosPeriodo {
        fecha_inicio: range.start,
        fecha_fin: range.end,
        total_servicios: totals.total_servicios,
        ingreso_total: round2(totals.ingreso_total),
        ingreso_promedio: average(totals.ingreso_total, totals.total_facturas),
        servicios_populares: rank_types(types.into_iter().map(to_frecuente).collect(), TOP_TYPES),
        mensaje,
    }
}

// =========================================================================
//  4. Produtos de um fornecedor
// =========================================================================

pub fn build_supplier_analysis(
    supplier_id: i32,
    nombre: String,
    stock: SupplierStockRow,
    most_expensive: Vec<Producto>,
    low_stock: Vec<Producto>,
) -> AnalisisProveedor {
    let mensaje = (stock.total_productos == 0)
        .then(|| format!("El proveedor {nombre} no tiene productos registrados"));

    AnalisisProveedor {
        id_proveedor: supplier_id,
        nombre_proveedor: nombre,
        total_productos: stock.total_productos,
        valor_inventario: round2(stock.valor_inventario),
        precio_promedio: round2_opt(stock.precio_promedio).unwrap_or(Decimal::ZERO),
        productos_mas_caros: most_expensive,
        productos_stock_bajo: low_stock,
        mensaje,
    }
}

// =========================================================================
//  5. Tendências mensais
// =========================================================================

/// Tipo mais frequente do mês; empate resolvido pelo menor nome.
fn most_popular<'a>(rows: impl Iterator<Item = &'a MonthlyTypeCountRow>) -> Option<String> {
    rows.filter_map(|r| r.tipo.as_ref().map(|tipo| (tipo, r.cantidad)))
        .min_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)))
        .map(|(tipo, _)| tipo.clone())
}

pub fn build_monthly_trends(
    year: i32,
    totals: &[MonthlyTotalsRow],
    types: &[MonthlyTypeCountRow],
) -> TendenciasMensuales {
    let meses: Vec<TendenciaMes> = (1..=12u32)
        .map(|mes| {
            let row = totals.iter().find(|t| t.mes as u32 == mes);
            let (servicios, facturas, ingreso) = row
                .map(|t| (t.total_servicios, t.total_facturas, t.ingreso_total))
                .unwrap_or((0, 0, Decimal::ZERO));

            TendenciaMes {
                mes,
                nombre_mes: month_name(mes).to_string(),
                total_servicios: servicios,
                ingreso_total: round2(ingreso),
                ingreso_promedio: average(ingreso, facturas),
                servicio_mas_popular: most_popular(types.iter().filter(|t| t.mes as u32 == mes)),
            }
        })
        .collect();

    let total_servicios_anual: i64 = meses.iter().map(|m| m.total_servicios).sum();
    let ingreso_total_anual: Decimal = meses.iter().map(|m| m.ingreso_total).sum();

    // Primeiro mês com a maior receita; nenhum quando o ano não faturou
    let mes_mayor_ingreso = meses
        .iter()
        .filter(|m| m.ingreso_total > Decimal::ZERO)
        .fold(None::<&TendenciaMes>, |best, m| match best {
            Some(b) if b.ingreso_total >= m.ingreso_total => Some(b),
            _ => Some(m),
        })
        .map(|m| m.mes);

    let mensaje = (total_servicios_anual == 0)
        .then(|| format!("No hay servicios registrados en {year}"));

    TendenciasMensuales {
        anio: year,
        total_servicios_anual,
        ingreso_total_anual: round2(ingreso_total_anual),
        ingreso_promedio_mensual: average(ingreso_total_anual, 12),
        mes_mayor_ingreso,
        meses,
        mensaje,
    }
}

// =========================================================================
//  6. Clientes frequentes
// =========================================================================

pub fn build_frequent_clients(
    min_servicios: u32,
    periodo_meses: u32,
    desde: NaiveDate,
    rows: Vec<FrequentClientRow>,
    types: Vec<KeyedTypeCountRow>,
) -> ClientesFrecuentes {
    let mut by_client = group_by_key(
        types,
        |t| t.clave,
        |t| TipoServicioFrecuente {
            tipo: t.tipo,
            cantidad: t.cantidad,
        },
    );

    let mensaje = rows.is_empty().then(|| {
        format!(
            "Ningún cliente tiene {min_servicios} o más servicios en los últimos {periodo_meses} meses"
        )
    });

    let clientes = rows
        .into_iter()
        .map(|r| {
            let preferidos = by_client.remove(&r.id).unwrap_or_default();
            ClienteFrecuente {
                id_cliente: r.id,
                nombre: r.nombre,
                telefono: r.telefono,
                correo: r.correo,
                total_servicios: r.total_servicios,
                gasto_total: round2(r.gasto_total),
                gasto_promedio: average(r.gasto_total, r.total_servicios),
                ultima_visita: r.ultima_visita,
                servicios_preferidos: rank_types(preferidos, TOP_TYPES),
            }
        })
        .collect();

    ClientesFrecuentes {
        min_servicios,
        periodo_meses,
        desde,
        clientes,
        mensaje,
    }
}

// =========================================================================
//  7. Rentabilidade
// =========================================================================

pub fn build_profitability(
    desde: NaiveDate,
    rows: Vec<TypeProfitabilityRow>,
    trend: Vec<TypeMonthRow>,
) -> ReporteRentabilidad {
    let mut trend_by_type = group_by_key(
        trend,
        |t| t.tipo.clone(),
        |t| PuntoTendencia {
            mes: t.mes,
            total_servicios: t.total_servicios,
            ingreso_total: round2(t.ingreso_total),
        },
    );

    let mensaje = rows
        .is_empty()
        .then(|| "No hay servicios registrados".to_string());

    let servicios = rows
        .into_iter()
        .map(|r| {
            let margen = r.ingreso_total - r.costo_total;
            RentabilidadServicio {
                tendencia: trend_by_type.remove(&r.tipo).unwrap_or_default(),
                tipo: r.tipo,
                total_servicios: r.total_servicios,
                ingreso_total: round2(r.ingreso_total),
                ingreso_promedio: round2(r.ingreso_promedio),
                ingreso_minimo: round2(r.ingreso_minimo),
                ingreso_maximo: round2(r.ingreso_maximo),
                costo_total: round2(r.costo_total),
                margen: round2(margen),
                margen_porcentaje: percentage(margen, r.ingreso_total),
            }
        })
        .collect();

    ReporteRentabilidad {
        desde,
        servicios,
        mensaje,
    }
}

// =========================================================================
//  8. Estoque crítico
// =========================================================================

#[derive(Debug, Default, PartialEq)]
pub struct DepletionEstimate {
    pub uso_mensual: Option<Decimal>,
    pub dias_para_agotar: Option<Decimal>,
    pub critico: bool,
}

/// Consumo diário = usos / dias desde o primeiro uso. Sem uso (ou sem dias
/// decorridos) não há taxa, e os campos derivados ficam nulos.
pub fn estimate_depletion(
    stock: i32,
    usos: i64,
    primer_uso: Option<NaiveDate>,
    hoy: NaiveDate,
) -> DepletionEstimate {
    let daily = primer_uso
        .map(|first| (hoy - first).num_days())
        .filter(|days| *days > 0 && usos > 0)
        .and_then(|days| safe_div(Decimal::from(usos), Decimal::from(days)));

    let Some(daily) = daily else {
        return DepletionEstimate::default();
    };

    let dias_para_agotar = safe_div(Decimal::from(stock), daily).map(round2);
    DepletionEstimate {
        uso_mensual: daily.checked_mul(Decimal::from(30)).map(round2),
        critico: dias_para_agotar.is_some_and(|d| d < Decimal::from(CRITICAL_DAYS)),
        dias_para_agotar,
    }
}

pub fn build_critical_stock(
    nivel_critico: i32,
    rows: Vec<CriticalStockRow>,
    hoy: NaiveDate,
) -> StockCritico {
    let productos: Vec<ProductoCritico> = rows
        .into_iter()
        .map(|r| {
            let estimate = estimate_depletion(r.stock, r.usos, r.primer_uso, hoy);
            let proveedor = match (r.id_proveedor, r.proveedor) {
                (Some(id_proveedor), Some(nombre)) => Some(ContactoProveedor {
                    id_proveedor,
                    nombre,
                    telefono: r.telefono_proveedor,
                    correo: r.correo_proveedor,
                }),
                _ => None,
            };
            ProductoCritico {
                id_producto: r.id,
                nombre: r.nombre,
                tipo: r.tipo,
                stock: r.stock,
                precio: round2(r.precio),
                proveedor,
                usos_registrados: r.usos,
                primer_uso: r.primer_uso,
                uso_mensual_estimado: estimate.uso_mensual,
                dias_para_agotar: estimate.dias_para_agotar,
                estado_critico: estimate.critico,
            }
        })
        .collect();

    let mensaje = productos
        .is_empty()
        .then(|| format!("No hay productos con stock menor o igual a {nivel_critico}"));

    StockCritico {
        nivel_critico,
        total_productos: productos.len(),
        productos_criticos: productos.iter().filter(|p| p.estado_critico).count(),
        productos,
        mensaje,
    }
}

// =========================================================================
//  9. Tendências sazonais
// =========================================================================

pub fn build_seasonal_trends(
    year: i32,
    totals: &[MonthlyTotalsRow],
    types: &[MonthlyTypeCountRow],
) -> TendenciasEstacionales {
    let in_season = |season: Temporada, mes: i32| {
        u32::try_from(mes)
            .ok()
            .and_then(Temporada::from_month)
            .is_some_and(|s| s == season)
    };

    let temporadas: Vec<ResumenTemporada> = Temporada::ALL
        .into_iter()
        .map(|temporada| {
            let months: Vec<&MonthlyTotalsRow> =
                totals.iter().filter(|t| in_season(temporada, t.mes)).collect();
            let servicios: i64 = months.iter().map(|t| t.total_servicios).sum();
            let facturas: i64 = months.iter().map(|t| t.total_facturas).sum();
            let ingreso: Decimal = months.iter().map(|t| t.ingreso_total).sum();

            ResumenTemporada {
                temporada,
                meses: temporada.months().to_vec(),
                total_servicios: servicios,
                ingreso_total: round2(ingreso),
                ingreso_promedio: average(ingreso, facturas),
                servicios_populares: merge_type_counts(
                    types.iter().filter(|t| in_season(temporada, t.mes)),
                    TOP_TYPES,
                ),
            }
        })
        .collect();

    let temporada_mas_activa = temporadas
        .iter()
        .filter(|t| t.total_servicios > 0)
        .fold(None::<&ResumenTemporada>, |best, t| match best {
            Some(b) if b.total_servicios >= t.total_servicios => Some(b),
            _ => Some(t),
        })
        .map(|t| t.temporada);

    let mensaje = temporada_mas_activa
        .is_none()
        .then(|| format!("No hay servicios registrados en {year}"));

    TendenciasEstacionales {
        anio: year,
        temporadas,
        temporada_mas_activa,
        mensaje,
    }
}

// =========================================================================
//  10. Retenção
// =========================================================================

pub fn summarize_retention(
    periodo_meses: u32,
    desde: NaiveDate,
    visits: &[ClientVisitsRow],
    new_clients: Vec<MonthCountRow>,
) -> RetencionClientes {
    let total_clientes = visits.len() as i64;
    let recurrentes: Vec<&ClientVisitsRow> = visits.iter().filter(|v| v.visitas > 1).collect();
    let clientes_recurrentes = recurrentes.len() as i64;
    let total_visitas: i64 = visits.iter().map(|v| v.visitas).sum();

    // Intervalo médio de cada cliente recorrente, depois a média entre eles
    let intervals: Vec<Decimal> = recurrentes
        .iter()
        .filter_map(|v| {
            let (first, last) = (v.primera_visita?, v.ultima_visita?);
            safe_div(
                Decimal::from((last - first).num_days()),
                Decimal::from(v.visitas - 1),
            )
        })
        .collect();
    let promedio_dias_entre_visitas = safe_div(
        intervals.iter().copied().sum(),
        Decimal::from(intervals.len() as i64),
    )
    .map(round2);

    let mensaje = (total_clientes == 0).then(|| {
        format!("No hay clientes con servicios en los últimos {periodo_meses} meses")
    });

    RetencionClientes {
        periodo_meses,
        desde,
        total_clientes,
        clientes_recurrentes,
        tasa_retencion: percentage_of_counts(clientes_recurrentes, total_clientes),
        promedio_visitas: average(Decimal::from(total_visitas), total_clientes),
        promedio_dias_entre_visitas,
        nuevos_clientes_por_mes: new_clients
            .into_iter()
            .map(|m| NuevosClientesMes {
                mes: m.mes,
                cantidad: m.cantidad,
            })
            .collect(),
        mensaje,
    }
}

// =========================================================================
//  11. Comparativo de preços
// =========================================================================

/// Variação percentual entre o primeiro e o último ponto da tendência.
pub fn price_variation(points: &[PuntoPrecio]) -> Option<Decimal> {
    if points.len() < 2 {
        return None;
    }
    let (first, last) = (points.first()?, points.last()?);
    if first.precio_promedio.is_zero() {
        return None;
    }
    Some(percentage(
        last.precio_promedio - first.precio_promedio,
        first.precio_promedio,
    ))
}

pub fn build_price_comparison(
    desde: NaiveDate,
    rows: Vec<TypePriceRow>,
    trend: Vec<TypePriceMonthRow>,
) -> ComparativaPrecios {
    let mut trend_by_type = group_by_key(
        trend,
        |t| t.tipo.clone(),
        |t| PuntoPrecio {
            mes: t.mes,
            precio_promedio: round2(t.precio_promedio),
            total_facturas: t.total_facturas,
        },
    );

    let mensaje = rows
        .is_empty()
        .then(|| "No hay facturas registradas".to_string());

    let servicios = rows
        .into_iter()
        .map(|r| {
            let tendencia = trend_by_type.remove(&r.tipo).unwrap_or_default();
            let variacion_porcentual = price_variation(&tendencia);
            let nota = variacion_porcentual
                .is_none()
                .then(|| "Datos insuficientes".to_string());
            ComparativaPrecio {
                tipo: r.tipo,
                total_facturas: r.total_facturas,
                precio_minimo: round2(r.precio_minimo),
                precio_maximo: round2(r.precio_maximo),
                precio_promedio: round2(r.precio_promedio),
                desviacion_estandar: round2(r.desviacion_estandar),
                tendencia,
                variacion_porcentual,
                nota,
            }
        })
        .collect();

    ComparativaPrecios {
        desde,
        servicios,
        mensaje,
    }
}

// =========================================================================
//  12. Eficiência
// =========================================================================

pub fn build_efficiency(
    periodo_dias: u32,
    desde: NaiveDate,
    rows: Vec<EmployeeEfficiencyRow>,
) -> EficienciaEmpleados {
    let ingreso_total: Decimal = rows.iter().map(|r| r.ingreso_total).sum();
    let promedio = average(ingreso_total, rows.len() as i64);
    let servicios_periodo: i64 = rows.iter().map(|r| r.total_servicios).sum();

    let empleados = rows
        .into_iter()
        .map(|r| EficienciaEmpleado {
            servicios_por_dia: average(Decimal::from(r.total_servicios), r.dias_activos),
            ingreso_por_servicio: average(r.ingreso_total, r.total_servicios),
            porcentaje_ingresos: percentage(r.ingreso_total, ingreso_total),
            indice_vs_promedio: percentage(r.ingreso_total, promedio),
            id_empleado: r.id,
            nombre: r.nombre,
            puesto: r.puesto,
            total_servicios: r.total_servicios,
            dias_activos: r.dias_activos,
            ingreso_total: round2(r.ingreso_total),
        })
        .collect();

    let mensaje = (servicios_periodo == 0)
        .then(|| format!("No hay servicios en los últimos {periodo_dias} días"));

    EficienciaEmpleados {
        periodo_dias,
        desde,
        ingreso_total: round2(ingreso_total),
        promedio_ingreso_por_empleado: promedio,
        empleados,
        mensaje,
    }
}

// =========================================================================
//  13. Serviços por funcionário
// =========================================================================

pub fn build_breakdown(
    periodo_dias: u32,
    desde: NaiveDate,
    rows: Vec<EmployeeTypeRow>,
) -> DesgloseServiciosEmpleados {
    // Linhas chegam ordenadas por funcionário; dobra as consecutivas
    let mut empleados: Vec<DesgloseEmpleado> = Vec::new();
    for row in rows {
        let tipo = DesgloseTipo {
            tipo: row.tipo,
            cantidad: row.cantidad,
            ingreso_total: round2(row.ingreso_total),
            porcentaje: Decimal::ZERO,
        };
        match empleados.last_mut() {
            Some(current) if current.id_empleado == row.id_empleado => {
                current.total_servicios += tipo.cantidad;
                current.ingreso_total += tipo.ingreso_total;
                current.servicios.push(tipo);
            }
            _ => empleados.push(DesgloseEmpleado {
                id_empleado: row.id_empleado,
                nombre: row.nombre,
                total_servicios: tipo.cantidad,
                ingreso_total: tipo.ingreso_total,
                servicios: vec![tipo],
            }),
        }
    }

    for empleado in &mut empleados {
        let total = empleado.total_servicios;
        for tipo in &mut empleado.servicios {
            tipo.porcentaje = percentage_of_counts(tipo.cantidad, total);
        }
    }
    empleados.sort_by(|a, b| {
        b.total_servicios
            .cmp(&a.total_servicios)
            .then_with(|| a.id_empleado.cmp(&b.id_empleado))
    });

    let mensaje = empleados
        .is_empty()
        .then(|| format!("No hay servicios en los últimos {periodo_dias} días"));

    DesgloseServiciosEmpleados {
        periodo_dias,
        desde,
        empleados,
        mensaje,
    }
}

// =========================================================================
//  14. Desempenho diário
// =========================================================================

pub fn build_daily(dias: u32, desde: NaiveDate, rows: Vec<DailyRow>) -> RendimientoDiario {
    let total_servicios: i64 = rows.iter().map(|r| r.total_servicios).sum();
    let ingreso_total: Decimal = rows.iter().map(|r| r.ingreso_total).sum();
    // Média sobre os dias com movimento
    let promedio = average(ingreso_total, rows.len() as i64);

    let mejor_dia = rows
        .iter()
        .fold(None::<&DailyRow>, |best, r| match best {
            Some(b) if b.ingreso_total >= r.ingreso_total => Some(b),
            _ => Some(r),
        })
        .map(|r| r.fecha);

    let detalle = rows
        .into_iter()
        .map(|r| RendimientoDia {
            ticket_promedio: average(r.ingreso_total, r.total_servicios),
            variacion_vs_promedio: percentage(r.ingreso_total - promedio, promedio),
            fecha: r.fecha,
            total_servicios: r.total_servicios,
            clientes_atendidos: r.clientes_atendidos,
            empleados_activos: r.empleados_activos,
            ingreso_total: round2(r.ingreso_total),
        })
        .collect::<Vec<_>>();

    let mensaje = detalle
        .is_empty()
        .then(|| format!("No hay servicios en los últimos {dias} días"));

    RendimientoDiario {
        dias,
        desde,
        total_servicios,
        ingreso_total: round2(ingreso_total),
        promedio_ingreso_diario: promedio,
        mejor_dia,
        detalle,
        mensaje,
    }
}

// =========================================================================
//  15. Formas de pagamento
// =========================================================================

pub fn build_payment_methods(
    periodo_meses: u32,
    desde: NaiveDate,
    rows: Vec<PaymentMethodRow>,
    trend: Vec<PaymentMethodMonthRow>,
) -> AnalisisMetodosPago {
    let total_transacciones: i64 = rows.iter().map(|r| r.transacciones).sum();
    let monto_total: Decimal = rows.iter().map(|r| r.monto_total).sum();

    let mut trend_by_method = group_by_key(
        trend,
        |t| t.metodo_pago.clone(),
        |t| PuntoMetodoPago {
            mes: t.mes,
            transacciones: t.transacciones,
            monto_total: round2(t.monto_total),
        },
    );

    let metodos = rows
        .into_iter()
        .map(|r| MetodoPago {
            tendencia: trend_by_method.remove(&r.metodo_pago).unwrap_or_default(),
            porcentaje_transacciones: percentage_of_counts(r.transacciones, total_transacciones),
            porcentaje_monto: percentage(r.monto_total, monto_total),
            metodo_pago: r.metodo_pago,
            transacciones: r.transacciones,
            monto_total: round2(r.monto_total),
            monto_promedio: round2(r.monto_promedio),
            monto_minimo: round2(r.monto_minimo),
            monto_maximo: round2(r.monto_maximo),
        })
        .collect::<Vec<_>>();

    let mensaje = metodos
        .is_empty()
        .then(|| format!("No hay facturas en los últimos {periodo_meses} meses"));

    AnalisisMetodosPago {
        periodo_meses,
        desde,
        total_transacciones,
        monto_total: round2(monto_total),
        metodos,
        mensaje,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tipo(t: &str, n: i64) -> TipoServicioFrecuente {
        TipoServicioFrecuente {
            tipo: Some(t.to_string()),
            cantidad: n,
        }
    }

    fn month_type(mes: i32, t: &str, n: i64) -> MonthlyTypeCountRow {
        MonthlyTypeCountRow {
            mes,
            tipo: Some(t.to_string()),
            cantidad: n,
        }
    }

    fn month_totals(mes: i32, servicios: i64, facturas: i64, ingreso: Decimal) -> MonthlyTotalsRow {
        MonthlyTotalsRow {
            mes,
            total_servicios: servicios,
            total_facturas: facturas,
            ingreso_total: ingreso,
        }
    }

    #[test]
    fn rank_types_orders_by_count_then_name() {
        let ranked = rank_types(
            vec![tipo("Volante", 2), tipo("Asientos", 5), tipo("Techo", 2), tipo("Alfombra", 1)],
            TOP_TYPES,
        );
        let names: Vec<_> = ranked.iter().filter_map(|t| t.tipo.as_deref()).collect();
        assert_eq!(names, vec!["Asientos", "Techo", "Volante"]);
    }

    #[test]
    fn monthly_trends_fill_all_months_and_break_ties_alphabetically() {
        let totals = vec![
            month_totals(1, 2, 2, dec!(300.00)),
            month_totals(3, 1, 1, dec!(450.50)),
        ];
        let types = vec![
            month_type(1, "Tapizado", 1),
            month_type(1, "Asientos", 1),
            month_type(3, "Techo", 1),
        ];

        let report = build_monthly_trends(2024, &totals, &types);

        assert_eq!(report.meses.len(), 12);
        assert_eq!(report.meses[0].nombre_mes, "Enero");
        assert_eq!(report.meses[0].servicio_mas_popular.as_deref(), Some("Asientos"));
        assert_eq!(report.meses[0].ingreso_promedio, dec!(150.00));
        assert_eq!(report.meses[1].total_servicios, 0);
        assert_eq!(report.meses[1].servicio_mas_popular, None);
        assert_eq!(report.total_servicios_anual, 3);
        assert_eq!(report.ingreso_total_anual, dec!(750.50));
        assert_eq!(report.ingreso_promedio_mensual, dec!(62.54));
        assert_eq!(report.mes_mayor_ingreso, Some(3));
        assert!(report.mensaje.is_none());
    }

    #[test]
    fn monthly_trends_for_an_empty_year_carry_a_message() {
        let report = build_monthly_trends(2020, &[], &[]);
        assert_eq!(report.total_servicios_anual, 0);
        assert_eq!(report.mes_mayor_ingreso, None);
        assert!(report.mensaje.is_some());
    }

    #[test]
    fn seasons_fold_december_into_winter() {
        let totals = vec![
            month_totals(12, 2, 2, dec!(200)),
            month_totals(1, 1, 1, dec!(100)),
            month_totals(7, 1, 1, dec!(80)),
        ];
        let types = vec![month_type(12, "Asientos", 2), month_type(1, "Asientos", 1)];

        let report = build_seasonal_trends(2024, &totals, &types);

        let invierno = &report.temporadas[0];
        assert_eq!(invierno.temporada, Temporada::Invierno);
        assert_eq!(invierno.meses, vec![12, 1, 2]);
        assert_eq!(invierno.total_servicios, 3);
        assert_eq!(invierno.ingreso_total, dec!(300));
        assert_eq!(invierno.servicios_populares, vec![tipo("Asientos", 3)]);
        assert_eq!(report.temporadas[2].total_servicios, 1);
        assert_eq!(report.temporada_mas_activa, Some(Temporada::Invierno));
    }

    #[test]
    fn depletion_is_null_for_products_never_used() {
        let hoy = date(2024, 6, 1);
        assert_eq!(estimate_depletion(5, 0, None, hoy), DepletionEstimate::default());
        // usado só hoje: zero dias decorridos, taxa indefinida
        assert_eq!(estimate_depletion(5, 1, Some(hoy), hoy), DepletionEstimate::default());
    }

    #[test]
    fn depletion_estimates_daily_usage_from_first_use() {
        let hoy = date(2024, 1, 11);
        // 5 usos em 10 dias = 0.5 por dia
        let estimate = estimate_depletion(4, 5, Some(date(2024, 1, 1)), hoy);
        assert_eq!(estimate.uso_mensual, Some(dec!(15.00)));
        assert_eq!(estimate.dias_para_agotar, Some(dec!(8.00)));
        assert!(estimate.critico);

        let slow = estimate_depletion(10, 1, Some(date(2023, 1, 11)), hoy);
        assert!(!slow.critico);
    }

    #[test]
    fn critical_stock_report_counts_flagged_products() {
        let row = |id, stock, usos, primer_uso| CriticalStockRow {
            id,
            nombre: format!("Producto {id}"),
            tipo: None,
            stock,
            precio: dec!(10),
            id_proveedor: Some(1),
            proveedor: Some("Telas SA".into()),
            telefono_proveedor: None,
            correo_proveedor: None,
            usos,
            primer_uso,
        };
        let report = build_critical_stock(
            10,
            vec![row(1, 0, 3, Some(date(2024, 1, 1))), row(2, 8, 0, None)],
            date(2024, 2, 1),
        );
        assert_eq!(report.total_productos, 2);
        assert_eq!(report.productos_criticos, 1);
        assert!(report.productos[0].proveedor.is_some());
        assert_eq!(report.productos[1].dias_para_agotar, None);
        assert!(!report.productos[1].estado_critico);
    }

    #[test]
    fn retention_rate_and_visit_interval() {
        let visits = vec![
            ClientVisitsRow {
                id_cliente: 1,
                visitas: 3,
                primera_visita: Some(date(2024, 1, 1)),
                ultima_visita: Some(date(2024, 1, 21)),
            },
            ClientVisitsRow {
                id_cliente: 2,
                visitas: 1,
                primera_visita: Some(date(2024, 2, 1)),
                ultima_visita: Some(date(2024, 2, 1)),
            },
        ];
        let report = summarize_retention(12, date(2023, 6, 1), &visits, vec![]);
        assert_eq!(report.total_clientes, 2);
        assert_eq!(report.clientes_recurrentes, 1);
        assert_eq!(report.tasa_retencion, dec!(50.00));
        assert_eq!(report.promedio_visitas, dec!(2.00));
        assert_eq!(report.promedio_dias_entre_visitas, Some(dec!(10.00)));
    }

    #[test]
    fn retention_without_clients_is_zero_not_an_error() {
        let report = summarize_retention(12, date(2023, 6, 1), &[], vec![]);
        assert_eq!(report.tasa_retencion, Decimal::ZERO);
        assert_eq!(report.promedio_dias_entre_visitas, None);
        assert!(report.mensaje.is_some());
    }

    #[test]
    fn price_variation_needs_two_points() {
        let punto = |mes: &str, precio| PuntoPrecio {
            mes: mes.to_string(),
            precio_promedio: precio,
            total_facturas: 1,
        };
        assert_eq!(price_variation(&[punto("2024-01", dec!(100))]), None);
        assert_eq!(
            price_variation(&[punto("2024-01", dec!(100)), punto("2024-03", dec!(125))]),
            Some(dec!(25.00))
        );
        assert_eq!(
            price_variation(&[punto("2024-01", dec!(0)), punto("2024-03", dec!(125))]),
            None
        );
    }

    #[test]
    fn single_month_price_trend_reports_insufficient_data() {
        let rows = vec![TypePriceRow {
            tipo: Some("Tapizado".into()),
            total_facturas: 1,
            precio_minimo: dec!(100),
            precio_maximo: dec!(100),
            precio_promedio: dec!(100),
            desviacion_estandar: dec!(0),
        }];
        let trend = vec![TypePriceMonthRow {
            tipo: Some("Tapizado".into()),
            mes: "2024-05".into(),
            precio_promedio: dec!(100),
            total_facturas: 1,
        }];
        let report = build_price_comparison(date(2023, 12, 1), rows, trend);
        let servicio = &report.servicios[0];
        assert_eq!(servicio.tendencia.len(), 1);
        assert_eq!(servicio.variacion_porcentual, None);
        assert_eq!(servicio.nota.as_deref(), Some("Datos insuficientes"));
    }

    #[test]
    fn efficiency_guards_idle_employees() {
        let rows = vec![
            EmployeeEfficiencyRow {
                id: 1,
                nombre: "Ana".into(),
                puesto: None,
                total_servicios: 4,
                dias_activos: 2,
                ingreso_total: dec!(300),
            },
            EmployeeEfficiencyRow {
                id: 2,
                nombre: "Luis".into(),
                puesto: None,
                total_servicios: 0,
                dias_activos: 0,
                ingreso_total: dec!(0),
            },
        ];
        let report = build_efficiency(30, date(2024, 1, 1), rows);
        assert_eq!(report.promedio_ingreso_por_empleado, dec!(150.00));
        let ana = &report.empleados[0];
        assert_eq!(ana.servicios_por_dia, dec!(2.00));
        assert_eq!(ana.porcentaje_ingresos, dec!(100.00));
        assert_eq!(ana.indice_vs_promedio, dec!(200.00));
        let luis = &report.empleados[1];
        assert_eq!(luis.servicios_por_dia, Decimal::ZERO);
        assert_eq!(luis.ingreso_por_servicio, Decimal::ZERO);
    }

    #[test]
    fn breakdown_groups_rows_per_employee() {
        let row = |id, t: &str, n, ingreso| EmployeeTypeRow {
            id_empleado: id,
            nombre: format!("Empleado {id}"),
            tipo: Some(t.to_string()),
            cantidad: n,
            ingreso_total: ingreso,
        };
        let report = build_breakdown(
            30,
            date(2024, 1, 1),
            vec![
                row(1, "Asientos", 1, dec!(100)),
                row(2, "Asientos", 3, dec!(300)),
                row(2, "Techo", 1, dec!(50)),
            ],
        );
        assert_eq!(report.empleados.len(), 2);
        let top = &report.empleados[0];
        assert_eq!(top.id_empleado, 2);
        assert_eq!(top.total_servicios, 4);
        assert_eq!(top.ingreso_total, dec!(350));
        assert_eq!(top.servicios[0].porcentaje, dec!(75.00));
        assert_eq!(top.servicios[1].porcentaje, dec!(25.00));
    }

    #[test]
    fn daily_report_compares_each_day_with_the_average() {
        let row = |d, ingreso| DailyRow {
            fecha: date(2024, 1, d),
            total_servicios: 2,
            clientes_atendidos: 2,
            empleados_activos: 1,
            ingreso_total: ingreso,
        };
        let report = build_daily(7, date(2024, 1, 1), vec![row(3, dec!(300)), row(2, dec!(100))]);
        assert_eq!(report.promedio_ingreso_diario, dec!(200.00));
        assert_eq!(report.mejor_dia, Some(date(2024, 1, 3)));
        assert_eq!(report.detalle[0].variacion_vs_promedio, dec!(50.00));
        assert_eq!(report.detalle[1].variacion_vs_promedio, dec!(-50.00));
        assert_eq!(report.detalle[0].ticket_promedio, dec!(150.00));
    }

    #[test]
    fn payment_methods_share_of_total() {
        let row = |m: &str, n, total| PaymentMethodRow {
            metodo_pago: m.to_string(),
            transacciones: n,
            monto_total: total,
            monto_promedio: dec!(0),
            monto_minimo: dec!(0),
            monto_maximo: dec!(0),
        };
        let trend = vec![PaymentMethodMonthRow {
            metodo_pago: "Efectivo".into(),
            mes: "2024-01".into(),
            transacciones: 3,
            monto_total: dec!(300),
        }];
        let report = build_payment_methods(
            6,
            date(2023, 8, 1),
            vec![row("Efectivo", 3, dec!(300)), row("Sin especificar", 1, dec!(100))],
            trend,
        );
        assert_eq!(report.total_transacciones, 4);
        assert_eq!(report.metodos[0].porcentaje_transacciones, dec!(75.00));
        assert_eq!(report.metodos[0].porcentaje_monto, dec!(75.00));
        assert_eq!(report.metodos[0].tendencia.len(), 1);
        assert!(report.metodos[1].tendencia.is_empty());
    }

    #[test]
    fn client_summary_without_services_is_zero_filled() {
        let row = ClientSpendingRow {
            total_servicios: 0,
            gasto_total: Decimal::ZERO,
            gasto_promedio: None,
            gasto_minimo: None,
            gasto_maximo: None,
            ultimo_servicio: None,
        };
        let summary = build_client_summary(7, "Ana".into(), row);
        assert_eq!(summary.gasto_promedio, Decimal::ZERO);
        assert_eq!(summary.gasto_maximo, Decimal::ZERO);
        assert!(summary.mensaje.is_some());
    }
}
