// src/db/entity_repo.rs

use sqlx::{Executor, PgConnection, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    db::schema::{Entity, Table},
};

/// Máximo de parâmetros bind que o Postgres aceita num único statement.
const MAX_BIND_PARAMS: usize = 65_535;

// Repositório genérico: as seis tabelas compartilham o mesmo SQL, só muda o descritor.
#[derive(Clone, Default)]
pub struct EntityRepository;

impl EntityRepository {
    pub fn new() -> Self {
        Self
    }

    /// Verifica se existe uma linha com o `id` informado na tabela.
    pub async fn exists<'e, E>(
        &self,
        executor: E,
        table: &Table,
        id: i32,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // O nome da tabela vem de um descritor estático, nunca da requisição.
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table.name);
        let found = sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(found)
    }

    pub async fn list_all<'e, T, E>(&self, executor: E) -> Result<Vec<T::Record>, AppError>
    where
        T: Entity,
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT * FROM {} ORDER BY id ASC", T::TABLE.name);
        let rows = sqlx::query_as::<_, T::Record>(&sql)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    /// Insere os registros em INSERTs multi-linha, um por bloco de
    /// `rows_per_insert::<T>()` linhas. As linhas voltam pelo RETURNING na
    /// ordem dos VALUES e os blocos rodam em sequência, então a ordem do
    /// lote se mantém. Deve rodar dentro de uma transação.
    pub async fn insert_many<T>(
        &self,
        conn: &mut PgConnection,
        records: &[T],
    ) -> Result<Vec<T::Record>, AppError>
    where
        T: Entity,
    {
        let mut created = Vec::with_capacity(records.len());
        for chunk in records.chunks(rows_per_insert::<T>()) {
            let mut builder = insert_query(chunk);
            let rows = builder
                .build_query_as::<T::Record>()
                .fetch_all(&mut *conn)
                .await?;
            created.extend(rows);
        }
        Ok(created)
    }
}

/// Quantas linhas cabem num INSERT sem passar do limite de binds.
pub(crate) fn rows_per_insert<T: Entity>() -> usize {
    (MAX_BIND_PARAMS / T::TABLE.columns.len().max(1)).max(1)
}

pub(crate) fn insert_query<'args, T: Entity>(records: &[T]) -> QueryBuilder<'args, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        T::TABLE.name,
        T::TABLE.columns.join(", ")
    ));
    builder.push_values(records, |row, record| record.push_values(row));
    builder.push(" RETURNING *");
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entities::{NuevaFactura, NuevoCliente, NuevoServicio};
    use rust_decimal::Decimal;

    fn placeholders(sql: &str) -> usize {
        sql.matches('$').count()
    }

    #[test]
    fn insert_binds_every_column_of_every_row() {
        let clientes = vec![
            NuevoCliente {
                nombre: "Ana".into(),
                telefono: None,
                correo: None,
                direccion: None,
                fecha_registro: None,
            },
            NuevoCliente {
                nombre: "Luis".into(),
                telefono: Some("555".into()),
                correo: None,
                direccion: None,
                fecha_registro: None,
            },
        ];
        let builder = insert_query(&clientes);
        let sql = builder.sql();
        assert!(sql.starts_with(
            "INSERT INTO clientes (nombre, telefono, correo, direccion, fecha_registro) VALUES ("
        ));
        assert!(sql.ends_with(" RETURNING *"));
        assert_eq!(placeholders(sql), 2 * 5);
    }

    #[test]
    fn insert_chunks_stay_under_the_bind_limit() {
        assert_eq!(rows_per_insert::<NuevoCliente>(), 13_107);
        assert_eq!(rows_per_insert::<NuevoServicio>(), 10_922);
        assert!(rows_per_insert::<NuevaFactura>() * NuevaFactura::TABLE.columns.len() <= MAX_BIND_PARAMS);
    }

    #[test]
    fn push_values_matches_column_count() {
        let servicio = NuevoServicio {
            id_cliente: 1,
            tipo: Some("Tapizado".into()),
            fecha: None,
            material: None,
            costo: Decimal::ZERO,
            id_empleado: Some(2),
        };
        let sql = insert_query(std::slice::from_ref(&servicio)).sql().to_string();
        assert_eq!(placeholders(&sql), NuevoServicio::TABLE.columns.len());

        let factura = NuevaFactura {
            id_servicio: 1,
            fecha: None,
            total: Decimal::ONE_HUNDRED,
            metodo_pago: None,
        };
        let sql = insert_query(std::slice::from_ref(&factura)).sql().to_string();
        assert_eq!(placeholders(&sql), NuevaFactura::TABLE.columns.len());
    }
}
