// src/services/entity_service.rs

use std::collections::HashSet;

use sqlx::{Acquire, Executor, PgConnection, Postgres};

use crate::{
    common::error::AppError,
    db::{schema::Entity, EntityRepository},
};

#[derive(Clone, Default)]
pub struct EntityService {
    repo: EntityRepository,
}

impl EntityService {
    pub fn new(repo: EntityRepository) -> Self {
        Self { repo }
    }

    /// Cria um registro. Mesmo caminho do lote, com um único elemento.
    pub async fn create<'e, T, E>(&self, executor: E, record: T) -> Result<T::Record, AppError>
    where
        T: Entity,
        E: Acquire<'e, Database = Postgres>,
    {
        let mut created = self.create_bulk(executor, vec![record]).await?;
        created
            .pop()
            .ok_or(AppError::DatabaseError(sqlx::Error::RowNotFound))
    }

    pub async fn list<'e, T, E>(&self, executor: E) -> Result<Vec<T::Record>, AppError>
    where
        T: Entity,
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_all::<T, _>(executor).await
    }

    /// Cria vários registros de forma atômica: ou entram todos, ou nenhum.
    pub async fn create_bulk<'e, T, E>(
        &self,
        executor: E,
        records: Vec<T>,
    ) -> Result<Vec<T::Record>, AppError>
    where
        T: Entity,
        E: Acquire<'e, Database = Postgres>,
    {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        // Se qualquer passo falhar, o drop da transação faz o rollback.
        let mut tx = executor.begin().await?;

        // 1. Integridade referencial, na ordem do array
        self.check_references(&mut *tx, &records).await?;

        // 2. Inserts multi-linha, em blocos que respeitam o limite de binds
        let created = self.repo.insert_many(&mut *tx, &records).await?;

        tx.commit().await?;

        tracing::info!(
            tabela = T::TABLE.name,
            registros = created.len(),
            "Registros inseridos"
        );
        Ok(created)
    }

    async fn check_references<T: Entity>(
        &self,
        conn: &mut PgConnection,
        records: &[T],
    ) -> Result<(), AppError> {
        // Cada (tabela, id) só é consultado uma vez por lote
        let mut verified: HashSet<(&'static str, i32)> = HashSet::new();

        for record in records {
            for fk in record.references() {
                let Some(id) = fk.id else {
                    tracing::warn!(tabela = T::TABLE.name, referencia = fk.table.name, "Referência ausente");
                    return Err(AppError::ReferenceNotFound {
                        label: fk.table.label,
                        value: "sin especificar".to_string(),
                    });
                };

                if verified.contains(&(fk.table.name, id)) {
                    continue;
                }

                if !self.repo.exists(&mut *conn, fk.table, id).await? {
                    tracing::warn!(tabela = T::TABLE.name, referencia = fk.table.name, id, "Referência não encontrada");
                    return Err(AppError::ReferenceNotFound {
                        label: fk.table.label,
                        value: id.to_string(),
                    });
                }
                verified.insert((fk.table.name, id));
            }
        }
        Ok(())
    }
}
