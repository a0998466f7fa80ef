use sqlx::{pool::PoolConnection, Acquire, Postgres, Transaction};

use crate::common::error::AppError;
use crate::config::AppState;

// ---
// Conexão com escopo de requisição
// ---
/// Adquire uma conexão da pool para uma única operação.
///
/// A conexão volta para a pool quando o `PoolConnection` é dropado, então
/// qualquer saída do handler (sucesso, `?` ou panic) a devolve.
pub(crate) async fn acquire_connection(
    app_state: &AppState,
) -> Result<PoolConnection<Postgres>, AppError> {
    // O operador '?' converte automaticamente sqlx::Error -> AppError::DatabaseError
    let conn = app_state.db_pool.acquire().await?;
    tracing::debug!(
        livres = app_state.db_pool.num_idle(),
        "Conexão adquirida da pool"
    );
    Ok(conn)
}

// ---
// Leitura consistente
// ---
pub(crate) const READ_SNAPSHOT_SQL: &str =
    "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

/// Abre uma transação somente leitura em REPEATABLE READ: todas as consultas
/// dela enxergam o mesmo snapshot, tirado na primeira.
pub(crate) async fn begin_read_snapshot<'e, E>(
    executor: E,
) -> Result<Transaction<'e, Postgres>, AppError>
where
    E: Acquire<'e, Database = Postgres>,
{
    let mut tx = executor.begin().await?;
    // Tem que ser o primeiro comando da transação
    sqlx::query(READ_SNAPSHOT_SQL).execute(&mut *tx).await?;
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[ignore = "requiere Postgres (DATABASE_URL)"]
    async fn read_snapshot_is_repeatable_read_and_read_only(pool: PgPool) -> sqlx::Result<()> {
        let mut tx = begin_read_snapshot(&pool).await.expect("transação");

        let isolation: String = sqlx::query_scalar("SHOW transaction_isolation")
            .fetch_one(&mut *tx)
            .await?;
        let read_only: String = sqlx::query_scalar("SHOW transaction_read_only")
            .fetch_one(&mut *tx)
            .await?;

        assert_eq!(isolation, "repeatable read");
        assert_eq!(read_only, "on");
        tx.rollback().await?;
        Ok(())
    }
}
