//! Integration tests do CRUD contra um Postgres real.
//!
//! `#[sqlx::test]` cria um banco isolado por teste, aplica as migrações de
//! `migrations/` e o descarta no final. Precisam de `DATABASE_URL`, por isso
//! ficam ignorados por padrão (`cargo test -- --ignored`).

mod common;

#[cfg(test)]
mod entity_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use sqlx::PgPool;

    async fn count(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    // ============================================================
    // create + list
    // ============================================================

    #[sqlx::test]
    #[ignore = "requiere Postgres (DATABASE_URL)"]
    async fn test_created_client_appears_in_list(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server
            .post("/clientes/")
            .json(&json!({
                "Nombre": "Ana Pérez",
                "Teléfono": "555-1234",
                "Dirección": "Av. Siempre Viva 742",
                "FechaRegistro": "2024-03-01"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created = response.json::<Value>();
        assert!(created["ID"].as_i64().is_some());
        assert_eq!(created["Teléfono"], "555-1234");

        let list = server.get("/clientes/").await.json::<Vec<Value>>();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0], created);

        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requiere Postgres (DATABASE_URL)"]
    async fn test_product_defaults_are_applied(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(pool);
        let proveedor = create_id(&server, "/proveedores/", json!({ "Nombre": "Telas del Sur" })).await;

        let response = server
            .post("/productos/")
            .json(&json!({ "Nombre": "Vinilo", "IDProveedor": proveedor }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let producto = response.json::<Value>();
        assert_eq!(producto["Stock"], 0);
        assert_eq!(producto["Precio"], json!(0.0));

        Ok(())
    }

    // ============================================================
    // Integridade referencial
    // ============================================================

    #[sqlx::test]
    #[ignore = "requiere Postgres (DATABASE_URL)"]
    async fn test_product_with_unknown_supplier_is_not_found(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(pool.clone());

        let response = server
            .post("/productos/")
            .json(&json!({ "Nombre": "Cuero", "Stock": 5, "Precio": 100.0, "IDProveedor": 999 }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Proveedor 999 no encontrado");
        assert_eq!(count(&pool, "productos").await, 0);

        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requiere Postgres (DATABASE_URL)"]
    async fn test_service_with_unknown_client_or_employee_is_not_found(
        pool: PgPool,
    ) -> sqlx::Result<()> {
        let server = create_test_server(pool.clone());
        let cliente = create_id(&server, "/clientes/", json!({ "Nombre": "Ana" })).await;
        let empleado = create_id(&server, "/empleados/", json!({ "Nombre": "Luis" })).await;

        let response = server
            .post("/servicios/")
            .json(&json!({ "IDCliente": 777, "IDEmpleado": empleado, "Tipo": "Asientos" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Cliente 777 no encontrado");

        let response = server
            .post("/servicios/")
            .json(&json!({ "IDCliente": cliente, "IDEmpleado": 888, "Tipo": "Asientos" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Empleado 888 no encontrado");

        assert_eq!(count(&pool, "servicios").await, 0);
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requiere Postgres (DATABASE_URL)"]
    async fn test_invoice_with_unknown_service_is_not_found(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(pool.clone());

        let response = server
            .post("/facturas/")
            .json(&json!({ "IDServicio": 42, "Total": 150.0, "MétodoPago": "Efectivo" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(count(&pool, "facturas").await, 0);
        Ok(())
    }

    // ============================================================
    // Lote
    // ============================================================

    #[sqlx::test]
    #[ignore = "requiere Postgres (DATABASE_URL)"]
    async fn test_bulk_returns_increasing_ids_in_input_order(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server
            .post("/clientes/bulk/")
            .json(&json!([
                { "Nombre": "Ana" },
                { "Nombre": "Bruno" },
                { "Nombre": "Carla" }
            ]))
            .await;

        response.assert_status(StatusCode::CREATED);
        let created = response.json::<Vec<Value>>();
        let names: Vec<&str> = created.iter().filter_map(|c| c["Nombre"].as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);

        let ids: Vec<i64> = created.iter().filter_map(|c| c["ID"].as_i64()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let list = server.get("/clientes/").await.json::<Vec<Value>>();
        assert_eq!(list.len(), 3);
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requiere Postgres (DATABASE_URL)"]
    async fn test_bulk_with_one_bad_reference_inserts_nothing(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(pool.clone());
        let cliente = create_id(&server, "/clientes/", json!({ "Nombre": "Ana" })).await;
        let empleado = create_id(&server, "/empleados/", json!({ "Nombre": "Luis" })).await;

        let response = server
            .post("/servicios/bulk/")
            .json(&json!([
                { "IDCliente": cliente, "IDEmpleado": empleado, "Tipo": "Asientos" },
                { "IDCliente": cliente + 100, "IDEmpleado": empleado, "Tipo": "Techo" }
            ]))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(count(&pool, "servicios").await, 0);
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requiere Postgres (DATABASE_URL)"]
    async fn test_empty_bulk_returns_empty_list(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server.post("/facturas/bulk/").json(&json!([])).await;

        response.assert_status(StatusCode::CREATED);
        assert!(response.json::<Vec<Value>>().is_empty());
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requiere Postgres (DATABASE_URL)"]
    async fn test_bulk_larger_than_one_insert_keeps_order(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(pool.clone());
        // 5 colunas por cliente: passa de 65535 binds num INSERT só
        let clientes: Vec<Value> = (0..14_000)
            .map(|i| json!({ "Nombre": format!("C{i}") }))
            .collect();

        let response = server.post("/clientes/bulk/").json(&clientes).await;

        response.assert_status(StatusCode::CREATED);
        let created = response.json::<Vec<Value>>();
        assert_eq!(created.len(), 14_000);
        assert_eq!(created[0]["Nombre"], "C0");
        assert_eq!(created[13_999]["Nombre"], "C13999");

        let ids: Vec<i64> = created.iter().filter_map(|c| c["ID"].as_i64()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(count(&pool, "clientes").await, 14_000);
        Ok(())
    }
}
