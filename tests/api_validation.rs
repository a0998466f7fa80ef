//! Testes da borda HTTP que não dependem do banco:
//! rotas fixas, documentação e rejeições de entrada.

mod common;

#[cfg(test)]
mod validation_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    // ============================================================
    // Rotas fixas
    // ============================================================

    #[tokio::test]
    async fn test_root_returns_welcome_message() {
        let server = create_offline_server();

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "message": "Bienvenido a la API de Servicios de Tapiceria Automotriz"
        }));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = create_offline_server();

        let response = server.get("/api/health").await;

        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[tokio::test]
    async fn test_openapi_lists_entity_and_report_routes() {
        let server = create_offline_server();

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();

        let doc = response.json::<Value>();
        assert_eq!(
            doc["info"]["title"],
            "API de Servicios de Tapiceria Automotriz"
        );
        let paths = doc["paths"].as_object().expect("sin paths");
        for path in [
            "/clientes/",
            "/clientes/bulk/",
            "/facturas/bulk/",
            "/analytics/cliente-gastos",
            "/analytics/stock-critico",
            "/analytics/metodos-pago",
        ] {
            assert!(paths.contains_key(path), "falta {path} en el documento");
        }
    }

    // ============================================================
    // Payloads de criação
    // ============================================================

    #[tokio::test]
    async fn test_create_with_blank_name_is_rejected() {
        let server = create_offline_server();

        let response = server
            .post("/clientes/")
            .json(&json!({ "Nombre": "   ", "Correo": "ana@example.com" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        let details = body["details"].as_object().expect("sin details");
        assert_eq!(details.len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_invalid_email_is_rejected() {
        let server = create_offline_server();

        let response = server
            .post("/empleados/")
            .json(&json!({ "Nombre": "Luis", "Correo": "no-es-un-correo" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_with_negative_stock_is_rejected() {
        let server = create_offline_server();

        let response = server
            .post("/productos/")
            .json(&json!({ "Nombre": "Cuero", "Stock": -1, "IDProveedor": 1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_required_field_is_a_bad_request() {
        let server = create_offline_server();

        // IDServicio é obrigatório na fatura
        let response = server
            .post("/facturas/")
            .json(&json!({ "Total": 100.0 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_bad_request() {
        let server = create_offline_server();

        let response = server
            .post("/clientes/")
            .text("{\"Nombre\": ")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bulk_with_one_invalid_item_is_rejected() {
        let server = create_offline_server();

        let response = server
            .post("/clientes/bulk/")
            .json(&json!([{ "Nombre": "Ana" }, { "Nombre": "" }]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    // ============================================================
    // Parâmetros dos relatórios
    // ============================================================

    #[tokio::test]
    async fn test_period_with_malformed_date_is_rejected() {
        let server = create_offline_server();

        let response = server
            .get("/analytics/servicios-periodo")
            .add_query_param("fecha_inicio", "15-01-2024")
            .add_query_param("fecha_fin", "2024-01-31")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let message = response.json::<Value>()["error"].as_str().unwrap_or_default().to_string();
        assert!(message.contains("fecha_inicio"));
    }

    #[tokio::test]
    async fn test_period_with_inverted_range_is_rejected() {
        let server = create_offline_server();

        let response = server
            .get("/analytics/servicios-periodo")
            .add_query_param("fecha_inicio", "2024-02-01")
            .add_query_param("fecha_fin", "2024-01-01")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_zero_length_windows_are_rejected() {
        let server = create_offline_server();

        for (path, param) in [
            ("/analytics/clientes-frecuentes", "periodo_meses"),
            ("/analytics/retencion-clientes", "periodo_meses"),
            ("/analytics/metodos-pago", "periodo_meses"),
            ("/analytics/eficiencia-empleados", "dias"),
            ("/analytics/servicios-por-empleado", "dias"),
            ("/analytics/rendimiento-diario", "dias"),
        ] {
            let response = server.get(path).add_query_param(param, 0).await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_year_out_of_range_is_rejected() {
        let server = create_offline_server();

        let response = server
            .get("/analytics/tendencias-mensuales")
            .add_query_param("año", 1800)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_client_id_is_a_bad_request() {
        let server = create_offline_server();

        let response = server.get("/analytics/cliente-gastos").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_negative_threshold_is_rejected() {
        let server = create_offline_server();

        let response = server
            .get("/analytics/stock-critico")
            .add_query_param("nivel_critico", -5)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
