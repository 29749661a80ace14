// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, tenancy::company_guard},
};

pub fn create_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/signup", post(handlers::auth::signup))
        .route("/update-password", post(handlers::auth::update_password));

    // Qualquer usuário logado
    let user_routes = Router::new()
        .route("/me", get(handlers::users::get_me))
        .route("/me/password", put(handlers::users::change_password))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Funcionário (papel conferido no handler) com empresa ativa
    let employee_routes = Router::new()
        .route("/time-clock", post(handlers::time_clock::register))
        .route("/time-clock/status", get(handlers::time_clock::status))
        .route("/time-clock/records", get(handlers::time_clock::records))
        .route(
            "/absences",
            post(handlers::absences::create).get(handlers::absences::list_mine),
        )
        .route("/absences/suggestions", post(handlers::absences::suggest))
        .route("/calendar", get(handlers::calendar::month_view));

    let company_routes = Router::new()
        .route("/", get(handlers::company::get_company))
        .route(
            "/employees",
            get(handlers::company::list_employees).post(handlers::company::create_employee),
        )
        .route(
            "/employees/{id}",
            get(handlers::company::get_employee).put(handlers::company::update_employee),
        )
        .route("/employees/{id}/toggle-status", post(handlers::company::toggle_employee_status))
        .route("/employees/{id}/history", get(handlers::company::employee_history))
        .route("/absences", get(handlers::company::list_absences))
        .route("/absences/upcoming", get(handlers::company::upcoming_absences))
        .route("/absences/{id}/status", put(handlers::company::resolve_absence))
        .route("/attendance", get(handlers::company::team_attendance));

    // Auth primeiro, depois a resolução da empresa (a última layer roda antes)
    let tenant_routes = Router::new()
        .merge(employee_routes)
        .nest("/company", company_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), company_guard))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let admin_routes = Router::new()
        .route("/companies", get(handlers::admin::list_companies))
        .route("/companies/invite", post(handlers::admin::invite_company))
        .route("/companies/expiring", get(handlers::admin::expiring_companies))
        .route("/companies/expire-overdue", post(handlers::admin::expire_overdue))
        .route("/companies/{id}/approve-payment", post(handlers::admin::approve_payment))
        .route("/companies/{id}/revoke", post(handlers::admin::revoke_access))
        .route("/companies/{id}/plan", put(handlers::admin::change_plan))
        .route("/companies/{id}/expiry", put(handlers::admin::change_expiry))
        .route(
            "/plans",
            get(handlers::admin::list_plans).post(handlers::admin::create_plan),
        )
        .route("/plans/{id}", put(handlers::admin::update_plan))
        .route("/history", get(handlers::admin::history))
        .route("/me/phone", put(handlers::admin::update_phone))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .route("/api/health", get(handlers::health::health))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api", tenant_routes)
        .nest_service("/storage", ServeDir::new(&app_state.settings.storage_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use chrono::{Days, Local};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        models::company::{InviteCompanyPayload, PaymentStatus},
        testing::{Fixture, PASSWORD},
    };

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router, role: &str, identifier: &str) -> String {
        let body = json!({ "role": role, "identifier": identifier, "password": PASSWORD });
        let response = app.clone().oneshot(request("POST", "/api/auth/login", None, Some(body))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["data"]["token"].as_str().unwrap().to_string()
    }

    fn next_month() -> chrono::NaiveDate {
        Local::now().date_naive() + Days::new(30)
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = create_router(Fixture::new().state());
        let response = app.oneshot(request("GET", "/api/health", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let app = create_router(Fixture::new().state());

        let response = app.oneshot(request("GET", "/api/users/me", None, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Token de autenticação inválido ou ausente.");
    }

    #[tokio::test]
    async fn errors_follow_accept_language() {
        let fx = Fixture::new();
        let (_, company) = fx.company("Padaria", PaymentStatus::Pago, Some(next_month()));
        let (_, employee) = fx.employee(&company, "João");
        let app = create_router(fx.state());

        let body = json!({ "role": "funcionario", "identifier": employee.email, "password": "errada1" });
        let mut req = request("POST", "/api/auth/login", None, Some(body));
        req.headers_mut().insert(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9".parse().unwrap());
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["message"], "Invalid credentials. Check your data.");
    }

    #[tokio::test]
    async fn employee_clocks_in_through_the_api() {
        let fx = Fixture::new();
        let (_, company) = fx.company("Padaria", PaymentStatus::Pago, Some(next_month()));
        let (profile, _) = fx.employee(&company, "João");
        let app = create_router(fx.state());
        let token = login(&app, "funcionario", profile.tax_id.as_deref().unwrap()).await;

        let body = json!({ "action": "in", "justification": "Câmera do celular quebrada" });
        let response = app
            .clone()
            .oneshot(request("POST", "/api/time-clock", Some(&token), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert!(body["message"].as_str().unwrap().starts_with("Entrada registrada"));
        assert_eq!(body["data"]["record"]["status"], "Aberto");

        let response = app
            .oneshot(request("GET", "/api/time-clock/status", Some(&token), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["clockedIn"], true);
    }

    #[tokio::test]
    async fn unknown_clock_action_comes_back_in_the_envelope() {
        let fx = Fixture::new();
        let (_, company) = fx.company("Padaria", PaymentStatus::Pago, Some(next_month()));
        let (profile, _) = fx.employee(&company, "João");
        let app = create_router(fx.state());
        let token = login(&app, "funcionario", &profile.email).await;

        let body = json!({ "action": "pause", "justification": "Intervalo para o almoço" });
        let response = app
            .oneshot(request("POST", "/api/time-clock", Some(&token), Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Requisição inválida: "));
        assert!(fx.store.attendance_records().is_empty());
    }

    #[tokio::test]
    async fn malformed_path_id_is_translated() {
        let fx = Fixture::new();
        let (owner, _) = fx.company("Padaria", PaymentStatus::Pago, Some(next_month()));
        let app = create_router(fx.state());
        let token = login(&app, "empresa", owner.tax_id.as_deref().unwrap()).await;

        let mut req = request("GET", "/api/company/employees/nao-e-uuid", Some(&token), None);
        req.headers_mut().insert(header::ACCEPT_LANGUAGE, "en".parse().unwrap());
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request: "));
    }

    #[tokio::test]
    async fn reads_use_the_success_envelope() {
        let fx = Fixture::new();
        let (owner, company) = fx.company("Padaria", PaymentStatus::Pago, Some(next_month()));
        fx.employee(&company, "João");
        let app = create_router(fx.state());
        let token = login(&app, "empresa", owner.tax_id.as_deref().unwrap()).await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/company/employees", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Dados carregados com sucesso.");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let response = app.oneshot(request("GET", "/api/company", Some(&token), None)).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], company.id.to_string());
    }

    #[tokio::test]
    async fn clock_without_evidence_is_rejected() {
        let fx = Fixture::new();
        let (_, company) = fx.company("Padaria", PaymentStatus::Pago, Some(next_month()));
        let (profile, _) = fx.employee(&company, "João");
        let app = create_router(fx.state());
        let token = login(&app, "funcionario", &profile.email).await;

        let body = json!({ "action": "in", "justification": "curta" });
        let response = app
            .oneshot(request("POST", "/api/time-clock", Some(&token), Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(fx.store.attendance_records().is_empty());
    }

    #[tokio::test]
    async fn roles_are_enforced_per_area() {
        let fx = Fixture::new();
        let (owner, company) = fx.company("Padaria", PaymentStatus::Pago, Some(next_month()));
        let (profile, _) = fx.employee(&company, "João");
        let app = create_router(fx.state());
        let employee_token = login(&app, "funcionario", &profile.email).await;
        let company_token = login(&app, "empresa", owner.tax_id.as_deref().unwrap()).await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/admin/companies", Some(&employee_token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/company/employees", Some(&employee_token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/time-clock/status", Some(&company_token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(request("GET", "/api/company/employees", Some(&company_token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn revoked_company_loses_access_on_the_next_request() {
        let fx = Fixture::new();
        let (owner, company) = fx.company("Padaria", PaymentStatus::Pago, Some(next_month()));
        let admin = fx.admin("admin@ponto.app");
        let state = fx.state();
        let app = create_router(state.clone());
        let token = login(&app, "empresa", owner.tax_id.as_deref().unwrap()).await;

        state.admin_service.revoke_access(admin.id, company.id).await.unwrap();

        let response = app.oneshot(request("GET", "/api/company", Some(&token), None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            json_body(response).await["message"],
            "O acesso desta empresa ainda não foi liberado pelo administrador."
        );
    }

    #[tokio::test]
    async fn pending_is_not_an_accepted_decision() {
        let fx = Fixture::new();
        let (owner, _) = fx.company("Padaria", PaymentStatus::Pago, Some(next_month()));
        let app = create_router(fx.state());
        let token = login(&app, "empresa", owner.tax_id.as_deref().unwrap()).await;

        let response = app
            .oneshot(request(
                "PUT",
                "/api/company/absences/1/status",
                Some(&token),
                Some(json!({ "status": "Pendente" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Requisição inválida: "));
        assert!(body["message"].as_str().unwrap().contains("Pendente"));
    }

    #[tokio::test]
    async fn admin_approves_payment_through_the_api() {
        let fx = Fixture::new();
        fx.admin("admin@ponto.app");
        let (_, company) = fx.company("Padaria", PaymentStatus::Pendente, None);
        let app = create_router(fx.state());
        let token = login(&app, "admin", "admin@ponto.app").await;

        let body = json!({ "paymentMethod": "PIX", "notes": "Pago no balcão" });
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/api/admin/companies/{}/approve-payment", company.id),
                Some(&token),
                Some(body.clone()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["message"], "O acesso para Padaria foi liberado.");
        assert_eq!(json["data"]["paymentStatus"], "Pago");

        let response = app
            .oneshot(request(
                "POST",
                &format!("/api/admin/companies/{}/approve-payment", company.id),
                Some(&token),
                Some(body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invited_company_sets_password_and_waits_for_release() {
        let fx = Fixture::new();
        let admin = fx.admin("admin@ponto.app");
        let state = fx.state();
        let payload = InviteCompanyPayload {
            name: "Mercado Bom".into(),
            cnpj: "11.222.333/0001-44".into(),
            plan_id: 1,
            email: "contato@mercado.com".into(),
        };
        state
            .admin_service
            .invite_company(admin.id, &payload, Local::now().date_naive())
            .await
            .unwrap();
        let app = create_router(state);
        let invite = fx.identity.invite_token("contato@mercado.com").unwrap();

        let body = json!({ "token": invite, "password": "novaSenha1", "passwordConfirmation": "novaSenha1" });
        let response = app
            .clone()
            .oneshot(request("POST", "/api/auth/update-password", None, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Senha definida, mas o acesso ainda depende do pagamento
        let body = json!({ "role": "empresa", "identifier": "11.222.333/0001-44", "password": "novaSenha1" });
        let response = app.oneshot(request("POST", "/api/auth/login", None, Some(body))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn suggestions_come_from_the_generator() {
        let fx = Fixture::with_generator("1. Consulta marcada com antecedência.\n2) Exame de rotina.\n\n");
        let (_, company) = fx.company("Padaria", PaymentStatus::Pago, Some(next_month()));
        let (profile, _) = fx.employee(&company, "Maria");
        let app = create_router(fx.state());
        let token = login(&app, "funcionario", &profile.email).await;

        let body = json!({ "timeOffType": "Consulta Médica", "startDate": "2024-07-01", "endDate": "2024-07-01" });
        let response = app
            .oneshot(request("POST", "/api/absences/suggestions", Some(&token), Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(
            body["data"]["justificationSuggestions"],
            json!(["Consulta marcada com antecedência.", "Exame de rotina."])
        );
    }
}
