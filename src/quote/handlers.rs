use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use askama::Template;
use serde_json::json;

use crate::documents::{PreviewRenderer, QuotationGenerator, Renderer};
use crate::quote::form::QuoteFormSchema;
use crate::quote::validation::Validator;
use crate::quote::{Quote, QuoteForm};
use crate::{AppState, ErrorResponse};

/// Empty rows shown on a fresh form.
const FORM_ROWS: usize = 5;

/// Body limit for the quote form; rows can be added without bound in the page.
pub const FORM_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Template)]
#[template(path = "form.html")]
struct FormTemplate {
    rows: usize,
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Decode the submitted fields and aggregate them into a quote, rejecting
/// malformed numbers first when strict mode is on.
fn build_quote(state: &AppState, pairs: Vec<(String, String)>) -> Result<Quote, HttpResponse> {
    let form = QuoteForm::from_pairs(pairs);

    if state.config.strict_numeric_input {
        if let Err(errors) = form.validate() {
            log::warn!("rejecting quote with {} invalid field(s)", errors.len());
            return Err(
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&errors.to_string()))
            );
        }
    }

    let quote = form.into_quote();
    log::info!(
        "quote '{}' for '{}': {} item(s), iva={}",
        quote.subject(),
        quote.recipient(),
        quote.items().len(),
        quote.tax_applied()
    );
    Ok(quote)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Cotizaciones",
    responses(
        (
            status = 200,
            description = "Quote input form",
            body = String,
            content_type = "text/html"
        )
    )
)]
pub async fn show_form() -> impl Responder {
    match (FormTemplate { rows: FORM_ROWS }).render() {
        Ok(body) => html(body),
        Err(e) => {
            log::error!("failed to render quote form: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("No se pudo mostrar el formulario"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/preview",
    tag = "Cotizaciones",
    request_body(content = QuoteFormSchema, content_type = "application/x-www-form-urlencoded"),
    responses(
        (
            status = 200,
            description = "HTML preview of the quote",
            body = String,
            content_type = "text/html"
        ),
        (
            status = 400,
            description = "Malformed quantity or price (strict mode only)",
            body = ErrorResponse
        ),
        (status = 500, description = "Preview template failed", body = ErrorResponse)
    )
)]
pub async fn preview_quote(
    state: web::Data<AppState>,
    form: web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let quote = match build_quote(&state, form.into_inner()) {
        Ok(quote) => quote,
        Err(response) => return response,
    };

    match PreviewRenderer.render(&quote) {
        Ok(body) => html(body),
        Err(e) => {
            log::error!("failed to render quote preview: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("No se pudo generar la vista previa"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/download",
    tag = "Cotizaciones",
    request_body(content = QuoteFormSchema, content_type = "application/x-www-form-urlencoded"),
    responses(
        (
            status = 200,
            description = "PDF quotation as an attachment",
            body = String,
            content_type = "application/pdf"
        ),
        (
            status = 400,
            description = "Malformed quantity or price (strict mode only)",
            body = ErrorResponse
        ),
        (
            status = 500,
            description = "Template, logo, fonts or Typst unavailable",
            body = ErrorResponse
        )
    )
)]
pub async fn download_quote(
    state: web::Data<AppState>,
    form: web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let quote = match build_quote(&state, form.into_inner()) {
        Ok(quote) => quote,
        Err(response) => return response,
    };

    let config = state.config.clone();
    let result = web::block(move || {
        let generator = QuotationGenerator::new(&config)?;
        generator.render(&quote)
    })
    .await;

    match result {
        Ok(Ok(document)) => {
            log::info!("generated {} ({} bytes)", document.filename, document.pdf.len());
            HttpResponse::Ok()
                .content_type("application/pdf")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", document.filename),
                ))
                .body(document.pdf)
        }
        Ok(Err(e)) => {
            log::error!("failed to generate quotation PDF: {}", e);
            pdf_failure()
        }
        Err(e) => {
            log::error!("PDF generation task failed: {}", e);
            pdf_failure()
        }
    }
}

fn pdf_failure() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::internal_error(
        "No se pudo generar el PDF de la cotización",
    ))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Cotizaciones",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Fallback for unmatched routes.
pub async fn not_found(req: HttpRequest) -> impl Responder {
    log::debug!("no route for {} {}", req.method(), req.path());
    HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
        "Ruta no encontrada: {}",
        req.path()
    )))
}

/// Route table for the quote endpoints.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().limit(FORM_LIMIT))
        .service(web::resource("/").route(web::get().to(show_form)))
        .service(web::resource("/preview").route(web::post().to(preview_quote)))
        .service(web::resource("/download").route(web::post().to(download_quote)))
        .service(web::resource("/health").route(web::get().to(health)))
        .default_service(web::to(not_found));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use actix_web::{http::StatusCode, test, App};

    fn app_state(config: AppConfig) -> web::Data<AppState> {
        web::Data::new(AppState::new(config))
    }

    #[actix_web::test]
    async fn test_form_page() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(AppConfig::default()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(body.matches(r#"name="cantidad""#).count(), FORM_ROWS);
        assert!(body.contains(r#"action="/preview""#));
    }

    #[actix_web::test]
    async fn test_preview_renders_quote() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(AppConfig::default()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/preview")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(concat!(
                "fecha=hoy&destinatario=taller&concepto=frenos&iva=on",
                "&cantidad=2&parte=BX&descripcion=balata&precio=100"
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("TALLER"));
        assert!(body.contains("$116"));
        assert!(body.contains("$232"));
    }

    #[actix_web::test]
    async fn test_strict_mode_rejects_malformed_quantity() {
        let strict = AppConfig {
            strict_numeric_input: true,
            ..AppConfig::default()
        };
        let app =
            test::init_service(App::new().app_data(app_state(strict)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/preview")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("cantidad=abc&parte=&descripcion=&precio=10")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(error.error, "BadRequest");
        assert!(error.message.contains("cantidad[0]"));
    }

    #[actix_web::test]
    async fn test_lenient_mode_accepts_malformed_quantity() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(AppConfig::default()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/preview")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("cantidad=abc&parte=&descripcion=&precio=10")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_download_with_missing_resources_is_server_error() {
        let broken = AppConfig {
            static_dir: "/nonexistent/static".into(),
            ..AppConfig::default()
        };
        let app =
            test::init_service(App::new().app_data(app_state(broken)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/download")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("concepto=frenos")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let error: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(error.error, "InternalServerError");
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(AppConfig::default()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
