//! Request-scoped locale negotiation.
//!
//! [`negotiate_locale`] parses the `Accept-Language` header, stores the
//! resolved locale as a request extension, and stamps `Content-Language`
//! on every response. Handlers obtain a locale-bound [`Localizer`] through
//! the [`Translator`] extractor.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request};
use axum::http::header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use codejudge_core::i18n::{self, Localizer};

/// The locale negotiated for the current request.
#[derive(Debug, Clone, Copy)]
pub struct RequestLocale(pub &'static str);

/// Middleware: negotiate the request locale and advertise it back.
pub async fn negotiate_locale(mut request: Request, next: Next) -> Response {
    let locale = i18n::parse_accept_language(
        request
            .headers()
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok()),
    );
    request.extensions_mut().insert(RequestLocale(locale));

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(CONTENT_LANGUAGE, HeaderValue::from_static(locale));
    response
}

/// Extractor yielding a translator bound to the request locale.
///
/// ```ignore
/// async fn handler(Translator(t): Translator) -> Json<Value> {
///     Json(json!({ "status": t.translate("common.status_ok") }))
/// }
/// ```
pub struct Translator(pub Localizer);

impl<S: Send + Sync> FromRequestParts<S> for Translator {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .extensions
            .get::<RequestLocale>()
            .map(|l| l.0)
            .unwrap_or(i18n::DEFAULT_LOCALE);
        Ok(Translator(Localizer::new(locale)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use axum::{middleware as axum_middleware, Json, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Translator(t): Translator| async move {
                    Json(serde_json::json!({ "message": t.translate("challenges.not_found") }))
                }),
            )
            .layer(axum_middleware::from_fn(negotiate_locale))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn default_locale_without_header() {
        let response = app()
            .oneshot(HttpRequest::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_LANGUAGE).unwrap(),
            i18n::DEFAULT_LOCALE
        );
        let json = body_json(response).await;
        assert_eq!(json["message"], "Challenge not found");
    }

    #[tokio::test]
    async fn accept_language_selects_portuguese() {
        let response = app()
            .oneshot(
                HttpRequest::get("/")
                    .header(ACCEPT_LANGUAGE, "pt-BR,en;q=0.5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get(CONTENT_LANGUAGE).unwrap(), "pt");
        let json = body_json(response).await;
        assert_eq!(json["message"], "Desafio não encontrado");
    }

    #[tokio::test]
    async fn unsupported_language_falls_back_to_default() {
        let response = app()
            .oneshot(
                HttpRequest::get("/")
                    .header(ACCEPT_LANGUAGE, "de-DE, fr;q=0.8")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(CONTENT_LANGUAGE).unwrap(),
            i18n::DEFAULT_LOCALE
        );
    }
}
