use axum::Json;
use serde_json::{json, Value};

use crate::middleware::locale::Translator;

/// GET `/` — liveness probe with a localized status message.
pub async fn health(Translator(t): Translator) -> Json<Value> {
    Json(json!({ "status": t.translate("common.status_ok") }))
}
