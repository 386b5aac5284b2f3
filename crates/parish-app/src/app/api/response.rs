use salvo::writing::Json;
use serde::Serialize;

/// Body returned by create endpoints.
#[derive(Debug, Serialize)]
pub struct Created {
    pub message: &'static str,
    pub id: i64,
}

/// Body returned by endpoints that change state without producing a record.
#[derive(Debug, Serialize)]
pub struct Done {
    pub message: &'static str,
}

#[must_use]
pub fn created(message: &'static str, id: i64) -> Json<Created> {
    Json(Created { message, id })
}

#[must_use]
pub fn done(message: &'static str) -> Json<Done> {
    Json(Done { message })
}
