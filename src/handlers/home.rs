use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HomeBody {
    msg: &'static str,
}

/// GET /: static greeting, doubles as liveness check.
pub async fn home() -> Json<HomeBody> {
    Json(HomeBody { msg: "API Home" })
}
