mod academic_years;
mod auth;
mod catalog;
mod classes;
mod records;
mod schedules;
mod students;
mod users;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::catalog::Catalog;
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(auth::routes())
        .merge(users::routes())
        .merge(academic_years::routes())
        .merge(catalog::routes(Catalog::Majors, "/majors"))
        .merge(catalog::routes(Catalog::Subjects, "/subjects"))
        .merge(classes::routes())
        .merge(schedules::routes())
        .merge(students::routes())
        .merge(records::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
