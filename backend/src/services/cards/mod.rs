//! # Card Rendering Service
//!
//! Routes of the card renderer. All handlers share a single
//! [`CardRenderer`](crate::pipeline::CardRenderer) registered as app data.
//!
//! ## Sub-modules:
//! - `generate`: one render request, front and/or inside, optionally composed,
//!   rotated and recorded on the order.
//! - `batch`: front and inside as two separate PDFs.
//! - `health`: liveness probe.

mod batch;
mod generate;
mod health;

use actix_web::http::Method;
use actix_web::web::{get, method, post, resource, scope};
use actix_web::Scope;

use super::preflight;

/// Configures and returns the Actix `Scope` for the card routes.
///
/// # Registered Routes:
///
/// *   **`POST /generate-card-gotenberg`**:
///     - **Handler**: `generate::process`
///     - **Description**: Renders an order's card according to a
///       `RenderRequest` and answers with the stored PDF's path, signed
///       download URL and public URL. In `debug` mode the generated HTML is
///       returned instead.
///
/// *   **`POST /generate-card-pdfs`**:
///     - **Handler**: `batch::process`
///     - **Description**: Renders front and inside as separate PDFs.
///
/// *   **`GET /health`**:
///     - **Handler**: `health::process`
///
/// Both `POST` routes also accept `OPTIONS` preflights.
pub fn configure_routes() -> Scope {
    scope("")
        .service(
            resource("/generate-card-gotenberg")
                .route(post().to(generate::process))
                .route(method(Method::OPTIONS).to(preflight)),
        )
        .service(
            resource("/generate-card-pdfs")
                .route(post().to(batch::process))
                .route(method(Method::OPTIONS).to(preflight)),
        )
        .route("/health", get().to(health::process))
}
