//! # catalogdb HTTP Server Module
//!
//! Request handler in front of the product store. Validates payloads,
//! calls the store and maps its errors to status codes.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/products`, `/products/:id`, `/product-types` - Queries
//! - `/product`, `/product/:id`, `/:id` - Mutations

pub mod config;
pub mod health_routes;
pub mod product_routes;
pub mod server;
pub mod validation;

pub use config::HttpServerConfig;
pub use product_routes::CatalogState;
pub use server::HttpServer;
