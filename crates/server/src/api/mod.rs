pub mod error;
pub mod handlers;
pub mod images;
pub mod items;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
