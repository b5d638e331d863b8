pub mod advisor;
pub mod audit;
pub mod crisis;
pub mod entries;
pub mod error;
pub mod handlers;
pub mod lookup;
pub mod matching;
pub mod middleware;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
