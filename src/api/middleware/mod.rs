pub mod auth;
pub mod request_id;

pub use auth::AdminAuth;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdMiddleware};
