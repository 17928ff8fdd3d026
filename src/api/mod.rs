//! HTTP 层：JWT、中间件与各端点

pub mod jwt;
pub mod middleware;
pub mod services;
