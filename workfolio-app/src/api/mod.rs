pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
