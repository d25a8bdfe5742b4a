pub mod auth;
pub mod catalog;
pub mod db;
pub mod error;
pub mod llm;
pub mod models;
pub mod notify;
pub mod routes;
pub mod state;
pub mod stripe;
pub mod validate;
