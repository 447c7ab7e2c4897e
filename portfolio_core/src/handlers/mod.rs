//! HTTP handlers

pub mod admin;
pub mod health;
pub mod routes;
pub mod site;
