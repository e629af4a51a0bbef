#[macro_use]
extern crate rocket;

pub mod authentication;
pub mod catchers;
pub mod configuration;
pub mod database;
pub mod domain;
pub mod guards;
pub mod models;
pub mod port_saver;
pub mod routes;
pub mod schema;
pub mod session;
pub mod setup;
pub mod startup;
pub mod telemetry;
pub mod templates;
