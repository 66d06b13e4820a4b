pub mod config;
pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod schema_init;
pub mod services;
pub mod storage;
