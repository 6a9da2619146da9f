pub mod api;
pub mod app;
pub mod config;
pub mod models;
pub mod route;
pub mod ui;
pub mod utils;
pub mod views;
