pub mod backend;
pub mod config;
pub mod controller;
pub mod errors;
pub mod form;
pub mod models;
pub mod sync;
