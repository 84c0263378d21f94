pub mod aggregate;
pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod filter;
pub mod history;
pub mod record;
pub mod render;
pub mod web;
