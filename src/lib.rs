pub mod annotate;
pub mod bot;
pub mod config;
pub mod error;
pub mod extract;
pub mod quiz;
pub mod render;
pub mod web;
