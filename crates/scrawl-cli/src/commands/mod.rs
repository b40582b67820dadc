//! Command handlers

pub mod category;
pub mod config;
pub mod post;
pub mod seed;
pub mod status;
pub mod tag;
pub mod user;
