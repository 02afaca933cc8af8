//! API handlers

pub mod admin;
pub mod health;
pub mod movies;
pub mod recommendations;
