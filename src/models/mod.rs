// src/models/mod.rs

pub mod admin;
pub mod quiz;
pub mod session;
pub mod student;
pub mod submission;
