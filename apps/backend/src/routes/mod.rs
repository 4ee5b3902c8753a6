//! HTTP route handlers

pub mod learning;
pub mod review;
