//! HTTP handlers for the closet domain

pub mod admin;
pub mod callbacks;
pub mod engagement;
pub mod items;
