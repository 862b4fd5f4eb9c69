//! Domain entities and state machine for the closet domain

pub mod entities;
pub mod state;
