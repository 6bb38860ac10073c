//! Core types shared by the picker and its hosts.

pub mod errors;
pub mod item;
pub mod model;
