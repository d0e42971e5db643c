//! Wire and domain types shared by catalog clients.

pub mod domain;
pub mod error;
pub mod protocol;
