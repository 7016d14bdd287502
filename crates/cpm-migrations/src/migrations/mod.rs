//! Concrete format migrations

mod v1_7;

pub use v1_7::Migration1_7;
