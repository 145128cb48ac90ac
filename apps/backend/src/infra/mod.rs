//! Infrastructure: state assembly and startup seeding.

pub mod seed;
pub mod state;
