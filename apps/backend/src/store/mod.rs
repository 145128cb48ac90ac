//! Persistence collaborators. Services depend on the traits; the in-memory
//! implementations back the binary and the test suites.

pub mod deals;
pub mod users;

pub use deals::{DealChange, DealStore, InMemoryDealStore, Modified};
pub use users::{CredentialStore, InMemoryCredentialStore, NewUser, UserRecord};
