#![allow(dead_code)]

pub mod failing_store;

pub use app_builder::create_test_app;
