#![allow(dead_code)]

pub mod app_builder;
pub mod fixtures;

pub use app_builder::{create_test_app, TestApp};
pub use fixtures::{bearer, register, register_at, CountingHasher};
