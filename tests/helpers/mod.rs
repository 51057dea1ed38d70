// Shared fixtures for integration and contract tests
//
// Included from each test target with
//   #[path = "../helpers/mod.rs"] mod helpers;
// so not every target uses every helper.
#![allow(dead_code)]

pub mod test_database;

pub use test_data::*;
pub use test_database::*;
