// LLCs, properties and rentable units

pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{Llc, NewProperty, Property, Unit, UnitFields};
pub use repositories::{MySqlPropertyRepository, PropertyRepository};
