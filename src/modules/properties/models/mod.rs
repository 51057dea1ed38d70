mod property;
mod unit;

pub use property::{validate_llc_name, Llc, NewProperty, Property};
pub use unit::{Unit, UnitFields};
