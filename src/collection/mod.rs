mod collection;
mod pushable;

pub use collection::{Collection, QueryOpts};
pub use pushable::Pushable;
