mod alive;
mod list;

pub use alive::*;
pub use list::*;
