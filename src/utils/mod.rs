pub mod os;
pub mod progress_bars;
pub mod prompts;
mod formatting;

pub use os::*;
pub use progress_bars::*;
pub use prompts::*;
pub use formatting::*;
