pub mod artifact;
pub mod category;
pub mod event;
pub mod telemetry;
mod util;

pub use artifact::*;
pub use category::Category;
pub use event::*;
pub use telemetry::*;
pub use util::*;
