pub mod bells;
pub mod calendar;
pub mod entities;
pub mod schedule;

pub use bells::*;
pub use calendar::*;
pub use entities::*;
pub use schedule::*;
