pub mod camera;
pub mod events;
pub mod session;

pub use camera::*;
pub use events::*;
pub use session::*;
