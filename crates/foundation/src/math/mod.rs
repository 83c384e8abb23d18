pub mod angles;
pub mod camera;
pub mod sphere;
pub mod vec;

pub use angles::*;
pub use camera::*;
pub use sphere::*;
pub use vec::*;
