mod archive;
mod controller;
mod device;
mod template;

pub use archive::*;
pub use controller::*;
pub use device::*;
pub use template::*;
