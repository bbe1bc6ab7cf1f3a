//! API endpoint modules.

mod archive;
mod devices;
mod file;
mod task;
mod templates;

pub use archive::ArchiveApi;
pub use devices::DevicesApi;
pub use file::FileApi;
pub use task::TaskApi;
pub use templates::TemplatesApi;
