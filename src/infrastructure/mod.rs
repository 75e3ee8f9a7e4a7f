pub mod chromium_surface;
pub mod classifier;
pub mod page_surface;

pub use chromium_surface::ChromiumSurface;
pub use classifier::{ActionKind, ApplyPath, ControlClassifier};
pub use page_surface::PageSurface;
