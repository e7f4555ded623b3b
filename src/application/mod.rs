pub mod status;
pub mod transformer;

pub use status::{RelayStatus, StatusSnapshot};
pub use transformer::transform_frame;
