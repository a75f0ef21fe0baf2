pub mod ownership;
pub mod service;

pub use ownership::{Ownership, ensure_owner};
pub use service::{PageRequest, PostService};
