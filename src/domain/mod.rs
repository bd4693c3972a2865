//! Domain logic - pure version and commit rules independent of any provider

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::{Change, Commit};
pub use tag::Tag;
pub use version::Version;
