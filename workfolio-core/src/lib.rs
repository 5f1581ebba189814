pub mod assets;
pub mod collection;
pub mod errors;
pub mod models;
pub mod repo;

pub use assets::{AssetStore, Removal};
pub use collection::*;
pub use errors::*;
pub use models::*;
pub use repo::*;
