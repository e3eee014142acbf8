pub mod loader;
pub mod model;
pub mod source;

pub use loader::{AssetLoader, LoadRequest, LoadStatus, LoadTicket, LoadedNode};
pub use model::{Aabb, ModelSummary};
pub use source::{AssetSource, GltfSource};
