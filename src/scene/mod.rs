pub mod store;
pub mod types;

pub use store::SceneStore;
pub use types::{Line, LineId, LineRole, Scene, SceneId};
