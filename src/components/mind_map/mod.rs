mod component;
mod config;
mod hierarchy;
mod layout;
mod outline;
mod render;
mod state;
mod store;
mod types;
mod viewport;

pub use component::MindMapCanvas;
pub use config::MindMapConfig;
pub use hierarchy::outline_text;
pub use outline::HierarchicalView;
pub use types::HierarchicalNode;
