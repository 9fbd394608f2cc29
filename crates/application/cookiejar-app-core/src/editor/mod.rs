pub mod commands;
pub mod events;
pub mod reducer;
pub mod store;

pub use commands::EditorCommand;
pub use events::EditorEvent;
pub use reducer::reduce;
pub use store::EditorStore;
