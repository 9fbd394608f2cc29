pub mod aggregator;
pub mod domain;
pub mod editor;
pub mod kernel;
pub mod persistence;
pub mod ports;
pub mod viewer;
pub mod viewmodel;
pub mod watchlist_store;

pub use aggregator::{Aggregation, AggregationEvent, CookieAggregator, LookupOutcome, RunId};
pub use domain::{AppSettings, BootState, EditDialog, EditorMode, EditorState, ViewerState};
pub use editor::*;
pub use kernel::{system_clock, Clock, DeleteOutcome, EditorError, EditorKernel};
pub use persistence::FilePersistence;
pub use ports::*;
pub use viewer::ViewerKernel;
pub use viewmodel::*;
pub use watchlist_store::WatchListStore;
