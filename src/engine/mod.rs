//! Browser-independent exploration engine: dataset loading, neighbor index,
//! search ranking, interaction state and summary lookup.

pub mod adjacency;
pub mod config;
pub mod debounce;
pub mod error;
pub mod focus;
pub mod interaction;
pub mod keyboard;
pub mod scene;
pub mod search;
pub mod store;
pub mod summary;
pub mod types;

pub use adjacency::{AdjacencyIndex, DanglingLinkPolicy, Neighbor};
pub use config::{ExplorerConfig, Surface};
pub use error::{ConfigError, DataError};
pub use focus::FocusController;
pub use interaction::{Emphasis, Event, Focus, InteractionMachine, InteractionSettings, InteractionSnapshot};
pub use scene::{DetachedScene, Scene};
pub use store::{DataSource, Graph, GraphDataStore, InlineSource, LiveToken, Liveness};
pub use summary::{SummaryCache, canonical_url};
pub use types::{ClusterId, ClusterLegend, Link, Node, NodeId, Summary};
