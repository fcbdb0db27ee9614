//! Client-side state: per-source fetch lifecycles, selection keys, pagination and the
//! error banner.

mod controller;
mod errors;
mod fetch;
mod paginator;
mod selection;
mod sources;

pub use controller::DataSourceController;
pub use errors::{ErrorAggregator, ErrorReport};
pub use fetch::{FetchOutcome, FetchSession, FetchState, FetchStatus};
pub use paginator::Paginator;
pub use selection::{SelectionChange, SelectionCoordinator, SelectionListener, Tab};
pub use sources::{
    ClustersSource, DataSource, PopularMoviesSource, RecommendationsSource, SourceId,
    UsersSource,
};
