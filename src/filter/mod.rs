pub mod builder;
pub mod paginate;
pub mod query;

pub use builder::{FilterBuilder, Resource, SqlClause, SqlParam};
pub use paginate::{PageEnvelope, DEFAULT_PAGE_SIZE};
pub use query::{CommonQuery, ListParams, SortDirection};
