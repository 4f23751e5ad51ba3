// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod users;

pub use cache::{CacheError, CacheKey, CacheManager, CachedJobStore};
pub use memory::InMemoryJobBoard;
pub use postgres::PostgresClient;
pub use repository::{JobBoardRepository, JobStore, RepositoryError, UserRepository};
pub use users::{UserError, UserService};
