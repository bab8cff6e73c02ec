//! larder-client: backend REST client, local cache, session expiry, and the
//! snapshot/actions layer the CLI drives.

pub mod api;
pub mod cache;
pub mod export;
pub mod links;
pub mod session;
pub mod sync;

pub use api::{ApiClient, ApiError, BlockingSearch};
pub use cache::LocalCache;
pub use links::{store_search_url, Store};
pub use session::{spawn_expiry_watch, Session, SessionPolicy};
pub use sync::{load_catalog, load_snapshot, GroceryDraft, Snapshot};
