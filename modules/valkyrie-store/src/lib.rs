//! Submission persistence behind one contract.
//!
//! [`SubmissionStore`] exposes append / list / delete_by_id / clear over
//! three interchangeable backends: in-memory (session-scoped), a flat JSON
//! file, and Postgres. The backend is selected by configuration; callers
//! only ever see the trait.

pub mod error;
pub mod file;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::SubmissionStore;
