//! Filesystem capability for monolint.
//!
//! Rules never touch storage directly; everything goes through the
//! [`FileSystem`] trait so the engine can run against the real disk
//! ([`FsFileSystem`]) or an in-memory double ([`InMemoryFileSystem`]).
//!
//! The [`workspace`] module derives member package directories and the
//! package-name-to-directory mapping from a workspace root manifest.

mod disk;
mod memory;
mod ports;
pub mod workspace;

pub use disk::FsFileSystem;
pub use memory::InMemoryFileSystem;
pub use ports::{FileSystem, to_json_string};
pub use workspace::{MANIFEST_FILE, package_name_to_dir, rooted_pattern, workspace_package_dirs};
