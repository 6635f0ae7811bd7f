mod branch;
mod changes;
mod process;
mod show;

pub use branch::{ref_exists, resolve};
pub use changes::{load, ChangeRecord, FileStatus};
pub use process::GitError;
pub use show::{content_at, tracked_files};
