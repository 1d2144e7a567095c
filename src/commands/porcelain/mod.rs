//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands compose the plumbing and the on-disk areas into
//! everyday workflows.
//!
//! ## Commands
//!
//! - `init`: Create or reinitialize a repository
//! - `add` / `unstage`: Stage and unstage paths
//! - `commit`: Record the staged snapshot on the current branch or detached HEAD
//! - `status`: Untracked, staged and unstaged changes
//! - `log`: Linear history from HEAD with ref decorations
//! - `branch` / `tag`: Create refs
//! - `checkout`: Move HEAD and rebuild the working directory
//! - `config`: Read and write `.kit/config`

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod config;
pub mod init;
pub mod log;
pub mod revision;
pub mod status;
pub mod tag;
pub mod unstage;
