//! Structured parsing of `zpool status` and `zpool list` output.
//!
//! [`parse::status::parse_status`] turns one status report into a
//! [`models::pool::PoolStatus`] with its vdev tree; [`parse::list`] decodes
//! list rows and hydrates them into full records through a
//! [`parse::list::StatusSource`] such as [`collectors::zpool::ZpoolCommand`].

pub mod alerts;
pub mod collectors;
pub mod config;
pub mod error;
pub mod models;
pub mod parse;
pub mod util;

pub use error::{FetchError, HydrateError, ListError, ParseError};
pub use models::pool::{DeviceNode, DeviceTree, ListRow, NodeId, PoolStatus};
pub use models::vdev::{DeviceKind, DeviceState};
pub use parse::list::{decode_list, decode_row, hydrate, hydrate_all, ListOptions, StatusSource};
pub use parse::status::{parse_status, parse_status_all};
