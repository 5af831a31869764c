//! Declarative Azure NetApp Files operation catalog
//!
//! Every operation is data: a name, an argument schema and a REST binding
//! (or a stub marker). The engine in `anf-application` validates and
//! dispatches them; nothing here performs I/O.
//!
//! | Module | Operations |
//! |--------|------------|
//! | [`accounts`] | NetApp accounts |
//! | [`pools`] | capacity pools |
//! | [`volumes`] | volumes, replication, relocation |
//! | [`snapshots`] | snapshots, snapshot policies |
//! | [`backups`] | backup policies, vaults, backups |
//! | [`volume_children`] | quota rules, volume groups, subvolumes |
//! | [`region`] | region info, quota limits, availability checks |
//! | [`monitoring`] | Azure Monitor volume metrics |
//! | [`stubs`] | registered placeholders |

pub mod accounts;
pub mod backups;
pub mod common;
pub mod monitoring;
pub mod pools;
pub mod region;
pub mod snapshots;
pub mod stubs;
pub mod volume_children;
pub mod volumes;

use anf_domain::{DomainError, OperationSpec};

pub use common::{API_VERSION, METRICS_API_VERSION, POOL_MIN_SIZE, VOLUME_MIN_QUOTA};

/// Build the full catalog in listing order
///
/// Fails only on a definition error (duplicate name, bad pattern or path
/// template), which is a programming error in the catalog itself.
pub fn default_operation_spec() -> Result<OperationSpec, DomainError> {
    let common = common::CommonFields::new()?;

    OperationSpec::new()
        .register_all(accounts::operations(&common)?)?
        .register_all(pools::operations(&common)?)?
        .register_all(volumes::operations(&common)?)?
        .register_all(snapshots::operations(&common)?)?
        .register_all(backups::operations(&common)?)?
        .register_all(volume_children::operations(&common)?)?
        .register_all(region::operations(&common)?)?
        .register_all(monitoring::operations(&common)?)?
        .register_all(stubs::operations(&common))
}
