//! Query builders, one per data source family. Each produces a
//! [`Target`](crate::model::Target) that panels accept through
//! [`IntoTarget`].

mod cloudwatch;
mod graphite;
mod influxdb;
mod loki;
mod prometheus;
pub mod stackdriver;

pub use cloudwatch::CloudWatch;
pub use graphite::Graphite;
pub use influxdb::InfluxDB;
pub use loki::Loki;
pub use prometheus::{Format, Prometheus};
pub use stackdriver::Stackdriver;

use crate::model::Target;
use crate::{Error, Result};
use std::collections::HashSet;

/// Conversion of a query builder into the target record attached to a panel.
pub trait IntoTarget {
    fn into_target(self) -> Target;
}

impl IntoTarget for Target {
    fn into_target(self) -> Target {
        self
    }
}

/// Gives every target without an explicit ref the next free letter and
/// rejects duplicated refs.
pub(crate) fn assign_refs(resource: &str, targets: &mut [Target]) -> Result<()> {
    let mut taken = HashSet::new();
    for target in targets.iter().filter(|t| !t.ref_id.is_empty()) {
        if !taken.insert(target.ref_id.clone()) {
            return Err(Error::invalid(
                resource,
                "refId",
                &target.ref_id,
                "used by more than one target",
            ));
        }
    }

    let mut candidates = (0..).map(ref_name).filter(|name| !taken.contains(name));
    for target in targets.iter_mut().filter(|t| t.ref_id.is_empty()) {
        if let Some(name) = candidates.next() {
            target.ref_id = name;
        }
    }

    Ok(())
}

/// `A`..`Z`, then `AA`, `AB`, ...
fn ref_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
