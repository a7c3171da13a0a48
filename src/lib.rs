//! Typed builders for Grafana dashboards, alert rules, data sources and
//! alertmanager notification routing.
//!
//! Every resource is assembled by a builder created with `new(..)` and
//! configured through consuming setters. Invalid input never panics: the
//! first error is kept by the builder and returned by its `build()`. Built
//! handles serialize to the JSON Grafana accepts.
//!
//! ```ignore
//! use grafana_builder::prelude::*;
//! use grafana_builder::{dashboard::Dashboard, panel::TimeSeries, row::Row, target::Prometheus};
//!
//! let dashboard = Dashboard::builder("API")
//!     .row(Row::new("Traffic").with_panel(
//!         TimeSeries::new("Requests")
//!             .datasource("prometheus")
//!             .with_target(Prometheus::new("sum(rate(http_requests_total[5m]))")),
//!     ))
//!     .build()?;
//! println!("{}", dashboard.to_json_pretty()?);
//! ```

pub mod alert;
pub mod alertmanager;
pub mod dashboard;
pub mod datasource;
pub mod decoder;
pub mod error;
pub mod kernel;
pub mod model;
pub mod panel;
pub mod row;
pub mod target;
pub mod variable;

pub use error::{Error, Result};

/// Traits needed to call the shared setters of every builder.
pub mod prelude {
    pub use crate::alert::IntoAlertQuery;
    pub use crate::alertmanager::IntoReceiver;
    pub use crate::datasource::CommonSettings;
    pub use crate::kernel::Builder;
    pub use crate::panel::{CommonOptions, IntoPanel, WithTargets};
    pub use crate::target::IntoTarget;
    pub use crate::variable::{IntoVariable, VariableOptions};
}
