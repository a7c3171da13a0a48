//! Record types mirroring the JSON Grafana accepts and returns. They carry no
//! behavior beyond (de)serialization; the builders fill them in.

mod alert;
mod alertmanager;
mod board;
mod datasource;
mod field;
mod panel;
mod target;
mod value;
mod variable;

pub use alert::*;
pub use alertmanager::*;
pub use board::*;
pub use datasource::*;
pub use field::*;
pub use panel::*;
pub use target::*;
pub use value::*;
pub use variable::*;
