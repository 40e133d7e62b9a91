//! Types that represent the core data model: the `Record` read from each sheet row and the field
//! normalizers used to build it.
mod amount;
mod date;
mod record;
mod status;
mod unit;

pub use amount::{parse_locale_number, Amount};
pub use date::{format_date_pt_br, parse_date_iso, parse_date_pt_br, PT_BR_FORMAT};
pub use record::{Column, Record};
pub use status::{normalize_status, Status, OK};
pub use unit::{clean_unit_name, UnitCleaner, NOT_INFORMED};
