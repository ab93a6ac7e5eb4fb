mod format;
mod parse;
mod remaining;
mod tier;

pub use format::format_local;
pub(crate) use parse::local_to_utc;
pub use parse::parse_timestamp;
pub use remaining::{pad2, remaining, remaining_at, RemainingDuration};
pub use tier::{classify, Tier};

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
