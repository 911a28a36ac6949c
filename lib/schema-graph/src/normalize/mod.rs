//! Optional passes over a resolved schema. Both need resolved references, so
//! they run after identity assignment; they are independent of each other.

mod deprecated;
mod relay;

pub use deprecated::remove_deprecated_fields;
pub use relay::{fold_relay_types, RELAY_ARG_NAMES};
