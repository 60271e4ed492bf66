//! Roll options: boolean facts about an actor grouped by domain, and the
//! predicates that test them.
mod predicate;
mod registry;

pub use predicate::{Predicate, PredicateStatement};
pub use registry::{ALL_DOMAIN, RollOptionRegistry, sanitize_domain, sanitize_option, sluggify};
