// Parser layer: transcript text -> RawEvent -> FormattedEvent
//
// Both stages are total. The scanner only fails on I/O; every RawEvent
// classifies to exactly one Category via the ordered rule table.

pub mod classifier;
pub mod error;
pub mod scanner;

pub use classifier::{AGENT_BANNERS, RULES, Rule, classify, classify_all};
pub use error::{Error, Result};
pub use scanner::{Scanner, scan_file, scan_reader, scan_str};
