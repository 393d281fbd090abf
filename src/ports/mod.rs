//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the classification core and an
//! external system (vendor classifier, Schedule B lookup, host application,
//! time). Implementations live in `src/adapters/`.

pub mod classifier;
pub mod clock;
pub mod notifier;
pub mod schedule;

pub use classifier::{ClassifierApi, ClassifyFuture};
pub use clock::Clock;
pub use notifier::{HostNotifier, NotifyFuture};
pub use schedule::{LookupFuture, ScheduleLookup};
