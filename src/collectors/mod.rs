pub mod bandwidth;
pub mod platform;

pub use bandwidth::BandwidthCollector;
pub use platform::{CounterSource, InterfaceFilter, create_counter_source};
