use log::trace;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Which interfaces a snapshot should contain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InterfaceFilter {
    /// Every interface except loopback
    #[default]
    All,
    /// Exactly one named interface
    Named(String),
}

/// Whether the interface is a loopback device (`lo` on Linux, `lo0` on BSD/macOS)
pub fn is_loopback(interface_name: &str) -> bool {
    match interface_name.strip_prefix("lo") {
        Some(rest) => rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

impl InterfaceFilter {
    /// Whether an interface belongs in the snapshot
    ///
    /// Loopback is never measured, even when asked for by name.
    pub fn matches(&self, interface_name: &str) -> bool {
        if is_loopback(interface_name) {
            trace!("Skipping loopback interface '{}'", interface_name);
            return false;
        }
        match self {
            InterfaceFilter::All => true,
            InterfaceFilter::Named(name) => name == interface_name,
        }
    }
}

impl FromStr for InterfaceFilter {
    type Err = Infallible;

    /// `all` and `*` select every interface, anything else is an exact name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "all" | "*" => InterfaceFilter::All,
            name => InterfaceFilter::Named(name.to_string()),
        })
    }
}

impl From<String> for InterfaceFilter {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }
}

impl From<InterfaceFilter> for String {
    fn from(value: InterfaceFilter) -> Self {
        value.to_string()
    }
}

impl fmt::Display for InterfaceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceFilter::All => f.write_str("all"),
            InterfaceFilter::Named(name) => f.write_str(name),
        }
    }
}
