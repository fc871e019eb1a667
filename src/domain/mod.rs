mod connectivity;
mod provider;
pub mod value_objects;

pub use connectivity::ConnectivityOutcome;
pub use provider::{DnsProvider, ProviderError, RESERVED_KEYS};
pub use value_objects::{
    InterfaceTarget, InterfaceTargetError, IpFamily, TestSite, TestSiteError,
};
