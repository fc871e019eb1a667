mod interface_target;
mod ip_family;
mod test_site;

pub use interface_target::{InterfaceTarget, InterfaceTargetError};
pub use ip_family::IpFamily;
pub use test_site::{TestSite, TestSiteError};
