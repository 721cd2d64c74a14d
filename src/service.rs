pub mod descriptor;
pub mod install;
pub mod uninstall;

pub use descriptor::{ServiceDescriptor, SERVICE_NAME};
pub use install::{install_service, report_status};
pub use uninstall::uninstall_service;
