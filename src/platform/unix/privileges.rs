//! Unix privilege checks

use crate::platform::traits::PrivilegeOps;
use nix::unistd::geteuid;

pub struct UnixPrivileges;

impl UnixPrivileges {
    pub fn new() -> Self {
        Self
    }
}

impl PrivilegeOps for UnixPrivileges {
    fn is_elevated(&self) -> bool {
        geteuid().is_root()
    }
}
