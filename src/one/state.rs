use crate::error::{OnegoError, Result};
use crate::xml::Node;
use std::fmt;

/// Marker OpenNebula uses in every failure state name
const FAILURE_MARKER: &str = "FAIL";

const VM_STATES: &[&str] = &[
    "INIT",
    "PENDING",
    "HOLD",
    "ACTIVE",
    "STOPPED",
    "SUSPENDED",
    "DONE",
    "FAILED",
    "POWEROFF",
    "UNDEPLOYED",
    "CLONING",
    "CLONING_FAILURE",
];

const LCM_STATES: &[&str] = &[
    "LCM_INIT",
    "PROLOG",
    "BOOT",
    "RUNNING",
    "MIGRATE",
    "SAVE_STOP",
    "SAVE_SUSPEND",
    "SAVE_MIGRATE",
    "PROLOG_MIGRATE",
    "PROLOG_RESUME",
    "EPILOG_STOP",
    "EPILOG",
    "SHUTDOWN",
    "CANCEL",
    "FAILURE",
    "CLEANUP_RESUBMIT",
    "UNKNOWN",
    "HOTPLUG",
    "SHUTDOWN_POWEROFF",
    "BOOT_UNKNOWN",
    "BOOT_POWEROFF",
    "BOOT_SUSPENDED",
    "BOOT_STOPPED",
    "CLEANUP_DELETE",
    "HOTPLUG_SNAPSHOT",
    "HOTPLUG_NIC",
    "HOTPLUG_SAVEAS",
    "HOTPLUG_SAVEAS_POWEROFF",
    "HOTPLUG_SAVEAS_SUSPENDED",
    "SHUTDOWN_UNDEPLOY",
    "EPILOG_UNDEPLOY",
    "PROLOG_UNDEPLOY",
    "BOOT_UNDEPLOY",
    "HOTPLUG_PROLOG_POWEROFF",
    "HOTPLUG_EPILOG_POWEROFF",
    "BOOT_MIGRATE",
    "BOOT_FAILURE",
    "BOOT_MIGRATE_FAILURE",
    "PROLOG_MIGRATE_FAILURE",
    "PROLOG_FAILURE",
    "EPILOG_FAILURE",
    "EPILOG_STOP_FAILURE",
    "EPILOG_UNDEPLOY_FAILURE",
    "PROLOG_MIGRATE_POWEROFF",
    "PROLOG_MIGRATE_POWEROFF_FAILURE",
    "PROLOG_MIGRATE_SUSPEND",
    "PROLOG_MIGRATE_SUSPEND_FAILURE",
    "BOOT_UNDEPLOY_FAILURE",
    "BOOT_STOPPED_FAILURE",
    "PROLOG_RESUME_FAILURE",
    "PROLOG_UNDEPLOY_FAILURE",
    "DISK_SNAPSHOT_POWEROFF",
    "DISK_SNAPSHOT_REVERT_POWEROFF",
    "DISK_SNAPSHOT_DELETE_POWEROFF",
    "DISK_SNAPSHOT_SUSPENDED",
    "DISK_SNAPSHOT_REVERT_SUSPENDED",
    "DISK_SNAPSHOT_DELETE_SUSPENDED",
    "DISK_SNAPSHOT",
    "DISK_SNAPSHOT_REVERT",
    "DISK_SNAPSHOT_DELETE",
    "PROLOG_MIGRATE_UNKNOWN",
    "PROLOG_MIGRATE_UNKNOWN_FAILURE",
    "DISK_RESIZE",
    "DISK_RESIZE_POWEROFF",
    "DISK_RESIZE_UNDEPLOYED",
    "HOTPLUG_NIC_POWEROFF",
    "HOTPLUG_RESIZE",
    "HOTPLUG_SAVEAS_UNDEPLOYED",
    "HOTPLUG_SAVEAS_STOPPED",
    "BACKUP",
    "BACKUP_POWEROFF",
];

/// Coarse and fine-grained lifecycle state of a VM, by name.
///
/// `lcm_state` is only meaningful while the VM is `ACTIVE` and is empty
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleState {
    pub state: String,
    pub lcm_state: String,
}

impl LifecycleState {
    pub fn from_codes(state: u32, lcm_state: u32) -> Self {
        let state = state_name(VM_STATES, state);
        let lcm_state = if state == "ACTIVE" {
            state_name(LCM_STATES, lcm_state)
        } else {
            String::new()
        };
        Self { state, lcm_state }
    }

    /// Read `STATE` and `LCM_STATE` from a `<VM>` descriptor
    pub fn from_descriptor(vm: &Node) -> Result<Self> {
        let state = numeric_leaf(vm, "STATE")?;
        let lcm_state = numeric_leaf(vm, "LCM_STATE")?;
        Ok(Self::from_codes(state, lcm_state))
    }

    pub fn is_failed(&self) -> bool {
        self.state.contains(FAILURE_MARKER) || self.lcm_state.contains(FAILURE_MARKER)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lcm_state.is_empty() {
            write!(f, "{}", self.state)
        } else {
            write!(f, "{}/{}", self.state, self.lcm_state)
        }
    }
}

fn state_name(table: &[&str], code: u32) -> String {
    table
        .get(code as usize)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("UNKNOWN({})", code))
}

fn numeric_leaf(vm: &Node, name: &str) -> Result<u32> {
    let text = vm
        .child_text(name)
        .ok_or_else(|| OnegoError::XmlParse(format!("VM descriptor has no {}", name)))?;
    text.trim()
        .parse()
        .map_err(|_| OnegoError::XmlParse(format!("{} is not a number: '{}'", name, text)))
}
