use crate::error::{OnegoError, Result};
use crate::resolve::{AddressSelector, VmRef, VmTarget};
use clap::Args;

/// VM and NIC selection flags shared by `ip` and `ssh`.
///
/// Exclusivity is checked by [`VmFlags::target`] rather than clap so that
/// misuse reports a plain message and exits with status 1.
#[derive(Args, Debug, Clone, Default)]
pub struct VmFlags {
    /// Id of the VM
    #[arg(long, value_name = "N")]
    pub id: Option<u32>,

    /// Name of the VM
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Get the IP of this NIC
    #[arg(long = "nic_id", visible_alias = "nic-id", value_name = "N")]
    pub nic_id: Option<u32>,

    /// Get the IP of this Network ID
    #[arg(long = "network_id", visible_alias = "network-id", value_name = "N")]
    pub network_id: Option<u32>,

    /// Get the IP of this Network
    #[arg(long, value_name = "NAME")]
    pub network: Option<String>,
}

impl VmFlags {
    /// Validate the flag combination
    pub fn target(&self) -> Result<VmTarget> {
        Ok(VmTarget {
            vm: self.vm_ref()?,
            selector: self.selector()?,
        })
    }

    pub fn vm_ref(&self) -> Result<VmRef> {
        let name = self.name.as_ref().filter(|n| !n.is_empty());
        let flags = ["id", "name"];

        match (self.id, name) {
            (Some(_), Some(_)) => Err(incompatible(&flags)),
            (Some(id), None) => Ok(VmRef::Id(id)),
            (None, Some(name)) => Ok(VmRef::Name(name.clone())),
            (None, None) => Err(OnegoError::Usage(format!(
                "Specify one of the following flags: {}",
                flag_list(&flags)
            ))),
        }
    }

    pub fn selector(&self) -> Result<AddressSelector> {
        let set = [
            self.nic_id.map(AddressSelector::NicId),
            self.network_id.map(AddressSelector::NetworkId),
            self.network.clone().map(AddressSelector::Network),
        ];

        let mut chosen = set.into_iter().flatten();
        match (chosen.next(), chosen.next()) {
            (None, _) => Ok(AddressSelector::First),
            (Some(selector), None) => Ok(selector),
            (Some(_), Some(_)) => Err(incompatible(&["nic_id", "network_id", "network"])),
        }
    }
}

fn flag_list(flags: &[&str]) -> String {
    flags
        .iter()
        .map(|f| format!("--{}", f))
        .collect::<Vec<_>>()
        .join(", ")
}

fn incompatible(flags: &[&str]) -> OnegoError {
    OnegoError::Usage(format!(
        "Specify only one of the following flags: {}",
        flag_list(flags)
    ))
}
