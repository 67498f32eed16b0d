use crate::error::Result;
use crate::one::OneApi;
use crate::resolve::{self, VmTarget};

pub fn execute(api: &dyn OneApi, target: &VmTarget, all: bool) -> Result<()> {
    for ip in addresses(api, target, all)? {
        println!("{}", ip);
    }
    Ok(())
}

/// Fetch the VM descriptor and extract the requested address(es).
///
/// Nothing is returned unless every address could be read.
pub fn addresses(api: &dyn OneApi, target: &VmTarget, all: bool) -> Result<Vec<String>> {
    let id = resolve::resolve_id(api, &target.vm)?;
    let vm = api.vm_info(id)?;

    if all {
        resolve::all_addresses(&vm, &target.selector)
    } else {
        resolve::first_address(&vm, &target.selector).map(|ip| vec![ip])
    }
}
