//! VM lookup and address extraction.

use crate::error::{OnegoError, Result};
use crate::one::OneApi;
use crate::xml::{Node, Path};
use tracing::debug;

/// How the operator named the VM
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmRef {
    Id(u32),
    Name(String),
}

/// Which NIC to read the address from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AddressSelector {
    /// First NIC in the descriptor
    #[default]
    First,
    NicId(u32),
    NetworkId(u32),
    Network(String),
}

/// A validated VM and NIC choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmTarget {
    pub vm: VmRef,
    pub selector: AddressSelector,
}

/// Turn a [`VmRef`] into a numeric id.
///
/// Ids are taken as-is; existence is checked by the later descriptor fetch.
pub fn resolve_id(api: &dyn OneApi, vm: &VmRef) -> Result<u32> {
    match vm {
        VmRef::Id(id) => Ok(*id),
        VmRef::Name(name) => {
            let id = api.vm_id_by_name(name)?;
            debug!(name = %name, id, "resolved VM name");
            Ok(id)
        }
    }
}

/// Path to the NIC nodes matching `selector`
pub fn nic_path(selector: &AddressSelector) -> Path {
    let template = Path::root("VM").child("TEMPLATE");
    match selector {
        AddressSelector::First => template.child("NIC"),
        AddressSelector::NicId(id) => template.child_where("NIC", "NIC_ID", id.to_string()),
        AddressSelector::NetworkId(id) => {
            template.child_where("NIC", "NETWORK_ID", id.to_string())
        }
        AddressSelector::Network(name) => template.child_where("NIC", "NETWORK", name.as_str()),
    }
}

/// Path to the address leaf of the NICs matching `selector`
pub fn address_path(selector: &AddressSelector) -> Path {
    nic_path(selector).child("IP")
}

/// First non-empty address among the NICs matching `selector`
pub fn first_address(vm: &Node, selector: &AddressSelector) -> Result<String> {
    let path = address_path(selector);
    debug!(path = %path, "looking up address");

    vm.select_all(&path)
        .into_iter()
        .map(|ip| ip.text.as_str())
        .find(|ip| !ip.is_empty())
        .map(str::to_string)
        .ok_or(OnegoError::IpNotFound)
}

/// Addresses of every NIC matching `selector`, in descriptor order.
///
/// Fails on the first matching NIC without an address.
pub fn all_addresses(vm: &Node, selector: &AddressSelector) -> Result<Vec<String>> {
    let path = nic_path(selector);
    debug!(path = %path, "looking up all addresses");

    let nics = vm.select_all(&path);
    if nics.is_empty() {
        return Err(OnegoError::IpNotFound);
    }

    nics.into_iter()
        .map(|nic| {
            nic.child_text("IP")
                .filter(|ip| !ip.is_empty())
                .map(str::to_string)
                .ok_or(OnegoError::IpNotFound)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const VM_XML: &str = r#"<VM>
  <ID>42</ID>
  <NAME>web</NAME>
  <STATE>3</STATE>
  <LCM_STATE>3</LCM_STATE>
  <TEMPLATE>
    <NIC>
      <IP><![CDATA[10.0.0.1]]></IP>
      <NETWORK><![CDATA[A]]></NETWORK>
      <NETWORK_ID><![CDATA[5]]></NETWORK_ID>
      <NIC_ID><![CDATA[0]]></NIC_ID>
    </NIC>
    <NIC>
      <IP><![CDATA[10.0.0.2]]></IP>
      <NETWORK><![CDATA[B]]></NETWORK>
      <NETWORK_ID><![CDATA[6]]></NETWORK_ID>
      <NIC_ID><![CDATA[1]]></NIC_ID>
    </NIC>
  </TEMPLATE>
</VM>"#;

    struct FakeApi {
        lookups: Cell<u32>,
    }

    impl OneApi for FakeApi {
        fn vm_id_by_name(&self, name: &str) -> Result<u32> {
            self.lookups.set(self.lookups.get() + 1);
            match name {
                "web" => Ok(42),
                _ => Err(OnegoError::VmNotFound(name.to_string())),
            }
        }

        fn vm_info(&self, _id: u32) -> Result<Node> {
            Node::parse(VM_XML)
        }
    }

    fn fake() -> FakeApi {
        FakeApi {
            lookups: Cell::new(0),
        }
    }

    fn vm() -> Node {
        Node::parse(VM_XML).unwrap()
    }

    #[test]
    fn test_resolve_id_skips_api() {
        let api = fake();
        assert_eq!(resolve_id(&api, &VmRef::Id(42)).unwrap(), 42);
        assert_eq!(api.lookups.get(), 0);
    }

    #[test]
    fn test_resolve_name() {
        let api = fake();
        assert_eq!(resolve_id(&api, &VmRef::Name("web".into())).unwrap(), 42);
        assert_eq!(api.lookups.get(), 1);
    }

    #[test]
    fn test_resolve_unknown_name() {
        let api = fake();
        let err = resolve_id(&api, &VmRef::Name("nope".into())).unwrap_err();
        assert!(matches!(err, OnegoError::VmNotFound(_)));
    }

    #[test]
    fn test_address_paths() {
        assert_eq!(
            address_path(&AddressSelector::First).to_string(),
            "/VM/TEMPLATE/NIC/IP"
        );
        assert_eq!(
            address_path(&AddressSelector::NicId(1)).to_string(),
            "/VM/TEMPLATE/NIC[NIC_ID='1']/IP"
        );
        assert_eq!(
            address_path(&AddressSelector::NetworkId(6)).to_string(),
            "/VM/TEMPLATE/NIC[NETWORK_ID='6']/IP"
        );
        assert_eq!(
            address_path(&AddressSelector::Network("B".into())).to_string(),
            "/VM/TEMPLATE/NIC[NETWORK='B']/IP"
        );
    }

    #[test]
    fn test_first_address_default() {
        assert_eq!(first_address(&vm(), &AddressSelector::First).unwrap(), "10.0.0.1");
    }

    #[test]
    fn test_first_address_by_network() {
        let selector = AddressSelector::Network("B".into());
        assert_eq!(first_address(&vm(), &selector).unwrap(), "10.0.0.2");
    }

    #[test]
    fn test_first_address_by_nic_and_network_id() {
        assert_eq!(first_address(&vm(), &AddressSelector::NicId(1)).unwrap(), "10.0.0.2");
        assert_eq!(first_address(&vm(), &AddressSelector::NetworkId(5)).unwrap(), "10.0.0.1");
    }

    #[test]
    fn test_first_address_no_match() {
        let err = first_address(&vm(), &AddressSelector::Network("C".into())).unwrap_err();
        assert!(matches!(err, OnegoError::IpNotFound));
    }

    #[test]
    fn test_all_addresses_in_order() {
        let ips = all_addresses(&vm(), &AddressSelector::First).unwrap();
        assert_eq!(ips, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_all_addresses_filtered() {
        let ips = all_addresses(&vm(), &AddressSelector::NicId(0)).unwrap();
        assert_eq!(ips, vec!["10.0.0.1"]);
    }

    #[test]
    fn test_all_addresses_missing_leaf_midway() {
        let vm = Node::parse(
            r#"<VM><TEMPLATE>
<NIC><IP>10.0.0.1</IP><NIC_ID>0</NIC_ID></NIC>
<NIC><NIC_ID>1</NIC_ID></NIC>
<NIC><IP>10.0.0.3</IP><NIC_ID>2</NIC_ID></NIC>
</TEMPLATE></VM>"#,
        )
        .unwrap();

        let err = all_addresses(&vm, &AddressSelector::First).unwrap_err();
        assert!(matches!(err, OnegoError::IpNotFound));
    }

    #[test]
    fn test_no_nics() {
        let vm = Node::parse("<VM><TEMPLATE/></VM>").unwrap();
        assert!(matches!(
            first_address(&vm, &AddressSelector::First),
            Err(OnegoError::IpNotFound)
        ));
        assert!(matches!(
            all_addresses(&vm, &AddressSelector::First),
            Err(OnegoError::IpNotFound)
        ));
    }

    #[test]
    fn test_first_nic_without_ip() {
        let vm = Node::parse(
            "<VM><TEMPLATE><NIC><NIC_ID>0</NIC_ID></NIC><NIC><IP>10.0.0.2</IP></NIC></TEMPLATE></VM>",
        )
        .unwrap();
        // Matches the first IP leaf anywhere under the matched NICs
        assert_eq!(first_address(&vm, &AddressSelector::First).unwrap(), "10.0.0.2");
    }

    #[test]
    fn test_first_address_skips_empty_leaf() {
        let vm = Node::parse(
            "<VM><TEMPLATE><NIC><IP/></NIC><NIC><IP>10.0.0.2</IP></NIC></TEMPLATE></VM>",
        )
        .unwrap();
        assert_eq!(first_address(&vm, &AddressSelector::First).unwrap(), "10.0.0.2");
    }

    #[test]
    fn test_first_address_all_empty() {
        let vm = Node::parse("<VM><TEMPLATE><NIC><IP></IP></NIC></TEMPLATE></VM>").unwrap();
        assert!(matches!(
            first_address(&vm, &AddressSelector::First),
            Err(OnegoError::IpNotFound)
        ));
    }
}
