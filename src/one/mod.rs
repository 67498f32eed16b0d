//! OpenNebula API access.

use crate::error::Result;
use crate::xml::Node;

pub mod client;
pub mod state;
pub mod xmlrpc;

pub use client::OneClient;
pub use state::LifecycleState;

/// The subset of the OpenNebula API this tool consumes
pub trait OneApi {
    /// Resolve a VM name to its numeric id
    fn vm_id_by_name(&self, name: &str) -> Result<u32>;

    /// Fetch the full `<VM>` descriptor
    fn vm_info(&self, id: u32) -> Result<Node>;

    /// Re-fetch the descriptor and read its lifecycle state
    fn vm_state(&self, id: u32) -> Result<LifecycleState> {
        let vm = self.vm_info(id)?;
        LifecycleState::from_descriptor(&vm)
    }
}
