use super::xmlrpc::{self, Param};
use super::OneApi;
use crate::config::Config;
use crate::error::{OnegoError, Result};
use crate::xml::{Node, Path};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

/// `one.vmpool.info` filter selecting every VM the user may see
const FILTER_ALL: i64 = -2;

/// `one.vmpool.info` state filter for any state except DONE
const STATE_ANY: i64 = -1;

pub struct OneClient {
    http: Client,
    endpoint: String,
    session: String,
}

impl OneClient {
    pub fn new(
        endpoint: impl Into<String>,
        session: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            session: session.into(),
        })
    }

    /// Build a client from the endpoint and credentials in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let session = config.session()?;
        debug!(endpoint = %config.one.endpoint, "using OpenNebula endpoint");
        Self::new(
            config.one.endpoint.clone(),
            session,
            Duration::from_secs(config.one.timeout),
        )
    }

    fn call(&self, method: &str, params: &[Param]) -> Result<String> {
        let mut all = Vec::with_capacity(params.len() + 1);
        all.push(Param::Str(self.session.clone()));
        all.extend_from_slice(params);

        debug!(method, "calling OpenNebula");
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .body(xmlrpc::encode_call(method, &all))
            .send()?
            .error_for_status()?
            .text()?;

        xmlrpc::decode_response(&response)
    }
}

impl OneApi for OneClient {
    fn vm_id_by_name(&self, name: &str) -> Result<u32> {
        let body = self.call(
            "one.vmpool.info",
            &[
                Param::Int(FILTER_ALL),
                Param::Int(-1),
                Param::Int(-1),
                Param::Int(STATE_ANY),
            ],
        )?;
        let pool = Node::parse(&body)?;
        find_vm_by_name(&pool, name)
    }

    fn vm_info(&self, id: u32) -> Result<Node> {
        let body = self.call("one.vm.info", &[Param::Int(i64::from(id))])?;
        Node::parse(&body)
    }
}

/// Find the single VM called `name` in a `<VM_POOL>` document
pub fn find_vm_by_name(pool: &Node, name: &str) -> Result<u32> {
    let vms = Path::root("VM_POOL").child_where("VM", "NAME", name);

    let ids = pool
        .select_all(&vms)
        .into_iter()
        .map(|vm| {
            let id = vm.child_text("ID").unwrap_or_default();
            id.parse::<u32>()
                .map_err(|_| OnegoError::XmlParse(format!("VM '{}' has invalid ID '{}'", name, id)))
        })
        .collect::<Result<Vec<_>>>()?;

    match ids.as_slice() {
        [] => Err(OnegoError::VmNotFound(name.to_string())),
        [id] => Ok(*id),
        _ => Err(OnegoError::VmNameAmbiguous {
            name: name.to_string(),
            ids: ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}
