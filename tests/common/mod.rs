//! Helpers shared by the integration tests: an in-process XML-RPC stub
//! standing in for the OpenNebula frontend, and canned documents.
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

pub const VM_42: &str = "<VM><ID>42</ID><NAME>web</NAME><STATE>3</STATE><LCM_STATE>3</LCM_STATE>\
<TEMPLATE>\
<NIC><IP><![CDATA[10.0.0.1]]></IP><NETWORK><![CDATA[A]]></NETWORK><NETWORK_ID>5</NETWORK_ID><NIC_ID>0</NIC_ID></NIC>\
<NIC><IP><![CDATA[10.0.0.2]]></IP><NETWORK><![CDATA[B]]></NETWORK><NETWORK_ID>6</NETWORK_ID><NIC_ID>1</NIC_ID></NIC>\
</TEMPLATE></VM>";

pub const POOL: &str = "<VM_POOL>\
<VM><ID>7</ID><NAME>db</NAME></VM>\
<VM><ID>42</ID><NAME>web</NAME></VM>\
</VM_POOL>";

/// A `<VM>` document in the given STATE / LCM_STATE with one NIC
pub fn vm_in_state(state: u32, lcm_state: u32) -> String {
    format!(
        "<VM><ID>42</ID><STATE>{}</STATE><LCM_STATE>{}</LCM_STATE>\
         <TEMPLATE><NIC><IP>10.0.0.1</IP><NIC_ID>0</NIC_ID></NIC></TEMPLATE></VM>",
        state, lcm_state
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Successful OpenNebula response carrying `body`
pub fn rpc_ok(body: &str) -> String {
    rpc_response(true, body)
}

/// Failed OpenNebula response carrying `message`
pub fn rpc_err(message: &str) -> String {
    rpc_response(false, message)
}

fn rpc_response(success: bool, body: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse><params><param><value><array><data>\
         <value><boolean>{}</boolean></value>\
         <value><string>{}</string></value>\
         <value><i4>{}</i4></value>\
         </data></array></value></param></params></methodResponse>",
        if success { 1 } else { 0 },
        xml_escape(body),
        if success { 0 } else { 1024 }
    )
}

/// Serves each response to exactly one connection, in order, then stops.
///
/// Joining the handle yields the request bodies received.
pub struct StubServer {
    pub endpoint: String,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    pub fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/RPC2", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                requests.push(read_body(&mut stream));
                let reply = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.len(),
                    response
                );
                stream.write_all(reply.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
            requests
        });

        Self { endpoint, handle }
    }

    pub fn requests(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn read_body(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = end + 4;
        if buf.len() >= body_start + length {
            return String::from_utf8_lossy(&buf[body_start..body_start + length]).to_string();
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

/// Isolated HOME with a valid auth file
pub struct Sandbox {
    pub home: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("one_auth"), "oneadmin:opennebula\n").unwrap();
        Self { home }
    }

    pub fn auth_file(&self) -> PathBuf {
        self.home.path().join("one_auth")
    }

    pub fn path(&self) -> &Path {
        self.home.path()
    }

    /// `onego` command with HOME, credentials and proxies pinned down
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("onego"));
        cmd.env("HOME", self.path())
            .env("ONE_AUTH", self.auth_file())
            .env_remove("ONE_XMLRPC")
            .env_remove("ONEGO_SSH_USER")
            .env_remove("RUST_LOG")
            .env_remove("http_proxy")
            .env_remove("HTTP_PROXY")
            .env_remove("all_proxy")
            .env_remove("ALL_PROXY");
        cmd
    }
}
