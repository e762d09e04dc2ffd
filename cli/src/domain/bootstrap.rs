//! Chef client bootstrap plan.
//!
//! Pure construction of the remote steps; execution lives in
//! `application::services::bootstrap`.

use alamo_common::ServerRecord;

use crate::domain::settings::ProvisioningConfig;

pub const CHEF_DIR: &str = "/etc/chef";
pub const VALIDATION_PATH: &str = "/etc/chef/validation.pem";
pub const CLIENT_RB_PATH: &str = "/etc/chef/client.rb";
pub const FIRST_BOOT_PATH: &str = "/etc/chef/first-boot.json";

/// Network name preferred when picking the address to connect to.
pub const PREFERRED_NETWORK: &str = "private";

/// One remote command, optionally fed a payload on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapStep {
    pub name: &'static str,
    pub command: String,
    pub stdin: Option<Vec<u8>>,
}

impl BootstrapStep {
    fn run(name: &'static str, command: String) -> Self {
        Self {
            name,
            command,
            stdin: None,
        }
    }

    /// Files are created owner-only and widened to `mode` once written.
    fn upload(name: &'static str, path: &str, mode: &str, contents: Vec<u8>) -> Self {
        Self {
            name,
            command: format!(
                "umask 077 && sudo tee {path} > /dev/null && sudo chmod {mode} {path}",
                path = shell_quote(path)
            ),
            stdin: Some(contents),
        }
    }
}

/// Pick the address to bootstrap through: the `private` network first, then
/// any network, IPv4 before IPv6 within each.
#[must_use]
pub fn select_address(server: &ServerRecord) -> Option<&str> {
    let preferred = server.addresses.get(PREFERRED_NETWORK).into_iter();
    let rest = server
        .addresses
        .iter()
        .filter(|(net, _)| net.as_str() != PREFERRED_NETWORK)
        .map(|(_, entries)| entries);

    preferred.chain(rest).find_map(|entries| {
        entries
            .iter()
            .find(|e| e.version.is_none_or(|v| v == 4))
            .or_else(|| entries.first())
            .map(|e| e.addr.as_str())
    })
}

/// Node name registered with the Chef server.
#[must_use]
pub fn node_name(server: &ServerRecord) -> &str {
    if server.name.is_empty() {
        &server.id
    } else {
        &server.name
    }
}

/// Render `/etc/chef/client.rb`.
#[must_use]
pub fn client_rb(config: &ProvisioningConfig, node_name: &str) -> String {
    format!(
        "log_level :info\n\
         log_location STDOUT\n\
         chef_server_url {server}\n\
         validation_client_name {client}\n\
         validation_key {key}\n\
         node_name {node}\n",
        server = ruby_string(&config.chef_server_url),
        client = ruby_string(&config.validation_client_name),
        key = ruby_string(VALIDATION_PATH),
        node = ruby_string(node_name),
    )
}

/// Render `/etc/chef/first-boot.json`.
#[must_use]
pub fn first_boot_json(run_list: &[String]) -> String {
    serde_json::json!({ "run_list": run_list }).to_string()
}

/// Build the ordered bootstrap steps.
///
/// `validation_key` is the local validation credential, read by the caller
/// before any remote action.
#[must_use]
pub fn plan(
    config: &ProvisioningConfig,
    server: &ServerRecord,
    validation_key: Vec<u8>,
) -> Vec<BootstrapStep> {
    let node = node_name(server);
    vec![
        BootstrapStep::run("prepare chef directory", format!("sudo mkdir -p {CHEF_DIR}")),
        BootstrapStep::upload("upload validation key", VALIDATION_PATH, "600", validation_key),
        BootstrapStep::upload(
            "write client.rb",
            CLIENT_RB_PATH,
            "644",
            client_rb(config, node).into_bytes(),
        ),
        BootstrapStep::upload(
            "write first-boot.json",
            FIRST_BOOT_PATH,
            "644",
            first_boot_json(&config.run_list).into_bytes(),
        ),
        BootstrapStep::run(
            "install chef-client",
            format!(
                "command -v chef-client > /dev/null 2>&1 || curl -sSL {} | sudo bash",
                shell_quote(&config.install_url)
            ),
        ),
        BootstrapStep::run(
            "run chef-client",
            format!(
                "sudo chef-client -j {FIRST_BOOT_PATH} -E {}",
                shell_quote(&config.environment)
            ),
        ),
    ]
}

/// Quote `value` for a POSIX shell. Plain words pass through unchanged.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

fn ruby_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', r"\\").replace('"', "\\\""))
}
