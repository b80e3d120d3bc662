use crate::net::pick_lan_ip;
use crate::SERVICE_TYPE;
use anyhow::{Context, Result};
use mdns_sd::{ServiceDaemon, ServiceInfo};
use std::time::Duration;

/// Registration guard: the service stays advertised while this is alive and
/// is withdrawn when dropped.
pub struct Advertiser {
    daemon: ServiceDaemon,
    fullname: String,
}

impl Advertiser {
    /// Register `instance_name` under the adrop service type on `port`,
    /// advertising the first usable LAN address of this machine.
    pub fn register(instance_name: &str, port: u16) -> Result<Self> {
        let daemon = ServiceDaemon::new().context("starting mDNS daemon")?;
        let ip = pick_lan_ip().context("choosing advertised address")?;
        let host_name = ensure_dot(&format!("{}.local", host_label(instance_name)));

        let props: &[(&str, &str)] = &[];
        let info = ServiceInfo::new(
            SERVICE_TYPE,
            instance_name,
            &host_name,
            &ip.to_string(),
            port,
            props,
        )
        .context("building service record")?;

        let fullname = info.get_fullname().to_string();
        daemon
            .register(info)
            .context("registering mDNS service")?;
        tracing::info!("advertising '{}' at {}:{}", fullname, ip, port);

        Ok(Self { daemon, fullname })
    }

    pub fn fullname(&self) -> &str {
        &self.fullname
    }
}

impl Drop for Advertiser {
    fn drop(&mut self) {
        // Withdraw the advertisement before the daemon goes away, giving the
        // goodbye packets a moment to flush.
        if let Ok(rx) = self.daemon.unregister(&self.fullname) {
            let _ = rx.recv_timeout(Duration::from_secs(1));
        }
        let _ = self.daemon.shutdown();
    }
}

/// Ensure trailing dot as mdns-sd expects FQDNs.
fn ensure_dot(s: &str) -> String {
    if s.ends_with('.') {
        s.to_string()
    } else {
        format!("{}.", s)
    }
}

/// Instance names are free-form; host labels are not. Lowercase and squeeze
/// anything outside [a-z0-9-] to a dash.
fn host_label(name: &str) -> String {
    let label: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    if label.is_empty() {
        "adrop".to_string()
    } else {
        label
    }
}
