use crate::SERVICE_TYPE;
use anyhow::Result;
use mdns_sd::{ServiceDaemon, ServiceEvent};

/// Diagnostic mode: print every discovery and resolution event for the adrop
/// service type until the process is interrupted. Not part of the transfer
/// path.
pub fn scan_all() -> Result<()> {
    let daemon = ServiceDaemon::new()?;
    let receiver = daemon.browse(SERVICE_TYPE)?;

    loop {
        match receiver.recv() {
            Ok(ServiceEvent::SearchStarted(ty)) => println!("searching '{}'", ty),
            Ok(ServiceEvent::ServiceFound(ty, fullname)) => {
                println!("service instance '{}' ({})", fullname, ty)
            }
            Ok(ServiceEvent::ServiceResolved(info)) => {
                for addr in info.get_addresses() {
                    println!(
                        "host '{}' at {} port {} for '{}'",
                        info.get_hostname(),
                        addr,
                        info.get_port(),
                        info.get_fullname()
                    );
                }
            }
            Ok(ServiceEvent::ServiceRemoved(_ty, fullname)) => {
                println!("service instance '{}' gone", fullname)
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    Ok(())
}
