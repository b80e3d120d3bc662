use std::io::{Error, ErrorKind};
use std::net::IpAddr;

/// First non-loopback IPv4 address on this machine, in interface-name order.
/// This is the address the advertisement carries.
pub fn pick_lan_ip() -> Result<IpAddr, Error> {
    let mut ifs = if_addrs::get_if_addrs()?;
    ifs.sort_by(|a, b| a.name.cmp(&b.name));

    ifs.into_iter()
        .map(|ifa| ifa.ip())
        .find(|ip| ip.is_ipv4() && !ip.is_loopback())
        .ok_or_else(|| {
            Error::new(
                ErrorKind::AddrNotAvailable,
                "no usable non-loopback IPv4 interface",
            )
        })
}
