use crate::errors::{ProxmoxError, ProxmoxResult};

/// Highest adapter index QEMU VMs accept (`net0`..`net31`).
pub const MAX_ADAPTER_INDEX: u8 = 31;

pub fn adapter_key(index: u8) -> ProxmoxResult<String> {
    if index > MAX_ADAPTER_INDEX {
        return Err(ProxmoxError::validation(
            "network adapter",
            format!("index {} is above net{}", index, MAX_ADAPTER_INDEX),
        ));
    }
    Ok(format!("net{}", index))
}

/// Rewrites the `link_down` option of an adapter definition such as
/// `virtio=BC:24:11:2E:10:01,bridge=vmbr0,firewall=1`, keeping all other options
/// in their original order.
pub fn with_link_state(adapter: &str, link_down: bool) -> String {
    let link_option = format!("link_down={}", u8::from(link_down));
    let mut options: Vec<String> = vec![];
    let mut replaced = false;

    for option in adapter.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        match option.split_once('=') {
            Some(("link_down", _)) => {
                if !replaced {
                    options.push(link_option.clone());
                    replaced = true;
                }
            }
            _ => options.push(option.to_string()),
        }
    }

    if !replaced {
        options.push(link_option);
    }
    options.join(",")
}

#[test]
fn test_adapter_key_bounds() {
    assert_eq!(adapter_key(0).unwrap(), "net0");
    assert_eq!(adapter_key(31).unwrap(), "net31");
    assert!(adapter_key(32).is_err());
}

#[test]
fn test_link_state_appended_and_options_kept() {
    assert_eq!(
        with_link_state("virtio=BC:24:11:2E:10:01,bridge=vmbr0,firewall=1", true),
        "virtio=BC:24:11:2E:10:01,bridge=vmbr0,firewall=1,link_down=1"
    );
}

#[test]
fn test_link_state_replaced_in_place() {
    assert_eq!(
        with_link_state("e1000=BC:24:11:2E:10:02,link_down=1,bridge=vmbr1", false),
        "e1000=BC:24:11:2E:10:02,link_down=0,bridge=vmbr1"
    );
}
