use crate::models::MemorySize;

const KIB: f64 = 1024.0;

pub fn format_bytes(bytes: u64) -> String {
    let units = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= KIB && unit < units.len() - 1 {
        value /= KIB;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, units[unit])
    }
}

pub fn format_memory(memory: Option<MemorySize>) -> String {
    match memory {
        Some(memory) => format_bytes(memory.as_bytes()),
        None => "-".to_string(),
    }
}

pub fn format_uptime(uptime_secs: Option<u64>) -> String {
    match uptime_secs {
        Some(0) | None => "-".to_string(),
        Some(secs) => {
            let days = secs / 86_400;
            let hours = (secs % 86_400) / 3_600;
            let minutes = (secs % 3_600) / 60;
            if days > 0 {
                format!("{}d {}h {}m", days, hours, minutes)
            } else if hours > 0 {
                format!("{}h {}m", hours, minutes)
            } else {
                format!("{}m", minutes)
            }
        }
    }
}

/// CPU usage as reported by the API is a fraction of the allotted vCPUs.
pub fn format_cpu_usage(cpu: Option<f64>) -> String {
    match cpu {
        Some(cpu) => format!("{:.1}%", cpu * 100.0),
        None => "-".to_string(),
    }
}

#[test]
fn test_format_bytes() {
    assert_eq!(format_bytes(512), "512 B");
    assert_eq!(format_bytes(4294967296), "4.0 GiB");
    assert_eq!(format_bytes(1536 * 1024), "1.5 MiB");
}

#[test]
fn test_format_memory_handles_both_units() {
    assert_eq!(format_memory(Some(MemorySize::Mebibytes(4096))), "4.0 GiB");
    assert_eq!(format_memory(Some(MemorySize::Bytes(2147483648))), "2.0 GiB");
    assert_eq!(format_memory(None), "-");
}

#[test]
fn test_format_uptime() {
    assert_eq!(format_uptime(None), "-");
    assert_eq!(format_uptime(Some(59)), "0m");
    assert_eq!(format_uptime(Some(3_660)), "1h 1m");
    assert_eq!(format_uptime(Some(90_061)), "1d 1h 1m");
}
