//! Stable per-machine identifier for telemetry correlation.
//!
//! Hashes a platform hardware ID with SHA-256 so the raw identifier never
//! leaves the machine. The digest is stable across invocations.

use sha2::{Digest, Sha256};

/// Returns the stable device identifier for this machine.
///
/// Falls back to a fixed sentinel digest when no hardware ID can be read,
/// so scope construction never fails on exotic platforms.
pub fn device_id() -> String {
    match platform_hardware_id() {
        Ok(raw) => hex_sha256(raw.trim()),
        Err(error) => {
            tracing::debug!("could not read platform hardware ID: {error}");
            hex_sha256("unknown-machine")
        }
    }
}

/// Returns a raw platform-specific hardware identifier string.
fn platform_hardware_id() -> std::io::Result<String> {
    #[cfg(target_os = "macos")]
    return macos_platform_uuid();

    #[cfg(target_os = "linux")]
    return linux_machine_id();

    #[cfg(target_os = "windows")]
    return windows_machine_guid();

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "no hardware ID source on this platform",
    ))
}

#[cfg(target_os = "macos")]
fn macos_platform_uuid() -> std::io::Result<String> {
    let out = std::process::Command::new("ioreg")
        .args(["-rd1", "-c", "IOPlatformExpertDevice"])
        .output()?;

    let stdout = String::from_utf8_lossy(&out.stdout);
    for line in stdout.lines() {
        if line.contains("IOPlatformUUID") {
            // "IOPlatformUUID" = "XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX"
            if let Some(start) = line.rfind('"') {
                let tail = &line[..start];
                if let Some(end) = tail.rfind('"') {
                    return Ok(line[end + 1..start].to_string());
                }
            }
        }
    }
    Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "IOPlatformUUID not found in ioreg output",
    ))
}

#[cfg(target_os = "linux")]
fn linux_machine_id() -> std::io::Result<String> {
    std::fs::read_to_string("/etc/machine-id")
        .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
}

#[cfg(target_os = "windows")]
fn windows_machine_guid() -> std::io::Result<String> {
    let out = std::process::Command::new("reg")
        .args([
            "query",
            r"HKLM\SOFTWARE\Microsoft\Cryptography",
            "/v",
            "MachineGuid",
        ])
        .output()?;

    let stdout = String::from_utf8_lossy(&out.stdout);
    for line in stdout.lines() {
        if line.contains("MachineGuid") {
            if let Some(guid) = line.split_whitespace().last() {
                return Ok(guid.to_string());
            }
        }
    }
    Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "MachineGuid not found in registry output",
    ))
}

fn hex_sha256(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_is_stable() {
        assert_eq!(device_id(), device_id());
    }

    #[test]
    fn test_device_id_is_hex_digest() {
        let id = device_id();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
