//! Campaign Keystore
//!
//! Wallet keypair persistence with platform-aware paths. Keypairs are written
//! in the Solana CLI format (a JSON array of the 64 `secret || public` bytes);
//! a raw 32-byte secret file is also accepted on load.
//!
//! A wallet remembers that the user approved a connection by writing a trust
//! marker next to its keypair file.

use std::fs;
use std::path::{Path, PathBuf};

use campaign_crypto::{KeyError, SigningKeypair};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum KeystoreError {
    #[error("Failed to read key file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid key format: {0}")]
    InvalidFormat(String),
    #[error("Invalid keypair: {0}")]
    InvalidKeypair(#[from] KeyError),
}

pub type Result<T> = std::result::Result<T, KeystoreError>;

/// Suffix appended to a keypair path to form its trust marker.
const TRUST_SUFFIX: &str = "trusted";

/// Load a keypair from `path`.
pub fn load_keypair(path: &Path) -> Result<SigningKeypair> {
    debug!("Loading keypair from {}", path.display());
    let bytes = fs::read(path).map_err(|source| KeystoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_keypair(&bytes)
}

/// Parse either a Solana CLI JSON keypair or a raw 32-byte secret.
pub fn parse_keypair(bytes: &[u8]) -> Result<SigningKeypair> {
    if bytes.len() == 32 {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(bytes);
        return Ok(SigningKeypair::from_secret_bytes(&secret));
    }
    let values: Vec<u8> = serde_json::from_slice(bytes)
        .map_err(|e| KeystoreError::InvalidFormat(e.to_string()))?;
    Ok(SigningKeypair::from_keypair_bytes(&values)?)
}

/// Load the keypair at `path`, generating and saving a new one if absent.
pub fn load_or_generate_keypair(path: &Path) -> Result<SigningKeypair> {
    if path.exists() {
        return load_keypair(path);
    }
    info!("Generating new wallet keypair at {}", path.display());
    let keypair = SigningKeypair::generate();
    save_keypair(path, &keypair)?;
    Ok(keypair)
}

/// Save a keypair in Solana CLI JSON format, creating parent directories.
pub fn save_keypair(path: &Path, keypair: &SigningKeypair) -> Result<()> {
    let json = serde_json::to_string(&keypair.to_keypair_bytes().to_vec())
        .map_err(|e| KeystoreError::InvalidFormat(e.to_string()))?;
    write_creating_dirs(path, json.as_bytes())
}

/// Path of the trust marker belonging to a keypair file.
pub fn trust_marker_path(keypair_path: &Path) -> PathBuf {
    let mut name = keypair_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(TRUST_SUFFIX);
    keypair_path.with_file_name(name)
}

/// Whether the user previously approved a connection for this keypair.
pub fn is_trusted(keypair_path: &Path) -> bool {
    trust_marker_path(keypair_path).exists()
}

/// Remember that the user approved a connection for this keypair.
pub fn mark_trusted(keypair_path: &Path) -> Result<()> {
    let marker = trust_marker_path(keypair_path);
    if marker.exists() {
        return Ok(());
    }
    debug!("Writing trust marker {}", marker.display());
    write_creating_dirs(&marker, b"")
}

fn write_creating_dirs(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| KeystoreError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| KeystoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Default config directory for a service.
///
/// - macOS: `~/Library/Application Support/{service}`
/// - Linux: `$XDG_CONFIG_HOME/{service}` or `~/.config/{service}`
/// - elsewhere: `~/.{service}`
pub fn default_config_dir_for(service: &str) -> PathBuf {
    platform_dir(service, "XDG_CONFIG_HOME", &[".config"])
}

/// Default data directory for a service.
///
/// - macOS: `~/Library/Application Support/{service}`
/// - Linux: `$XDG_DATA_HOME/{service}` or `~/.local/share/{service}`
/// - elsewhere: `~/.{service}`
pub fn data_dir(service: &str) -> PathBuf {
    platform_dir(service, "XDG_DATA_HOME", &[".local", "share"])
}

/// Default wallet keypair path for a service.
pub fn default_keypair_path_for(service: &str) -> PathBuf {
    data_dir(service).join("keys").join("id.json")
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None if path == "~" => home_dir(),
        None => PathBuf::from(path),
    }
}

#[allow(unused_variables)]
fn platform_dir(service: &str, xdg_var: &str, fallback: &[&str]) -> PathBuf {
    let service = service.to_lowercase();
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join(service)
    }
    #[cfg(target_os = "linux")]
    {
        let base = std::env::var(xdg_var)
            .map(PathBuf::from)
            .unwrap_or_else(|_| fallback.iter().fold(home_dir(), |p, part| p.join(part)));
        base.join(service)
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        home_dir().join(format!(".{service}"))
    }
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_generate_and_load_keypair() {
        let dir = scratch("campaign-keystore-test");
        let path = dir.join("id.json");

        let kp1 = load_or_generate_keypair(&path).unwrap();
        let kp2 = load_or_generate_keypair(&path).unwrap();
        assert_eq!(kp1.pubkey(), kp2.pubkey());

        // Written in Solana CLI format
        let content = fs::read_to_string(&path).unwrap();
        let values: Vec<u8> = serde_json::from_str(&content).unwrap();
        assert_eq!(values.len(), 64);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_raw_secret_accepted() {
        let kp = SigningKeypair::generate();
        let loaded = parse_keypair(&kp.secret_key_bytes()).unwrap();
        assert_eq!(loaded.pubkey(), kp.pubkey());
    }

    #[test]
    fn test_invalid_key_format() {
        let dir = scratch("campaign-keystore-test-invalid");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        fs::write(&path, b"too short").unwrap();

        assert!(matches!(
            load_keypair(&path),
            Err(KeystoreError::InvalidFormat(_))
        ));

        fs::write(&path, b"[1,2,3]").unwrap();
        assert!(matches!(
            load_keypair(&path),
            Err(KeystoreError::InvalidKeypair(KeyError::InvalidLength(3)))
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let path = scratch("campaign-keystore-missing").join("nope.json");
        assert!(matches!(load_keypair(&path), Err(KeystoreError::Read { .. })));
    }

    #[test]
    fn test_trust_marker() {
        let dir = scratch("campaign-keystore-trust");
        let path = dir.join("id.json");
        assert_eq!(trust_marker_path(&path), dir.join("id.json.trusted"));

        assert!(!is_trusted(&path));
        mark_trusted(&path).unwrap();
        assert!(is_trusted(&path));
        // Idempotent
        mark_trusted(&path).unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_default_paths() {
        let key_path = default_keypair_path_for("campaign");
        assert!(key_path.ends_with("keys/id.json"));
        assert!(!default_config_dir_for("campaign").as_os_str().is_empty());
    }

    #[test]
    fn test_expand_path() {
        assert!(!expand_path("~/wallet.json").to_string_lossy().starts_with('~'));
        assert_eq!(expand_path("/abs/id.json"), PathBuf::from("/abs/id.json"));
    }
}
