//! Collector: obtain the raw battery registry dump.
//!
//! Runs `ioreg` once (no retries, no timeout) or reads a saved dump.

use crate::error::CollectError;
use crate::parsers::LineShape;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Default location of the registry query tool.
pub const DEFAULT_IOREG_PATH: &str = "/usr/sbin/ioreg";

/// Registry class of the battery controller.
pub const BATTERY_CLASS: &str = "AppleSmartBattery";

/// Which `ioreg` invocation produces the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistrySource {
    /// `ioreg -r -c AppleSmartBattery`: the battery node only
    #[default]
    SmartBattery,
    /// `ioreg -l -w 0`: the whole tree, narrowed to the battery node
    RegistryTree,
}

impl RegistrySource {
    pub fn args(self) -> &'static [&'static str] {
        match self {
            RegistrySource::SmartBattery => &["-r", "-c", BATTERY_CLASS],
            RegistrySource::RegistryTree => &["-l", "-w", "0"],
        }
    }

    /// Line shape the parser should expect for this source.
    pub fn line_shape(self) -> LineShape {
        match self {
            RegistrySource::SmartBattery => LineShape::Registry,
            RegistrySource::RegistryTree => LineShape::Tree,
        }
    }

    /// Reduce raw command output to the battery section.
    pub fn extract(self, stdout: &str) -> String {
        match self {
            RegistrySource::SmartBattery => stdout.to_string(),
            RegistrySource::RegistryTree => isolate_device_section(stdout, BATTERY_CLASS),
        }
    }
}

/// Raw dump plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutput {
    /// Command line or file path that produced the dump
    pub command: String,
    /// Battery section of the output
    pub stdout: String,
    /// Exit code of the command (0 for file input)
    pub exit_code: i32,
}

/// Runs the registry query.
#[derive(Debug, Clone)]
pub struct Collector {
    ioreg_path: PathBuf,
    source: RegistrySource,
}

impl Collector {
    pub fn new(ioreg_path: impl Into<PathBuf>, source: RegistrySource) -> Self {
        Self {
            ioreg_path: ioreg_path.into(),
            source,
        }
    }

    pub fn source(&self) -> RegistrySource {
        self.source
    }

    /// Human-readable command line, for logs and errors.
    pub fn command_line(&self) -> String {
        let mut line = self.ioreg_path.display().to_string();
        for arg in self.source.args() {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run `ioreg` and return the battery section of its output.
    pub fn collect(&self) -> Result<ProbeOutput, CollectError> {
        let command = self.command_line();
        debug!(%command, "running registry query");

        let output = Command::new(&self.ioreg_path)
            .args(self.source.args())
            .output()
            .map_err(|source| CollectError::Unsupported {
                command: command.clone(),
                source,
            })?;

        let exit_code = output.status.code().unwrap_or(-1);
        if !output.status.success() {
            warn!(%command, exit_code, "registry query exited with failure status");
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        let stdout = self.source.extract(&raw);
        if stdout.trim().is_empty() {
            return Err(CollectError::EmptyOutput { command });
        }

        info!(%command, bytes = stdout.len(), "collected registry dump");
        Ok(ProbeOutput {
            command,
            stdout,
            exit_code,
        })
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(DEFAULT_IOREG_PATH, RegistrySource::default())
    }
}

/// Read a previously captured dump instead of running `ioreg`.
pub fn load_dump(path: &Path, source: RegistrySource) -> Result<ProbeOutput, CollectError> {
    let origin = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| CollectError::DumpUnreadable {
        path: origin.clone(),
        source,
    })?;

    let stdout = source.extract(&raw);
    if stdout.trim().is_empty() {
        return Err(CollectError::EmptyOutput { command: origin });
    }

    info!(path = %origin, bytes = stdout.len(), "loaded registry dump");
    Ok(ProbeOutput {
        command: origin,
        stdout,
        exit_code: 0,
    })
}

/// Cut the section of a registry tree belonging to the node of `class`.
///
/// The section runs from the node's `+-o` header to the next `+-o` header of
/// any depth, so properties of child nodes are left out. Empty if no such
/// node exists.
pub fn isolate_device_section(tree: &str, class: &str) -> String {
    let marker = format!("<class {},", class);
    let mut section: Vec<&str> = Vec::new();
    let mut inside = false;

    for line in tree.lines() {
        let is_header = line.contains("+-o ");
        if inside {
            if is_header {
                break;
            }
            section.push(line);
        } else if is_header && line.contains(&marker) {
            inside = true;
            section.push(line);
        }
    }

    if section.is_empty() {
        debug!(class, "device node not found in registry tree");
        return String::new();
    }

    let mut text = section.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_registry;
    use std::io::Write;

    const TREE: &str = r#"+-o Root  <class IORegistryEntry, id 0x100000100, retain 40>
  +-o J314sAP  <class IOPlatformExpertDevice, id 0x100000110, registered>
    | {
    |   "model" = <"Mac14,9">
    | }
    |
    +-o AppleSmartBattery  <class AppleSmartBattery, id 0x100000254, registered>
    | {
    |   "Voltage" = 12611
    |   "CycleCount" = 212
    | }
    |
    +-o AppleSmartBatteryManager  <class AppleSmartBatteryManager, id 0x100000260>
      {
        "Voltage" = 1
      }
"#;

    #[test]
    fn test_source_args() {
        assert_eq!(
            RegistrySource::SmartBattery.args(),
            &["-r", "-c", "AppleSmartBattery"]
        );
        assert_eq!(RegistrySource::RegistryTree.args(), &["-l", "-w", "0"]);
    }

    #[test]
    fn test_command_line() {
        let collector = Collector::default();
        assert_eq!(
            collector.command_line(),
            "/usr/sbin/ioreg -r -c AppleSmartBattery"
        );
    }

    #[test]
    fn test_isolate_device_section() {
        let section = isolate_device_section(TREE, BATTERY_CLASS);
        assert!(section.starts_with("    +-o AppleSmartBattery "));
        assert!(section.contains("\"Voltage\" = 12611"));
        assert!(section.contains("\"CycleCount\" = 212"));
        assert!(!section.contains("AppleSmartBatteryManager"));
        assert!(!section.contains("\"Voltage\" = 1\n"));
        assert!(!section.contains("model"));
    }

    #[test]
    fn test_isolate_excludes_child_nodes() {
        let tree = r#"+-o Root  <class IORegistryEntry, id 0x100000100, retain 40>
  +-o AppleSmartBattery  <class AppleSmartBattery, id 0x100000254, registered>
  | {
  |   "Voltage" = 12611
  | }
  |
  +-o AppleSmartBatteryChild  <class IOService, id 0x100000258>
      {
        "Voltage" = 1
        "ChildOnly" = 3
      }
"#;
        let section = isolate_device_section(tree, BATTERY_CLASS);
        let record = parse_registry(&section, LineShape::Tree);
        assert_eq!(record.get("Voltage"), Some("12611"));
        assert!(!record.contains("ChildOnly"));
    }

    #[test]
    fn test_isolate_missing_node() {
        assert_eq!(isolate_device_section("+-o Root  <class IORegistryEntry, id 1>\n", BATTERY_CLASS), "");
        assert_eq!(isolate_device_section("", BATTERY_CLASS), "");
    }

    #[test]
    fn test_missing_command_is_unsupported() {
        let collector = Collector::new("/nonexistent/battstat-ioreg", RegistrySource::SmartBattery);
        let err = collector.collect().unwrap_err();
        assert!(matches!(err, CollectError::Unsupported { .. }));
        assert_eq!(err.to_string(), "Unsupported system or could not execute ioreg.");
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-ioreg");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_command_without_output_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "exit 0");
        let err = Collector::new(&script, RegistrySource::SmartBattery)
            .collect()
            .unwrap_err();
        assert!(matches!(err, CollectError::EmptyOutput { .. }));
        assert_eq!(err.to_string(), "Could not get battery information from ioreg.");
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_command_output_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "echo '  \"CycleCount\" = 212'\nexit 1");
        let dump = Collector::new(&script, RegistrySource::SmartBattery)
            .collect()
            .unwrap();
        assert_eq!(dump.exit_code, 1);
        assert!(dump.stdout.contains("\"CycleCount\" = 212"));
        assert!(dump.command.ends_with("fake-ioreg -r -c AppleSmartBattery"));
    }

    #[test]
    fn test_load_dump() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "    \"CycleCount\" = 212").unwrap();
        let probe = load_dump(file.path(), RegistrySource::SmartBattery).unwrap();
        assert_eq!(probe.exit_code, 0);
        assert!(probe.stdout.contains("CycleCount"));
    }

    #[test]
    fn test_load_tree_dump_is_narrowed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TREE.as_bytes()).unwrap();
        let probe = load_dump(file.path(), RegistrySource::RegistryTree).unwrap();
        assert!(!probe.stdout.contains("IOPlatformExpertDevice"));
    }

    #[test]
    fn test_load_empty_dump() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_dump(file.path(), RegistrySource::SmartBattery).unwrap_err();
        assert!(matches!(err, CollectError::EmptyOutput { .. }));
        assert_eq!(err.to_string(), "Could not get battery information from ioreg.");
    }

    #[test]
    fn test_load_missing_dump() {
        let err = load_dump(Path::new("/nonexistent/dump.txt"), RegistrySource::SmartBattery)
            .unwrap_err();
        assert!(matches!(err, CollectError::DumpUnreadable { .. }));
    }
}
