/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that external adapters (e.g., CLI)
/// use to interact with the application core.
pub mod threat_scan_port;

pub use threat_scan_port::ThreatScanPort;
