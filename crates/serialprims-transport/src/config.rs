/// Default transmission rate when none is given.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Port identity and transmission rate.
///
/// Line framing is fixed at 8 data bits, no parity, one stop bit and no
/// flow control; only the rate varies per port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port identifier, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
}

impl SerialConfig {
    /// Create a configuration for a named port.
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
        }
    }

    /// Create a configuration for a numbered Windows-style port (`COM<n>`).
    pub fn com(number: u16, baud_rate: u32) -> Self {
        Self::new(format!("COM{number}"), baud_rate)
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn com_port_naming() {
        let cfg = SerialConfig::com(4, 115_200);
        assert_eq!(cfg.port, "COM4");
        assert_eq!(cfg.baud_rate, 115_200);
    }

    #[test]
    fn default_rate() {
        assert_eq!(SerialConfig::default().baud_rate, DEFAULT_BAUD_RATE);
    }
}
