use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A validated IPv4 deploy address. Constructed only through parsing, so a
/// value of this type is always four octets in range. Its `Display` form is
/// the canonical dotted quad with leading zeros stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployIp([u8; 4]);

impl DeployIp {
    #[allow(dead_code)]
    pub fn octets(&self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for DeployIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl FromStr for DeployIp {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 4 {
            return Err(ConfigError::MalformedIp(s.to_string()));
        }

        let mut octets = [0u8; 4];
        for (slot, part) in octets.iter_mut().zip(parts.iter().copied()) {
            *slot = parse_octet(s, part)?;
        }
        Ok(DeployIp(octets))
    }
}

fn parse_octet(input: &str, part: &str) -> Result<u8, ConfigError> {
    let out_of_range = || ConfigError::OctetOutOfRange {
        input: input.to_string(),
        octet: part.to_string(),
    };

    match part.parse::<i64>() {
        Ok(v) => u8::try_from(v).map_err(|_| out_of_range()),
        // "99999999999999999999" overflows i64 but is still an integer,
        // so it reports as out-of-range rather than malformed.
        Err(_) if is_base10_integer(part) => Err(out_of_range()),
        Err(_) => Err(ConfigError::MalformedIp(input.to_string())),
    }
}

fn is_base10_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
