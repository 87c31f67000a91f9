use crate::domain::error::{TermConError, TermConResult};
use crate::domain::literal::parse_c_integer;
use std::fmt;
use std::str::FromStr;

const MODIFIERS: [&str; 3] = ["control", "cntrl", "ctrl"];
const MODIFIER_HINT: &str = "modifier can be \"control\", \"cntrl\" or \"ctrl\"";

/// Byte that ends the session when typed on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeKey(u8);

impl EscapeKey {
    pub const fn new(byte: u8) -> Self {
        Self(byte)
    }

    pub fn byte(&self) -> u8 {
        self.0
    }

    /// Parses a quit key: a numeric literal (`0x01`, `001`, `1`) or a control
    /// chord written as `control-a`, `cntrl/a`, `CTRL-A`, ...
    pub fn parse(spec: &str) -> TermConResult<Self> {
        let invalid = |reason: &str| TermConError::InvalidEscapeKey {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        if let Some(value) = parse_c_integer(spec) {
            return u8::try_from(value)
                .map(Self)
                .map_err(|_| invalid("numeric value does not fit in one byte"));
        }

        let (modifier, letter) = spec
            .split_once('/')
            .or_else(|| spec.split_once('-'))
            .ok_or_else(|| invalid("no delimiter ('-' or '/') found"))?;

        if !MODIFIERS
            .iter()
            .any(|m| m.eq_ignore_ascii_case(modifier))
        {
            return Err(invalid(&format!("no modifier found, {}", MODIFIER_HINT)));
        }

        let code = match letter.as_bytes() {
            [code] => *code,
            _ => {
                return Err(invalid(&format!(
                    "expected one character after the modifier, {}",
                    MODIFIER_HINT
                )))
            }
        };

        match code {
            0x40..=0x60 => Ok(Self(code - 0x40)),
            0x61..=0xff => Ok(Self(code - 0x60)),
            _ => Err(invalid(&format!(
                "invalid character after the modifier, {}",
                MODIFIER_HINT
            ))),
        }
    }

    /// True iff `chunk` is exactly this key. Longer reads never match, even
    /// when they contain the key byte.
    pub fn matches(&self, chunk: &[u8]) -> bool {
        is_escape(chunk, *self)
    }
}

/// Escape detection over one chunk read from the local side.
pub fn is_escape(chunk: &[u8], key: EscapeKey) -> bool {
    matches!(chunk, [byte] if *byte == key.0)
}

impl Default for EscapeKey {
    fn default() -> Self {
        // Ctrl-A
        Self(0x01)
    }
}

impl FromStr for EscapeKey {
    type Err = TermConError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EscapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            byte @ 0x01..=0x1a => write!(f, "ctrl-{}", (byte + 0x60) as char),
            byte => write!(f, "0x{:02x}", byte),
        }
    }
}
