use std::fmt;

use bitflags::bitflags;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

bitflags! {
    /// Events that run validation automatically. Combine with `|`;
    /// in text formats the set reads as `"BLUR | SUBMIT"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct Triggers: u8 {
        const BLUR   = 1 << 0;
        const CHANGE = 1 << 1;
        const SUBMIT = 1 << 2;
        const ALWAYS = Self::BLUR.bits() | Self::CHANGE.bits() | Self::SUBMIT.bits();
    }
}

impl Triggers {
    pub const NEVER: Self = Self::empty();

    pub fn on_blur(self) -> bool {
        self.contains(Self::BLUR)
    }

    pub fn on_change(self) -> bool {
        self.contains(Self::CHANGE)
    }

    pub fn on_submit(self) -> bool {
        self.contains(Self::SUBMIT)
    }
}

impl Default for Triggers {
    fn default() -> Self {
        Self::BLUR | Self::SUBMIT
    }
}

/// Accepts the flag text (`"BLUR | SUBMIT"`, `"ALWAYS"`, `"NEVER"`) or the
/// numeric mask (`0..=7`).
impl<'de> Deserialize<'de> for Triggers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TriggersVisitor)
    }
}

#[derive(Clone, Copy)]
struct TriggersVisitor;

impl<'de> Visitor<'de> for TriggersVisitor {
    type Value = Triggers;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("`|` separated trigger names or a mask between 0 and 7")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Triggers, E> {
        u8::try_from(value)
            .ok()
            .and_then(Triggers::from_bits)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Triggers, E> {
        u64::try_from(value)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
            .and_then(|value| self.visit_u64(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Triggers, E> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("NEVER") {
            return Ok(Triggers::NEVER);
        }
        bitflags::parser::from_str::<Triggers>(value).map_err(E::custom)
    }
}
