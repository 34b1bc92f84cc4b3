//! Achievement payloads: the datum an oracle prices into a reward.
//!
//! The achievement an oracle observes is a closed struct with a single
//! canonical byte encoding, so the oracle-signing pipeline has exactly one
//! representation to hash and price. Rarity tiers carry fixed reward
//! multipliers.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Rarity tier of an achievement, with a fixed reward multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Legendary = 3,
}

impl Rarity {
    /// Reward multiplier in percent of the base reward.
    pub fn multiplier_percent(self) -> u64 {
        match self {
            Rarity::Common => 100,
            Rarity::Uncommon => 120,
            Rarity::Rare => 150,
            Rarity::Legendary => 300,
        }
    }

    /// Convert to u8 for serialization.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Try to parse from u8.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Common),
            1 => Some(Self::Uncommon),
            2 => Some(Self::Rare),
            3 => Some(Self::Legendary),
            _ => None,
        }
    }
}

/// An achievement as certified by the off-chain attester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable identifier of the achievement in the source catalogue.
    pub id: String,

    /// Rarity tier, determining the reward multiplier.
    pub rarity: Rarity,

    /// Base value of the achievement in reward units.
    pub amount: u64,
}

/// CBOR map keys for the canonical encoding. Keys 0-23 encode as single
/// bytes.
mod keys {
    pub const ID: u64 = 0;
    pub const RARITY: u64 = 1;
    pub const AMOUNT: u64 = 2;
}

impl Achievement {
    /// Compute the reward this achievement is worth.
    ///
    /// `amount * multiplier / 100`, checked at every step.
    pub fn reward_amount(&self) -> Result<u64, CoreError> {
        self.amount
            .checked_mul(self.rarity.multiplier_percent())
            .map(|scaled| scaled / 100)
            .ok_or(CoreError::Overflow)
    }

    /// Encode to canonical CBOR bytes.
    ///
    /// An integer-keyed map built in ascending key order. ciborium writes
    /// definite lengths and minimal integer encodings, so building the map
    /// in key order yields a deterministic byte string.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let map = Value::Map(vec![
            (Value::Integer(keys::ID.into()), Value::Text(self.id.clone())),
            (
                Value::Integer(keys::RARITY.into()),
                Value::Integer(u64::from(self.rarity.to_u8()).into()),
            ),
            (
                Value::Integer(keys::AMOUNT.into()),
                Value::Integer(self.amount.into()),
            ),
        ]);

        let mut buf = Vec::new();
        ciborium::into_writer(&map, &mut buf).map_err(|e| CoreError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    /// Decode from canonical CBOR bytes.
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let value: Value =
            ciborium::from_reader(bytes).map_err(|e| CoreError::Decoding(e.to_string()))?;

        let map = match value {
            Value::Map(m) => m,
            _ => return Err(CoreError::Decoding("expected map".into())),
        };

        let get = |key: u64| -> Option<&Value> {
            map.iter()
                .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key as i128))
                .map(|(_, v)| v)
        };

        let id = match get(keys::ID) {
            Some(Value::Text(s)) => s.clone(),
            _ => return Err(CoreError::Decoding("missing id".into())),
        };

        let rarity = match get(keys::RARITY) {
            Some(Value::Integer(i)) => {
                let n = i128::from(*i);
                u8::try_from(n)
                    .ok()
                    .and_then(Rarity::from_u8)
                    .ok_or_else(|| CoreError::Decoding(format!("invalid rarity: {}", n)))?
            }
            _ => return Err(CoreError::Decoding("missing rarity".into())),
        };

        let amount = match get(keys::AMOUNT) {
            Some(Value::Integer(i)) => {
                let n = i128::from(*i);
                u64::try_from(n).map_err(|_| CoreError::Decoding("invalid amount".into()))?
            }
            _ => return Err(CoreError::Decoding("missing amount".into())),
        };

        Ok(Self { id, rarity, amount })
    }
}
