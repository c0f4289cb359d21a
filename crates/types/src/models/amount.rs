//! Token amounts with arbitrary precision
//!
//! Amounts travel through the quoter as raw on-chain integers paired with the
//! token's decimals. They are rendered in human units only at the edges and
//! are always compared numerically, never as text.

use alloy::primitives::U256;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Largest decimals count whose scale factor still fits in 256 bits
pub const MAX_DECIMALS: u8 = 77;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
	#[error("Invalid amount '{value}': {reason}")]
	Invalid { value: String, reason: String },

	#[error("Amount '{value}' has more than {decimals} fractional digits")]
	TooPrecise { value: String, decimals: u8 },

	#[error("Amount '{value}' does not fit in 256 bits")]
	Overflow { value: String },

	#[error("Unsupported decimals {0} (maximum is 77)")]
	UnsupportedDecimals(u8),
}

/// A token amount: raw smallest-unit integer plus the token's decimals
#[derive(Debug, Clone, Copy)]
pub struct TokenAmount {
	raw: U256,
	decimals: u8,
}

impl TokenAmount {
	pub fn new(raw: U256, decimals: u8) -> Result<Self, AmountError> {
		if decimals > MAX_DECIMALS {
			return Err(AmountError::UnsupportedDecimals(decimals));
		}
		Ok(Self { raw, decimals })
	}

	/// Build from a raw integer string as returned by aggregator APIs
	pub fn from_raw_str(raw: &str, decimals: u8) -> Result<Self, AmountError> {
		let trimmed = raw.trim();
		if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
			return Err(AmountError::Invalid {
				value: raw.to_string(),
				reason: "expected an unsigned integer".to_string(),
			});
		}
		let value = U256::from_str_radix(trimmed, 10).map_err(|_| AmountError::Overflow {
			value: raw.to_string(),
		})?;
		Self::new(value, decimals)
	}

	/// Parse a human-readable decimal string (`"1805.12"`) into smallest units
	pub fn parse_units(value: &str, decimals: u8) -> Result<Self, AmountError> {
		if decimals > MAX_DECIMALS {
			return Err(AmountError::UnsupportedDecimals(decimals));
		}

		let trimmed = value.trim();
		let (int_part, frac_part) = match trimmed.split_once('.') {
			Some((int_part, frac_part)) => (int_part, frac_part),
			None => (trimmed, ""),
		};

		let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
		if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
			return Err(AmountError::Invalid {
				value: value.to_string(),
				reason: "expected a non-negative decimal number".to_string(),
			});
		}
		if trimmed.contains('.') && frac_part.is_empty() {
			return Err(AmountError::Invalid {
				value: value.to_string(),
				reason: "missing fractional digits after '.'".to_string(),
			});
		}
		if frac_part.len() > decimals as usize {
			return Err(AmountError::TooPrecise {
				value: value.to_string(),
				decimals,
			});
		}

		let digits = format!(
			"{}{:0<width$}",
			int_part,
			frac_part,
			width = decimals as usize
		);
		let raw = U256::from_str_radix(&digits, 10).map_err(|_| AmountError::Overflow {
			value: value.to_string(),
		})?;

		Ok(Self { raw, decimals })
	}

	pub fn raw(&self) -> U256 {
		self.raw
	}

	pub fn decimals(&self) -> u8 {
		self.decimals
	}

	pub fn is_zero(&self) -> bool {
		self.raw.is_zero()
	}

	/// Numeric comparison that tolerates differing decimals
	pub fn cmp_value(&self, other: &Self) -> Ordering {
		match self.decimals.cmp(&other.decimals) {
			Ordering::Equal => self.raw.cmp(&other.raw),
			Ordering::Less => {
				// Scale self up; overflow means self is larger than anything other can hold
				match self
					.raw
					.checked_mul(ten_pow(other.decimals - self.decimals))
				{
					Some(scaled) => scaled.cmp(&other.raw),
					None => Ordering::Greater,
				}
			},
			Ordering::Greater => other.cmp_value(self).reverse(),
		}
	}
}

fn ten_pow(exp: u8) -> U256 {
	U256::from(10u8).pow(U256::from(exp))
}

impl PartialEq for TokenAmount {
	fn eq(&self, other: &Self) -> bool {
		self.cmp_value(other) == Ordering::Equal
	}
}

impl Eq for TokenAmount {}

impl PartialOrd for TokenAmount {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for TokenAmount {
	fn cmp(&self, other: &Self) -> Ordering {
		self.cmp_value(other)
	}
}

impl fmt::Display for TokenAmount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.decimals == 0 {
			return write!(f, "{}", self.raw);
		}

		let scale = ten_pow(self.decimals);
		let whole = self.raw / scale;
		let fraction = self.raw % scale;
		if fraction.is_zero() {
			return write!(f, "{}", whole);
		}

		let padded = format!(
			"{:0>width$}",
			fraction.to_string(),
			width = self.decimals as usize
		);
		write!(f, "{}.{}", whole, padded.trim_end_matches('0'))
	}
}

impl Serialize for TokenAmount {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_string())
	}
}
