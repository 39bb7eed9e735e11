//! Fee and gas price handling.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::msgs::Coin;

/// Transaction fee: coin amounts plus the gas limit they pay for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas_limit: u64,
}

impl Fee {
    pub fn new(amount: Vec<Coin>, gas_limit: u64) -> Self {
        Self { amount, gas_limit }
    }

    /// Compute the fee for a gas limit at a given per-unit gas price,
    /// rounding the amount up so the fee never undershoots the price.
    pub fn from_gas_price(gas_price: &GasPrice, gas_limit: u64) -> Self {
        let amount = (gas_price.amount * gas_limit as f64).ceil() as u128;
        Self {
            amount: vec![Coin::new(gas_price.denom.clone(), amount)],
            gas_limit,
        }
    }
}

/// A per-unit gas price such as `0.025ustake`.
#[derive(Debug, Clone, PartialEq)]
pub struct GasPrice {
    pub amount: f64,
    pub denom: String,
}

impl FromStr for GasPrice {
    type Err = anyhow::Error;

    /// Parse a price string of the form `<decimal><denom>`.
    fn from_str(price_str: &str) -> Result<Self> {
        // Find where the number ends and the denom begins
        let split_pos = price_str
            .chars()
            .position(|c| c.is_alphabetic())
            .ok_or_else(|| anyhow!("invalid gas price format: {}", price_str))?;

        let (amount_str, denom) = price_str.split_at(split_pos);
        let amount: f64 = amount_str
            .parse()
            .map_err(|e| anyhow!("invalid gas price amount {:?}: {}", amount_str, e))?;
        if denom.is_empty() {
            return Err(anyhow!("gas price has no denom: {}", price_str));
        }

        Ok(Self {
            amount,
            denom: denom.to_string(),
        })
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_price_parsing() {
        let price: GasPrice = "0.025ustake".parse().unwrap();
        assert_eq!(price.amount, 0.025);
        assert_eq!(price.denom, "ustake");

        let integral: GasPrice = "500000000inj".parse().unwrap();
        assert_eq!(integral.amount, 500000000.0);
        assert_eq!(integral.denom, "inj");
    }

    #[test]
    fn gas_price_rejects_garbage() {
        assert!("".parse::<GasPrice>().is_err());
        assert!("123".parse::<GasPrice>().is_err());
        assert!("abcustake".parse::<GasPrice>().is_err());
    }

    #[test]
    fn fee_from_gas_price() {
        let price: GasPrice = "0.025ustake".parse().unwrap();
        let fee = Fee::from_gas_price(&price, 200_000);
        assert_eq!(fee.gas_limit, 200_000);
        assert_eq!(fee.amount.len(), 1);
        assert_eq!(fee.amount[0].denom, "ustake");
        assert_eq!(fee.amount[0].amount, "5000");
    }

    #[test]
    fn fee_rounds_up() {
        let price: GasPrice = "0.03ustake".parse().unwrap();
        let fee = Fee::from_gas_price(&price, 100_001);
        // 100_001 * 0.03 = 3000.03, rounded up
        assert_eq!(fee.amount[0].amount, "3001");
    }
}
