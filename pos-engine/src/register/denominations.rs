//! Mexican peso denominations counted at a cut

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of denominations in the drawer
pub const DENOMINATION_COUNT: usize = 11;

/// Bill or coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenominationKind {
    Bill,
    Coin,
}

/// One denomination: face value in cents and kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denomination {
    cents: i64,
    pub kind: DenominationKind,
}

impl Denomination {
    const fn bill(pesos: i64) -> Self {
        Self {
            cents: pesos * 100,
            kind: DenominationKind::Bill,
        }
    }

    const fn coin(cents: i64) -> Self {
        Self {
            cents,
            kind: DenominationKind::Coin,
        }
    }

    pub fn value(&self) -> Decimal {
        Decimal::new(self.cents, 2)
    }

    /// Label for the count sheet ("$1000", "$0.50")
    pub fn label(&self) -> String {
        if self.cents % 100 == 0 {
            format!("${}", self.cents / 100)
        } else {
            format!("${:.2}", self.value())
        }
    }
}

/// The drawer's denominations, largest first
pub const DENOMINATIONS: [Denomination; DENOMINATION_COUNT] = [
    Denomination::bill(1000),
    Denomination::bill(500),
    Denomination::bill(200),
    Denomination::bill(100),
    Denomination::bill(50),
    Denomination::bill(20),
    Denomination::coin(1000),
    Denomination::coin(500),
    Denomination::coin(200),
    Denomination::coin(100),
    Denomination::coin(50),
];

/// Pieces counted per denomination, in [`DENOMINATIONS`] order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashCount {
    pub counts: [u32; DENOMINATION_COUNT],
}

impl CashCount {
    pub fn new(counts: [u32; DENOMINATION_COUNT]) -> Self {
        Self { counts }
    }

    /// Set the count for the denomination worth `value`
    ///
    /// Returns `false` when no denomination has that face value.
    pub fn set(&mut self, value: Decimal, count: u32) -> bool {
        match DENOMINATIONS.iter().position(|d| d.value() == value) {
            Some(idx) => {
                self.counts[idx] = count;
                true
            }
            None => false,
        }
    }

    /// Σ count × face value
    pub fn total(&self) -> Decimal {
        DENOMINATIONS
            .iter()
            .zip(self.counts)
            .map(|(d, count)| d.value() * Decimal::from(count))
            .sum()
    }

    /// Subtotal per denomination, for the printed count sheet
    pub fn lines(&self) -> impl Iterator<Item = (Denomination, u32, Decimal)> + '_ {
        DENOMINATIONS
            .iter()
            .zip(self.counts)
            .map(|(d, count)| (*d, count, d.value() * Decimal::from(count)))
    }

    pub fn pieces(&self) -> u32 {
        self.counts.iter().sum()
    }
}
