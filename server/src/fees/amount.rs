//! Fixed-point satoshi amounts

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

pub const SATS_PER_BTC: i64 = 100_000_000;

/// BTC/kvB to sat/vB: 1e8 sat per BTC over 1000 vB per kvB.
pub const SATS_PER_VB_PER_BTC_PER_KVB: f64 = 100_000.0;

/// Hard cap on the money supply, in satoshis.
pub const MAX_MONEY: i64 = 21_000_000 * SATS_PER_BTC;

/// A signed amount in satoshis.
///
/// Node JSON carries BTC as floats; each value is converted exactly once on
/// the way in, and all sums happen on integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sats(i64);

impl Sats {
    pub const ZERO: Sats = Sats(0);

    pub const fn from_sat(sat: i64) -> Self {
        Sats(sat)
    }

    /// Convert a BTC amount as reported by the node, rounding half away from
    /// zero to the nearest satoshi.
    ///
    /// Returns `None` for NaN, infinities, negatives and anything above
    /// [`MAX_MONEY`].
    pub fn from_btc(btc: f64) -> Option<Self> {
        if !btc.is_finite() || btc < 0.0 {
            return None;
        }
        let sat = (btc * SATS_PER_BTC as f64).round();
        if sat > MAX_MONEY as f64 {
            return None;
        }
        Some(Sats(sat as i64))
    }

    pub const fn to_sat(self) -> i64 {
        self.0
    }

    pub fn to_btc(self) -> f64 {
        self.0 as f64 / SATS_PER_BTC as f64
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Sats) -> Option<Sats> {
        self.0.checked_add(other.0).map(Sats)
    }
}

impl Add for Sats {
    type Output = Sats;

    fn add(self, rhs: Sats) -> Sats {
        Sats(self.0 + rhs.0)
    }
}

impl Sub for Sats {
    type Output = Sats;

    fn sub(self, rhs: Sats) -> Sats {
        Sats(self.0 - rhs.0)
    }
}

impl Sum for Sats {
    fn sum<I: Iterator<Item = Sats>>(iter: I) -> Sats {
        iter.fold(Sats::ZERO, Add::add)
    }
}

impl fmt::Display for Sats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sat", self.0)
    }
}

/// Convert a node fee rate in BTC/kvB to whole sat/vB.
///
/// Rounds half away from zero (`f64::round`).
pub fn btc_per_kvb_to_sats_per_vb(feerate: f64) -> i64 {
    (feerate * SATS_PER_VB_PER_BTC_PER_KVB).round() as i64
}
