use core::fmt;

use serde::{Deserialize, Serialize};

/// Largest number of bills a bucket keeps before consolidating upward,
/// and the number of bills carried by a single transfer action.
pub const MAX_BILLS: u64 = 9;

/// Ratio between neighbouring denominations.
pub const FIT: u64 = 10;

/// Power-of-ten bill sizes, smallest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Denomination {
    /// 1 unit.
    One,
    /// 10 units.
    Ten,
    /// 100 units.
    Hundred,
    /// 1,000 units.
    Thousand,
    /// 10,000 units.
    TenThousand,
    /// 100,000 units.
    HundredThousand,
    /// 1,000,000 units.
    Million,
}

impl Denomination {
    /// All denominations, smallest first.
    pub const ALL: [Denomination; 7] = [
        Denomination::One,
        Denomination::Ten,
        Denomination::Hundred,
        Denomination::Thousand,
        Denomination::TenThousand,
        Denomination::HundredThousand,
        Denomination::Million,
    ];

    /// Value of one bill.
    pub fn value(self) -> u64 {
        FIT.pow(self.index() as u32)
    }

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Smallest denomination whose bill covers `amount`; the largest one for
    /// amounts beyond a million.
    pub fn covering(amount: u64) -> Denomination {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.value() >= amount)
            .unwrap_or(Denomination::Million)
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Splits `amount` into chunks of at most nine bills of `bill`.
/// The remainder below one bill is dropped.
pub fn split_bills(amount: u64, bill: u64) -> Vec<u64> {
    let chunk = MAX_BILLS * bill;
    let mut remaining = (amount / bill) * bill;
    let mut out = Vec::new();
    while remaining > 0 {
        let next = remaining.min(chunk);
        out.push(next);
        remaining -= next;
    }
    out
}

/// Splits `amount` into chunks of at most nine bills each, using the largest
/// denominations first.
pub fn split_largest(amount: u64) -> Vec<u64> {
    let mut remaining = amount;
    let mut out = Vec::new();
    for d in Denomination::ALL.iter().rev() {
        let bill = d.value();
        out.extend(split_bills(remaining, bill));
        remaining %= bill;
    }
    out
}
