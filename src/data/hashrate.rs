use std::fmt;
use std::ops::Div;

use measurements::Power;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum HashRateUnit {
    #[strum(serialize = "H/s")]
    Hash,
    #[strum(serialize = "KH/s")]
    KiloHash,
    #[strum(serialize = "MH/s")]
    MegaHash,
    #[strum(serialize = "GH/s")]
    GigaHash,
    #[strum(serialize = "TH/s")]
    TeraHash,
    #[strum(serialize = "PH/s")]
    PetaHash,
    #[strum(serialize = "EH/s")]
    ExaHash,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashRate {
    /// The amount of hashes being computed
    pub value: f64,
    /// The unit of the hashes in value
    pub unit: HashRateUnit,
}

impl HashRate {
    /// A hashrate in TH/s, the unit miners of this class report in.
    pub fn terahash(value: f64) -> Self {
        Self {
            value,
            unit: HashRateUnit::TeraHash,
        }
    }
}

impl fmt::Display for HashRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}

impl Div<HashRate> for Power {
    type Output = f64;

    fn div(self, hash_rate: HashRate) -> Self::Output {
        self.as_watts() / hash_rate.value
    }
}
