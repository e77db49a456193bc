// Neutron reaction types keyed by ENDF MT number

use crate::error::{ScatterError, ScatterResult};
use std::convert::TryFrom;
use std::fmt;

/// Neutron-induced reaction channels that appear in ACE MTR blocks.
///
/// Discrete level reactions carry their offset within the MT family:
/// `NExcitedLevel(1)` is MT 51 and `NProtonLevel(0)` is MT 600. The last
/// member of each family is the continuum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NuclearReactionType {
    Total,
    Elastic,
    Nonelastic,
    Inelastic,
    Anything,
    TwoNDeuteronAlpha,
    TwoN,
    ThreeN,
    TotalFission,
    Fission,
    NFission,
    TwoNFission,
    NAlpha,
    NThreeAlpha,
    TwoNAlpha,
    ThreeNAlpha,
    TotalAbsorption,
    NProton,
    NTwoAlpha,
    TwoNTwoAlpha,
    NDeuteron,
    NTriton,
    NHelium3,
    NDeuteronThreeAlpha,
    NTritonTwoAlpha,
    FourN,
    ThreeNFission,
    TwoNProton,
    ThreeNProton,
    NTwoProton,
    NProtonAlpha,
    /// MT 51-91, level 1-41 (41 is the continuum)
    NExcitedLevel(u8),
    Disappearance,
    Gamma,
    Proton,
    Deuteron,
    Triton,
    Helium3,
    Alpha,
    TwoAlpha,
    ThreeAlpha,
    TwoProton,
    ProtonAlpha,
    TritonTwoAlpha,
    DeuteronTwoAlpha,
    ProtonDeuteron,
    ProtonTriton,
    DeuteronAlpha,
    /// MT 600-649
    NProtonLevel(u8),
    /// MT 650-699
    NDeuteronLevel(u8),
    /// MT 700-749
    NTritonLevel(u8),
    /// MT 750-799
    NHelium3Level(u8),
    /// MT 800-849
    NAlphaLevel(u8),
    /// MT 875-891
    TwoNLevel(u8),
}

impl NuclearReactionType {
    pub fn from_mt(mt: u32) -> ScatterResult<Self> {
        use NuclearReactionType::*;
        let reaction = match mt {
            1 => Total,
            2 => Elastic,
            3 => Nonelastic,
            4 => Inelastic,
            5 => Anything,
            11 => TwoNDeuteronAlpha,
            16 => TwoN,
            17 => ThreeN,
            18 => TotalFission,
            19 => Fission,
            20 => NFission,
            21 => TwoNFission,
            22 => NAlpha,
            23 => NThreeAlpha,
            24 => TwoNAlpha,
            25 => ThreeNAlpha,
            27 => TotalAbsorption,
            28 => NProton,
            29 => NTwoAlpha,
            30 => TwoNTwoAlpha,
            32 => NDeuteron,
            33 => NTriton,
            34 => NHelium3,
            35 => NDeuteronThreeAlpha,
            36 => NTritonTwoAlpha,
            37 => FourN,
            38 => ThreeNFission,
            41 => TwoNProton,
            42 => ThreeNProton,
            44 => NTwoProton,
            45 => NProtonAlpha,
            51..=91 => NExcitedLevel((mt - 50) as u8),
            101 => Disappearance,
            102 => Gamma,
            103 => Proton,
            104 => Deuteron,
            105 => Triton,
            106 => Helium3,
            107 => Alpha,
            108 => TwoAlpha,
            109 => ThreeAlpha,
            111 => TwoProton,
            112 => ProtonAlpha,
            113 => TritonTwoAlpha,
            114 => DeuteronTwoAlpha,
            115 => ProtonDeuteron,
            116 => ProtonTriton,
            117 => DeuteronAlpha,
            600..=649 => NProtonLevel((mt - 600) as u8),
            650..=699 => NDeuteronLevel((mt - 650) as u8),
            700..=749 => NTritonLevel((mt - 700) as u8),
            750..=799 => NHelium3Level((mt - 750) as u8),
            800..=849 => NAlphaLevel((mt - 800) as u8),
            875..=891 => TwoNLevel((mt - 875) as u8),
            _ => return Err(ScatterError::UnknownMtNumber(mt)),
        };
        Ok(reaction)
    }

    pub fn mt(&self) -> u32 {
        use NuclearReactionType::*;
        match *self {
            Total => 1,
            Elastic => 2,
            Nonelastic => 3,
            Inelastic => 4,
            Anything => 5,
            TwoNDeuteronAlpha => 11,
            TwoN => 16,
            ThreeN => 17,
            TotalFission => 18,
            Fission => 19,
            NFission => 20,
            TwoNFission => 21,
            NAlpha => 22,
            NThreeAlpha => 23,
            TwoNAlpha => 24,
            ThreeNAlpha => 25,
            TotalAbsorption => 27,
            NProton => 28,
            NTwoAlpha => 29,
            TwoNTwoAlpha => 30,
            NDeuteron => 32,
            NTriton => 33,
            NHelium3 => 34,
            NDeuteronThreeAlpha => 35,
            NTritonTwoAlpha => 36,
            FourN => 37,
            ThreeNFission => 38,
            TwoNProton => 41,
            ThreeNProton => 42,
            NTwoProton => 44,
            NProtonAlpha => 45,
            NExcitedLevel(level) => 50 + level as u32,
            Disappearance => 101,
            Gamma => 102,
            Proton => 103,
            Deuteron => 104,
            Triton => 105,
            Helium3 => 106,
            Alpha => 107,
            TwoAlpha => 108,
            ThreeAlpha => 109,
            TwoProton => 111,
            ProtonAlpha => 112,
            TritonTwoAlpha => 113,
            DeuteronTwoAlpha => 114,
            ProtonDeuteron => 115,
            ProtonTriton => 116,
            DeuteronAlpha => 117,
            NProtonLevel(level) => 600 + level as u32,
            NDeuteronLevel(level) => 650 + level as u32,
            NTritonLevel(level) => 700 + level as u32,
            NHelium3Level(level) => 750 + level as u32,
            NAlphaLevel(level) => 800 + level as u32,
            TwoNLevel(level) => 875 + level as u32,
        }
    }

    /// Fission channels, whose neutrons are not handled as scattering
    pub fn is_fission(&self) -> bool {
        matches!(
            self,
            NuclearReactionType::TotalFission
                | NuclearReactionType::Fission
                | NuclearReactionType::NFission
                | NuclearReactionType::TwoNFission
                | NuclearReactionType::ThreeNFission
        )
    }
}

impl TryFrom<u32> for NuclearReactionType {
    type Error = ScatterError;

    fn try_from(mt: u32) -> ScatterResult<Self> {
        NuclearReactionType::from_mt(mt)
    }
}

impl fmt::Display for NuclearReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MT {}", self.mt())
    }
}
