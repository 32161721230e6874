//! Receipt profiles: the verification algorithm a receipt selects through
//! the verifiable-data-structure label of its protected header.

use std::fmt;

use serde::Serialize;

use scitt_core::label::{PROFILE_MMR, PROFILE_TREE, VDS};
use scitt_core::{HeaderMap, ScittError};

/// Verification algorithm selected by a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// CCF binary Merkle tree, verified by an external collaborator.
    Tree,
    /// Merkle Mountain Range, verified locally.
    Mmr,
}

impl Profile {
    /// Read the profile id from a decoded receipt protected header.
    pub fn from_protected(protected: &HeaderMap) -> Result<Self, ScittError> {
        Self::try_from(protected.require_int(VDS)?)
    }

    /// Registered integer id.
    pub fn id(self) -> i64 {
        match self {
            Profile::Tree => PROFILE_TREE,
            Profile::Mmr => PROFILE_MMR,
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Profile::Tree => "CCF",
            Profile::Mmr => "MMR",
        }
    }
}

impl TryFrom<i64> for Profile {
    type Error = ScittError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        match id {
            PROFILE_TREE => Ok(Profile::Tree),
            PROFILE_MMR => Ok(Profile::Mmr),
            other => Err(ScittError::UnknownProfile(other)),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scitt_core::envelope::PROTECTED;
    use scitt_core::Value;

    #[test]
    fn known_ids_map_to_profiles() {
        assert_eq!(Profile::try_from(2).unwrap(), Profile::Tree);
        assert_eq!(Profile::try_from(3).unwrap(), Profile::Mmr);
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert!(matches!(
            Profile::try_from(99),
            Err(ScittError::UnknownProfile(99))
        ));
        assert!(matches!(
            Profile::try_from(0),
            Err(ScittError::UnknownProfile(0))
        ));
    }

    #[test]
    fn display_matches_tool_output() {
        assert_eq!(Profile::Tree.to_string(), "CCF (2)");
        assert_eq!(Profile::Mmr.to_string(), "MMR (3)");
    }

    #[test]
    fn missing_label_is_reported() {
        let hdr = HeaderMap::new(PROTECTED);
        assert!(matches!(
            Profile::from_protected(&hdr),
            Err(ScittError::MissingLabel { label: 395, .. })
        ));
    }

    #[test]
    fn text_profile_is_a_type_mismatch() {
        let mut hdr = HeaderMap::new(PROTECTED);
        hdr.insert(VDS, Value::Text("mmr".into()));
        assert!(matches!(
            Profile::from_protected(&hdr),
            Err(ScittError::TypeMismatch { label: 395, .. })
        ));
    }
}
