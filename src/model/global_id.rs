//! IFC GlobalId: a UUID compressed to 22 characters of IFC base64.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Compressed GUID carried by every rooted entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(String);

impl GlobalId {
    /// Fresh random id.
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// 128 bits = 2 leading bits + 21 groups of 6.
    pub fn from_uuid(uuid: Uuid) -> Self {
        let n = uuid.as_u128();
        let encoded: String = (0..22)
            .map(|i| {
                let shift = 6 * (21 - i);
                ALPHABET[((n >> shift) & 0x3f) as usize] as char
            })
            .collect();
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GlobalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GlobalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_alphabet() {
        let id = GlobalId::new();
        assert_eq!(id.as_str().len(), 22);
        assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(GlobalId::from_uuid(Uuid::nil()).as_str(), "0000000000000000000000");
        assert_eq!(GlobalId::from_uuid(Uuid::from_u128(u128::MAX)).as_str(), "3$$$$$$$$$$$$$$$$$$$$$");
    }

    #[test]
    fn test_unique() {
        assert_ne!(GlobalId::new(), GlobalId::new());
    }
}
