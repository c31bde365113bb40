//! Static kana data shared by the quiz engine: characters, curriculum groups and the inventory.

mod table;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A curriculum bucket. Groups are introduced in [`Group::CURRICULUM`] order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Base set A.
    Hiragana,
    /// Base set B.
    Katakana,
    /// Voiced variants (dakuten and handakuten).
    Dakuten,
    /// Combined-syllable forms.
    Yoon,
}

impl Group {
    pub const CURRICULUM: [Group; 4] = [
        Group::Hiragana,
        Group::Katakana,
        Group::Dakuten,
        Group::Yoon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Group::Hiragana => "hiragana",
            Group::Katakana => "katakana",
            Group::Dakuten => "dakuten",
            Group::Yoon => "yoon",
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque handle to the audio asset for a character. Playback is up to the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioRef(pub String);

impl AudioRef {
    pub fn for_pronunciation(pronunciation: &str) -> Self {
        AudioRef(format!("kana/{pronunciation}.mp3"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanaCharacter {
    pub symbol: String,
    pub pronunciation: String,
    pub audio_ref: AudioRef,
    pub group: Group,
}

impl KanaCharacter {
    pub fn new(symbol: &str, pronunciation: &str, group: Group) -> Self {
        Self {
            symbol: symbol.to_string(),
            pronunciation: pronunciation.to_string(),
            audio_ref: AudioRef::for_pronunciation(pronunciation),
            group,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("symbol {0:?} appears more than once")]
    DuplicateSymbol(String),

    #[error("need at least 3 distinct pronunciations to build questions, found {0}")]
    TooFewPronunciations(usize),
}

/// The read-only table of learnable characters, kept in curriculum order.
#[derive(Clone, Debug)]
pub struct Inventory {
    characters: Vec<KanaCharacter>,
    by_symbol: BTreeMap<String, usize>,
}

impl Inventory {
    pub fn new(characters: Vec<KanaCharacter>) -> Result<Self, InventoryError> {
        let mut by_symbol = BTreeMap::new();
        for (index, character) in characters.iter().enumerate() {
            if by_symbol.insert(character.symbol.clone(), index).is_some() {
                return Err(InventoryError::DuplicateSymbol(character.symbol.clone()));
            }
        }

        let pronunciations: BTreeSet<&str> = characters
            .iter()
            .map(|c| c.pronunciation.as_str())
            .collect();
        if pronunciations.len() < 3 {
            return Err(InventoryError::TooFewPronunciations(pronunciations.len()));
        }

        Ok(Self {
            characters,
            by_symbol,
        })
    }

    /// The full built-in kana table.
    pub fn kana() -> Self {
        let groups = [
            (Group::Hiragana, table::HIRAGANA),
            (Group::Katakana, table::KATAKANA),
            (Group::Dakuten, table::DAKUTEN),
            (Group::Yoon, table::YOON),
        ];
        let characters: Vec<KanaCharacter> = groups
            .into_iter()
            .flat_map(|(group, rows)| {
                rows.iter()
                    .map(move |(symbol, pronunciation)| {
                        KanaCharacter::new(symbol, pronunciation, group)
                    })
            })
            .collect();
        let by_symbol = characters
            .iter()
            .enumerate()
            .map(|(index, c)| (c.symbol.clone(), index))
            .collect();
        Self {
            characters,
            by_symbol,
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&KanaCharacter> {
        self.by_symbol.get(symbol).map(|&i| &self.characters[i])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.by_symbol.contains_key(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KanaCharacter> {
        self.characters.iter()
    }

    pub fn in_group(&self, group: Group) -> impl Iterator<Item = &KanaCharacter> {
        self.characters.iter().filter(move |c| c.group == group)
    }

    pub fn as_slice(&self) -> &[KanaCharacter] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_valid() {
        let kana = Inventory::kana();
        assert_eq!(kana.len(), 46 + 46 + 50 + 72);
        assert_eq!(kana.in_group(Group::Hiragana).count(), 46);
        assert_eq!(kana.in_group(Group::Katakana).count(), 46);
        assert_eq!(kana.in_group(Group::Dakuten).count(), 50);
        assert_eq!(kana.in_group(Group::Yoon).count(), 72);

        // going through the validating constructor must agree
        let rebuilt = Inventory::new(kana.as_slice().to_vec()).unwrap();
        assert_eq!(rebuilt.len(), kana.len());
    }

    #[test]
    fn test_curriculum_order() {
        let kana = Inventory::kana();
        let groups: Vec<Group> = kana.iter().map(|c| c.group).collect();
        let mut sorted = groups.clone();
        sorted.sort();
        assert_eq!(groups, sorted);
        assert_eq!(kana.as_slice()[0].symbol, "あ");
    }

    #[test]
    fn test_lookup() {
        let kana = Inventory::kana();
        let shi = kana.get("シ").unwrap();
        assert_eq!(shi.pronunciation, "shi");
        assert_eq!(shi.group, Group::Katakana);
        assert_eq!(shi.audio_ref.as_str(), "kana/shi.mp3");
        assert!(kana.get("x").is_none());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let chars = vec![
            KanaCharacter::new("あ", "a", Group::Hiragana),
            KanaCharacter::new("い", "i", Group::Hiragana),
            KanaCharacter::new("あ", "a", Group::Hiragana),
        ];
        assert_eq!(
            Inventory::new(chars).unwrap_err(),
            InventoryError::DuplicateSymbol("あ".to_string())
        );
    }

    #[test]
    fn test_too_few_pronunciations_rejected() {
        let chars = vec![
            KanaCharacter::new("あ", "a", Group::Hiragana),
            KanaCharacter::new("ア", "a", Group::Katakana),
            KanaCharacter::new("い", "i", Group::Hiragana),
        ];
        assert_eq!(
            Inventory::new(chars).unwrap_err(),
            InventoryError::TooFewPronunciations(2)
        );
    }

    #[test]
    fn test_group_serialization() {
        assert_eq!(serde_json::to_string(&Group::Yoon).unwrap(), "\"yoon\"");
        let group: Group = serde_json::from_str("\"dakuten\"").unwrap();
        assert_eq!(group, Group::Dakuten);
    }
}
