use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};

/// Bidirectional mapping between the characters of a corpus and contiguous integer ids.
///
/// Ids are assigned in sorted character order, so building a vocabulary twice from the same text
/// yields the same ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    /// Sparse lookup from character to id.
    char_to_index: HashMap<char, u32>,
    /// Lookup from id to character. A vector suffices, because ids are contiguous.
    index_to_char: Vec<char>,
}

impl Vocabulary {
    pub fn from_text(text: &str) -> Self {
        Self::from_chars(text.chars())
    }

    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let set: BTreeSet<char> = chars.into_iter().collect();
        let index_to_char: Vec<char> = set.into_iter().collect();
        let char_to_index = index_to_char
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i as u32))
            .collect();
        Vocabulary {
            char_to_index,
            index_to_char,
        }
    }

    pub fn len(&self) -> usize {
        self.index_to_char.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_char.is_empty()
    }

    pub fn index(&self, c: char) -> Result<u32> {
        self.char_to_index
            .get(&c)
            .copied()
            .ok_or(Error::UnknownCharacter(c))
    }

    pub fn char_at(&self, index: u32) -> Result<char> {
        self.index_to_char
            .get(index as usize)
            .copied()
            .ok_or(Error::UnknownIndex {
                index,
                size: self.len(),
            })
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        text.chars().map(|c| self.index(c)).collect()
    }

    pub fn encode_chars(&self, chars: &[char]) -> Result<Vec<u32>> {
        chars.iter().map(|&c| self.index(c)).collect()
    }

    pub fn decode(&self, indices: &[u32]) -> Result<String> {
        indices.iter().map(|&i| self.char_at(i)).collect()
    }

    /// Persist the characters in id order as a JSON array
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(&self.index_to_char)?;
        fs::write(path, json).map_err(|e| Error::io(path, e))?;
        info!("saved vocabulary to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let chars: Vec<char> = serde_json::from_str(&json)?;
        Ok(Self::from_chars(chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_corpus_character_round_trips() {
        let text = "the cat sat on the mat.\nwhy? because!";
        let vocab = Vocabulary::from_text(text);

        for c in text.chars() {
            let index = vocab.index(c).unwrap();
            assert_eq!(c, vocab.char_at(index).unwrap());
        }
        assert_eq!(text, vocab.decode(&vocab.encode(text).unwrap()).unwrap());
    }

    #[test]
    fn ids_follow_sorted_character_order() {
        let vocab = Vocabulary::from_text("abc \n");

        assert_eq!(5, vocab.len());
        assert_eq!('\n', vocab.char_at(0).unwrap());
        assert_eq!(' ', vocab.char_at(1).unwrap());
        assert_eq!('a', vocab.char_at(2).unwrap());
        assert_eq!('b', vocab.char_at(3).unwrap());
        assert_eq!('c', vocab.char_at(4).unwrap());
    }

    #[test]
    fn unknown_character_and_index() {
        let vocab = Vocabulary::from_text("ab");

        assert!(matches!(vocab.encode("abz"), Err(Error::UnknownCharacter('z'))));
        assert!(matches!(
            vocab.char_at(2),
            Err(Error::UnknownIndex { index: 2, size: 2 })
        ));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        let vocab = Vocabulary::from_text("hello, world\n\"quoted\"");

        vocab.save(&path).unwrap();
        let loaded = Vocabulary::load(&path).unwrap();

        assert_eq!(vocab, loaded);
    }
}
