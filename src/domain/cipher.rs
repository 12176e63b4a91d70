//! Atbash-style substitution cipher
//!
//! The table maps the symbol at position `i` of an alphabet of size `N` to the
//! symbol at position `N - 1 - i`. Applying the mapping twice gives back the
//! original symbol, so the same table both encodes and decodes.

use std::collections::HashMap;

use crate::application::errors::CipherError;

/// The 22 letters of the Hebrew alphabet in order, without final forms.
pub const HEBREW_ALPHABET: &str = "אבגדהוזחטיכלמנסעפצקרשת";

/// Final letter forms and the regular letter each one folds to.
const FINAL_FORMS: [(char, char); 5] = [
    ('ך', 'כ'),
    ('ם', 'מ'),
    ('ן', 'נ'),
    ('ף', 'פ'),
    ('ץ', 'צ'),
];

/// Involutive symbol mapping. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherTable {
    map: HashMap<char, char>,
}

impl CipherTable {
    /// Image of `symbol`, or `None` when it is outside the table's domain.
    pub fn get(&self, symbol: char) -> Option<char> {
        self.map.get(&symbol).copied()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.map.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Pairs `(symbol, image)` in unspecified order.
    pub fn pairs(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.map.iter().map(|(k, v)| (*k, *v))
    }

    /// Table over [`HEBREW_ALPHABET`].
    pub fn hebrew() -> Self {
        let symbols: Vec<char> = HEBREW_ALPHABET.chars().collect();
        let map = symbols
            .iter()
            .zip(symbols.iter().rev())
            .map(|(a, b)| (*a, *b))
            .collect();
        Self { map }
    }
}

/// Build the reversed-alphabet table.
///
/// Fails when a symbol appears twice, since the mapping would no longer be
/// its own inverse. No partial table is ever returned.
pub fn build_table<I>(alphabet: I) -> Result<CipherTable, CipherError>
where
    I: IntoIterator<Item = char>,
{
    let symbols: Vec<char> = alphabet.into_iter().collect();

    let mut seen: HashMap<char, usize> = HashMap::with_capacity(symbols.len());
    for (index, symbol) in symbols.iter().enumerate() {
        if let Some(first) = seen.insert(*symbol, index) {
            return Err(CipherError::InvalidAlphabet {
                symbol: *symbol,
                first,
                second: index,
            });
        }
    }

    let map = symbols
        .iter()
        .zip(symbols.iter().rev())
        .map(|(a, b)| (*a, *b))
        .collect();

    Ok(CipherTable { map })
}

/// Replace every mapped character with its image, copying everything else.
pub fn transform(table: &CipherTable, text: &str) -> String {
    text.chars()
        .map(|c| table.get(c).unwrap_or(c))
        .collect()
}

/// Replace Hebrew final forms with their regular letters.
pub fn fold_final_letters(text: &str) -> String {
    text.chars()
        .map(|c| {
            FINAL_FORMS
                .iter()
                .find(|(final_form, _)| *final_form == c)
                .map(|(_, regular)| *regular)
                .unwrap_or(c)
        })
        .collect()
}
