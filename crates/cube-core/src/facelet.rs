use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of stickers on the puzzle
pub const FACELET_COUNT: usize = 54;
/// Stickers per face
pub const FACELETS_PER_FACE: usize = 9;

/// A face of the puzzle, in wire order (face index 0..5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Face {
    U,
    L,
    F,
    R,
    B,
    D,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::L, Face::F, Face::R, Face::B, Face::D];

    /// Index of the face in the flat layout
    pub fn index(self) -> usize {
        self as usize
    }

    /// First facelet index belonging to this face
    pub fn offset(self) -> usize {
        self.index() * FACELETS_PER_FACE
    }

    pub fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::L => 'L',
            Face::F => 'F',
            Face::R => 'R',
            Face::B => 'B',
            Face::D => 'D',
        }
    }

    pub fn from_letter(c: char) -> Option<Face> {
        match c {
            'U' => Some(Face::U),
            'L' => Some(Face::L),
            'F' => Some(Face::F),
            'R' => Some(Face::R),
            'B' => Some(Face::B),
            'D' => Some(Face::D),
            _ => None,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Sticker color label (0..5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Green,
    Red,
    Blue,
    Orange,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::Orange,
        Color::Yellow,
    ];

    pub fn label(self) -> u8 {
        self as u8
    }

    pub fn from_label(label: u8) -> Option<Color> {
        Color::ALL.get(label as usize).copied()
    }

    /// Single-letter form used by the search service
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Green => 'G',
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Orange => 'O',
            Color::Yellow => 'Y',
        }
    }

    pub fn from_letter(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'G' => Some(Color::Green),
            'R' => Some(Color::Red),
            'B' => Some(Color::Blue),
            'O' => Some(Color::Orange),
            'Y' => Some(Color::Yellow),
            _ => None,
        }
    }
}

/// Errors raised when building a state from external data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaceletError {
    #[error("expected 54 facelets but got {0}")]
    WrongLength(usize),
    #[error("facelet {index} has label {label}, expected a value between 0 and 5")]
    InvalidLabel { index: usize, label: u8 },
    #[error("facelet {index} has unknown color letter `{letter}`")]
    InvalidLetter { index: usize, letter: char },
}

/// A puzzle configuration: one color per sticker, six faces of nine
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceletState([Color; FACELET_COUNT]);

impl Default for FaceletState {
    fn default() -> Self {
        Self::solved()
    }
}

impl FaceletState {
    /// The solved configuration: facelet `i` has color `i / 9`
    pub const fn solved() -> Self {
        let mut cells = [Color::White; FACELET_COUNT];
        let mut i = 0;
        while i < FACELET_COUNT {
            cells[i] = Color::ALL[i / FACELETS_PER_FACE];
            i += 1;
        }
        Self(cells)
    }

    /// Build a state from raw 0..5 labels
    pub fn from_labels(labels: &[u8]) -> Result<Self, FaceletError> {
        if labels.len() != FACELET_COUNT {
            return Err(FaceletError::WrongLength(labels.len()));
        }
        let mut cells = [Color::White; FACELET_COUNT];
        for (index, (&label, cell)) in labels.iter().zip(cells.iter_mut()).enumerate() {
            *cell = Color::from_label(label).ok_or(FaceletError::InvalidLabel { index, label })?;
        }
        Ok(Self(cells))
    }

    /// Raw labels in wire order
    pub fn labels(&self) -> [u8; FACELET_COUNT] {
        std::array::from_fn(|i| self.0[i].label())
    }

    pub fn get(&self, index: usize) -> Color {
        self.0[index]
    }

    /// Sticker on `face` at `row`, `col` (each 0..3)
    pub fn sticker(&self, face: Face, row: usize, col: usize) -> Color {
        self.0[face.offset() + row * 3 + col]
    }

    pub fn is_solved(&self) -> bool {
        *self == Self::solved()
    }

    /// How many stickers of each color are present
    pub fn color_counts(&self) -> [usize; 6] {
        let mut counts = [0usize; 6];
        for color in self.0 {
            counts[color.label() as usize] += 1;
        }
        counts
    }

    /// Whether every color appears exactly nine times
    pub fn is_color_balanced(&self) -> bool {
        self.color_counts().iter().all(|&n| n == FACELETS_PER_FACE)
    }

    /// Gather-permute the stickers: `next[i] = self[perm[i]]`
    pub(crate) fn permuted(&self, perm: &[u8; FACELET_COUNT]) -> Self {
        Self(std::array::from_fn(|i| self.0[perm[i] as usize]))
    }
}

impl fmt::Debug for FaceletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FaceletState({})", self)
    }
}

impl fmt::Display for FaceletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in self.0 {
            write!(f, "{}", color.letter())?;
        }
        Ok(())
    }
}

impl FromStr for FaceletState {
    type Err = FaceletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if letters.len() != FACELET_COUNT {
            return Err(FaceletError::WrongLength(letters.len()));
        }
        let mut cells = [Color::White; FACELET_COUNT];
        for (index, (&letter, cell)) in letters.iter().zip(cells.iter_mut()).enumerate() {
            *cell = Color::from_letter(letter).ok_or(FaceletError::InvalidLetter { index, letter })?;
        }
        Ok(Self(cells))
    }
}

impl Serialize for FaceletState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.labels().to_vec().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FaceletState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let labels = Vec::<u8>::deserialize(deserializer)?;
        FaceletState::from_labels(&labels).map_err(serde::de::Error::custom)
    }
}
