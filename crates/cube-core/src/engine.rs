//! Facelet permutation engine.
//!
//! Every quarter turn is a fixed permutation of the 54 facelets, stored in
//! gather form: after the move, facelet `i` holds what was at `table[i]`.
//! Clockwise tables are assembled from the face-adjacency wiring below;
//! counter-clockwise tables are their inverses, computed at compile time.

use crate::facelet::{FaceletState, FACELET_COUNT};
use crate::moves::Move;

type Permutation = [u8; FACELET_COUNT];

/// Perimeter of the turning face, as (destination, source) offsets within the face.
/// Corners and edges each form a 4-cycle; the center (4) is fixed.
const FACE_RING: [(usize, usize); 8] = [
    (0, 6),
    (2, 0),
    (8, 2),
    (6, 8),
    (1, 3),
    (5, 1),
    (7, 5),
    (3, 7),
];

/// Side strips moved by a clockwise turn, as (destination, source) facelets.
/// Four strips of three stickers, each taking the place of the next one
/// around the axis. Indexed by face in wire order U, L, F, R, B, D.
const SIDE_STRIPS: [[(usize, usize); 12]; 6] = [
    // U: front -> left -> back -> right -> front
    [
        (9, 18),
        (10, 19),
        (11, 20),
        (36, 9),
        (37, 10),
        (38, 11),
        (27, 36),
        (28, 37),
        (29, 38),
        (18, 27),
        (19, 28),
        (20, 29),
    ],
    // L: up -> front -> down -> back -> up
    [
        (18, 0),
        (21, 3),
        (24, 6),
        (45, 18),
        (48, 21),
        (51, 24),
        (44, 45),
        (41, 48),
        (38, 51),
        (0, 44),
        (3, 41),
        (6, 38),
    ],
    // F: up -> right -> down -> left -> up
    [
        (27, 6),
        (30, 7),
        (33, 8),
        (47, 27),
        (46, 30),
        (45, 33),
        (17, 47),
        (14, 46),
        (11, 45),
        (6, 17),
        (7, 14),
        (8, 11),
    ],
    // R: up -> back -> down -> front -> up
    [
        (36, 8),
        (39, 5),
        (42, 2),
        (53, 36),
        (50, 39),
        (47, 42),
        (26, 53),
        (23, 50),
        (20, 47),
        (8, 26),
        (5, 23),
        (2, 20),
    ],
    // B: up -> left -> down -> right -> up
    [
        (9, 2),
        (12, 1),
        (15, 0),
        (51, 9),
        (52, 12),
        (53, 15),
        (35, 51),
        (32, 52),
        (29, 53),
        (2, 35),
        (1, 32),
        (0, 29),
    ],
    // D: front -> right -> back -> left -> front
    [
        (33, 24),
        (34, 25),
        (35, 26),
        (42, 33),
        (43, 34),
        (44, 35),
        (15, 42),
        (16, 43),
        (17, 44),
        (24, 15),
        (25, 16),
        (26, 17),
    ],
];

const fn identity() -> Permutation {
    let mut perm = [0u8; FACELET_COUNT];
    let mut i = 0;
    while i < FACELET_COUNT {
        perm[i] = i as u8;
        i += 1;
    }
    perm
}

const fn clockwise(face: usize) -> Permutation {
    let mut perm = identity();
    let offset = face * 9;

    let mut i = 0;
    while i < FACE_RING.len() {
        let (dst, src) = FACE_RING[i];
        perm[offset + dst] = (offset + src) as u8;
        i += 1;
    }

    let strips = &SIDE_STRIPS[face];
    let mut j = 0;
    while j < strips.len() {
        let (dst, src) = strips[j];
        perm[dst] = src as u8;
        j += 1;
    }
    perm
}

const fn invert(perm: &Permutation) -> Permutation {
    let mut inv = [0u8; FACELET_COUNT];
    let mut i = 0;
    while i < FACELET_COUNT {
        inv[perm[i] as usize] = i as u8;
        i += 1;
    }
    inv
}

const fn build_tables() -> [Permutation; 12] {
    let mut tables = [[0u8; FACELET_COUNT]; 12];
    let mut face = 0;
    while face < 6 {
        let cw = clockwise(face);
        tables[face * 2] = cw;
        tables[face * 2 + 1] = invert(&cw);
        face += 1;
    }
    tables
}

/// One table per move, in [`Move::ALL`] order
static MOVE_TABLES: [Permutation; 12] = build_tables();

/// The permutation a move performs, in gather form
pub fn permutation(mv: Move) -> &'static [u8; FACELET_COUNT] {
    &MOVE_TABLES[mv.index()]
}

/// Apply one quarter turn
pub fn apply(state: &FaceletState, mv: Move) -> FaceletState {
    state.permuted(permutation(mv))
}

/// Apply a sequence of quarter turns in order
pub fn apply_all<'a, I>(state: &FaceletState, moves: I) -> FaceletState
where
    I: IntoIterator<Item = &'a Move>,
{
    moves
        .into_iter()
        .fold(*state, |acc, &mv| apply(&acc, mv))
}
