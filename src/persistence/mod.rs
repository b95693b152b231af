//! # Persistence
//!
//! Versioned binary save format.
//!
//! All integers and floats are big-endian. Layout:
//!
//! ```text
//! u32  magic            0x4C4B5341 ("LKSA")
//! i32  version          1
//! i32  rows
//! i32  cols
//! i32  × rows*cols      row-major cells, -1 = empty
//! u32  position count
//! f64  × 2 × count      (x, y) per player
//! u32  score count
//! i32  × count          score per player
//! i32  remaining time   seconds
//! ```
//!
//! Decoding validates the magic and version before reading anything else. Checking the
//! number of players against the running game is left to the caller.

use crate::config::SAVE_FILE_EXTENSION;
use crate::{Grid, PairlinkResult, TypeId, EMPTY};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Leading signature of every save file.
pub const SAVE_MAGIC: u32 = 0x4C4B_5341;

/// The only save format version this build reads and writes.
pub const SAVE_VERSION: i32 = 1;

/// Flat snapshot of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub grid: Grid,
    /// Pixel position of each player
    pub positions: Vec<(f64, f64)>,
    /// Score of each player, same order as `positions`
    pub scores: Vec<i32>,
    /// Seconds left on the countdown
    pub remaining_time: i32,
}

impl SaveState {
    /// Number of player records in the snapshot.
    pub fn actor_count(&self) -> usize {
        self.positions.len()
    }
}

/// Reasons a byte buffer is not a loadable save.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not a valid save file (signature {found:#010x})")]
    BadMagic { found: u32 },

    #[error("unsupported save version {0}")]
    UnsupportedVersion(i32),

    #[error("save file is truncated: {needed} more byte(s) needed at offset {offset}")]
    Truncated { needed: usize, offset: usize },

    #[error("save file is malformed: {0}")]
    Malformed(String),
}

/// Serializes a snapshot.
///
/// # Examples
///
/// ```
/// use pairlink::{decode, encode, Grid, SaveState};
///
/// let state = SaveState {
///     grid: Grid::from_rows(vec![vec![1, -1], vec![-1, 1]]).unwrap(),
///     positions: vec![(120.0, 540.0)],
///     scores: vec![30],
///     remaining_time: 95,
/// };
/// let bytes = encode(&state);
/// assert_eq!(&bytes[..4], b"LKSA");
/// assert_eq!(decode(&bytes).unwrap(), state);
/// ```
pub fn encode(state: &SaveState) -> Vec<u8> {
    let grid = &state.grid;
    let mut bytes = Vec::with_capacity(
        4 * (6 + grid.cells().len() + state.scores.len()) + 16 * state.positions.len(),
    );

    bytes.extend(SAVE_MAGIC.to_be_bytes());
    bytes.extend(SAVE_VERSION.to_be_bytes());

    bytes.extend((grid.rows() as i32).to_be_bytes());
    bytes.extend((grid.cols() as i32).to_be_bytes());
    for &cell in grid.cells() {
        bytes.extend(cell.to_be_bytes());
    }

    bytes.extend((state.positions.len() as u32).to_be_bytes());
    for &(x, y) in &state.positions {
        bytes.extend(x.to_be_bytes());
        bytes.extend(y.to_be_bytes());
    }

    bytes.extend((state.scores.len() as u32).to_be_bytes());
    for &score in &state.scores {
        bytes.extend(score.to_be_bytes());
    }

    bytes.extend(state.remaining_time.to_be_bytes());
    bytes
}

/// Parses a snapshot written by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<SaveState, DecodeError> {
    let mut reader = Reader::new(bytes);

    let magic = reader.read_u32()?;
    if magic != SAVE_MAGIC {
        return Err(DecodeError::BadMagic { found: magic });
    }
    let version = reader.read_i32()?;
    if version != SAVE_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let grid = read_grid(&mut reader)?;

    let position_count = reader.read_u32()? as usize;
    reader.ensure(position_count.saturating_mul(16))?;
    let mut positions = Vec::with_capacity(position_count);
    for _ in 0..position_count {
        let x = reader.read_f64()?;
        let y = reader.read_f64()?;
        positions.push((x, y));
    }

    let score_count = reader.read_u32()? as usize;
    if score_count != position_count {
        return Err(DecodeError::Malformed(format!(
            "{} positions but {} scores",
            position_count, score_count
        )));
    }
    reader.ensure(score_count.saturating_mul(4))?;
    let mut scores = Vec::with_capacity(score_count);
    for _ in 0..score_count {
        scores.push(reader.read_i32()?);
    }

    let remaining_time = reader.read_i32()?;

    if reader.remaining() > 0 {
        return Err(DecodeError::Malformed(format!(
            "{} unexpected trailing byte(s)",
            reader.remaining()
        )));
    }

    Ok(SaveState {
        grid,
        positions,
        scores,
        remaining_time,
    })
}

fn read_grid(reader: &mut Reader<'_>) -> Result<Grid, DecodeError> {
    let rows = reader.read_i32()?;
    let cols = reader.read_i32()?;
    if rows < 0 || cols < 0 {
        return Err(DecodeError::Malformed(format!(
            "negative grid dimensions {}x{}",
            rows, cols
        )));
    }

    let (rows, cols) = (rows as usize, cols as usize);
    let count = rows
        .checked_mul(cols)
        .ok_or_else(|| DecodeError::Malformed(format!("grid {}x{} is too large", rows, cols)))?;
    reader.ensure(count.saturating_mul(4))?;

    let mut cells: Vec<TypeId> = Vec::with_capacity(count);
    for _ in 0..count {
        let value = reader.read_i32()?;
        if value < EMPTY {
            return Err(DecodeError::Malformed(format!("invalid cell value {}", value)));
        }
        cells.push(value);
    }

    Grid::from_cells(rows, cols, cells).map_err(|e| DecodeError::Malformed(e.to_string()))
}

/// Big-endian cursor over a byte slice.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Fails with `Truncated` unless at least `len` bytes are left.
    fn ensure(&self, len: usize) -> Result<(), DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::Truncated {
                needed: len - self.remaining(),
                offset: self.offset,
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.ensure(N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        Ok(buf)
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.take::<4>().map(u32::from_be_bytes)
    }

    fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.take::<4>().map(i32::from_be_bytes)
    }

    fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.take::<8>().map(f64::from_be_bytes)
    }
}

/// Writes a snapshot to disk, appending the `.lksav` extension when it is missing.
///
/// Returns the path actually written.
pub fn save_to_file(
    state: &SaveState,
    path: impl AsRef<std::path::Path>,
) -> PairlinkResult<PathBuf> {
    let path = with_save_extension(path.as_ref());
    fs::write(&path, encode(state))?;
    info!(
        "Saved {}x{} board for {} player(s) to {}",
        state.grid.rows(),
        state.grid.cols(),
        state.actor_count(),
        path.display()
    );
    Ok(path)
}

/// Reads and decodes a save file.
pub fn load_from_file(path: impl AsRef<std::path::Path>) -> PairlinkResult<SaveState> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let state = decode(&bytes).map_err(|e| {
        warn!("Rejected save file {}: {}", path.display(), e);
        e
    })?;
    info!("Loaded save file {}", path.display());
    Ok(state)
}

fn with_save_extension(path: &std::path::Path) -> PathBuf {
    if path.extension().map(|ext| ext == SAVE_FILE_EXTENSION).unwrap_or(false) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(SAVE_FILE_EXTENSION);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> SaveState {
        SaveState {
            grid: Grid::from_rows(vec![vec![3, -1, 7], vec![-1, 7, 3]]).unwrap(),
            positions: vec![(100.5, 500.0), (700.0, 500.0)],
            scores: vec![20, -10],
            remaining_time: 42,
        }
    }

    #[test]
    fn test_encode_header_layout() {
        let bytes = encode(&sample_state());
        assert_eq!(&bytes[0..4], &[0x4C, 0x4B, 0x53, 0x41]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 1]);
        assert_eq!(&bytes[8..12], &[0, 0, 0, 2]);
        assert_eq!(&bytes[12..16], &[0, 0, 0, 3]);
        // First cell, then the empty sentinel.
        assert_eq!(&bytes[16..20], &[0, 0, 0, 3]);
        assert_eq!(&bytes[20..24], &[0xFF, 0xFF, 0xFF, 0xFF]);
        // 4 header ints, 6 cells, 2 counts, 2 positions, 2 scores, remaining time
        assert_eq!(bytes.len(), 16 + 24 + 8 + 32 + 8 + 4);
    }

    #[test]
    fn test_decode_round_trip() {
        let state = sample_state();
        assert_eq!(decode(&encode(&state)).unwrap(), state);
    }

    #[test]
    fn test_decode_empty_grid() {
        let state = SaveState {
            grid: Grid::new(0, 0),
            positions: Vec::new(),
            scores: Vec::new(),
            remaining_time: 0,
        };
        assert_eq!(decode(&encode(&state)).unwrap(), state);
    }

    #[test]
    fn test_decode_bad_magic() {
        let mut bytes = encode(&sample_state());
        bytes[0] = 0x00;
        assert_eq!(
            decode(&bytes),
            Err(DecodeError::BadMagic { found: 0x004B_5341 })
        );
    }

    #[test]
    fn test_decode_unsupported_version() {
        let mut bytes = encode(&sample_state());
        bytes[4..8].copy_from_slice(&2i32.to_be_bytes());
        let err = decode(&bytes).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedVersion(2));
        assert_eq!(err.to_string(), "unsupported save version 2");
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = encode(&sample_state());
        assert!(matches!(
            decode(&bytes[..2]),
            Err(DecodeError::Truncated { needed: 2, offset: 0 })
        ));
        for cut in [8, 20, 50, bytes.len() - 1] {
            assert!(
                matches!(decode(&bytes[..cut]), Err(DecodeError::Truncated { .. })),
                "cut at {}",
                cut
            );
        }
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode(&sample_state());
        bytes.push(0);
        assert!(matches!(decode(&bytes), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_negative_dimensions() {
        let mut bytes = encode(&sample_state());
        bytes[8..12].copy_from_slice(&(-2i32).to_be_bytes());
        assert!(matches!(decode(&bytes), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_bad_cell() {
        let mut bytes = encode(&sample_state());
        bytes[16..20].copy_from_slice(&(-7i32).to_be_bytes());
        assert!(matches!(decode(&bytes), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_count_mismatch() {
        let mut state = sample_state();
        state.scores.pop();
        assert!(matches!(
            decode(&encode(&state)),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_huge_dimensions_are_truncated_not_allocated() {
        let mut bytes = Vec::new();
        bytes.extend(SAVE_MAGIC.to_be_bytes());
        bytes.extend(SAVE_VERSION.to_be_bytes());
        bytes.extend(i32::MAX.to_be_bytes());
        bytes.extend(i32::MAX.to_be_bytes());
        assert!(matches!(decode(&bytes), Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn test_save_extension() {
        assert_eq!(
            with_save_extension(std::path::Path::new("slot1")),
            PathBuf::from("slot1.lksav")
        );
        assert_eq!(
            with_save_extension(std::path::Path::new("slot1.lksav")),
            PathBuf::from("slot1.lksav")
        );
        assert_eq!(
            with_save_extension(std::path::Path::new("slot1.bak")),
            PathBuf::from("slot1.bak.lksav")
        );
    }
}
