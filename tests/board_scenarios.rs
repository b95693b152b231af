//! End-to-end board scenarios: connectivity, matching, solvability and save decoding.

use pairlink::{
    decode, encode, BoardManager, DecodeError, GenerationConfig, GenerationMode, Grid,
    MatchOutcome, PairlinkError, PairlinkResult, PathFinder, Position, SaveState, EMPTY,
};

fn tile_id(board: &BoardManager, row: i32, col: i32) -> pairlink::TileId {
    board
        .tile_at(Position::new(row, col))
        .map(|tile| tile.id)
        .expect("tile present")
}

#[test]
fn test_straight_connect_across_empty_row() -> PairlinkResult<()> {
    let grid = Grid::from_rows(vec![vec![2, -1, 2], vec![-1, -1, -1], vec![-1, -1, -1]])?;
    let finder = PathFinder::new(&grid);

    let path = finder
        .find_path(Position::new(0, 0), Position::new(0, 2))?
        .expect("straight path");
    assert_eq!(path.points(), &[Position::new(0, 0), Position::new(0, 2)]);
    assert_eq!(path.turns(), 0);
    Ok(())
}

#[test]
fn test_one_turn_connect_through_free_corner() -> PairlinkResult<()> {
    let grid = Grid::from_rows(vec![vec![1, 2, -1], vec![-1, 2, -1], vec![-1, 1, -1]])?;
    let finder = PathFinder::new(&grid);

    let path = finder
        .find_path(Position::new(0, 0), Position::new(2, 1))?
        .expect("one-turn path");
    assert_eq!(path.points().len(), 3);
    assert_eq!(path.points()[1], Position::new(2, 0));
    Ok(())
}

#[test]
fn test_four_by_four_board_is_solvable() -> PairlinkResult<()> {
    let grid = Grid::from_rows(vec![
        vec![1, -1, 2, 3],
        vec![-1, 2, 3, -1],
        vec![2, 3, -1, 1],
        vec![3, -1, 1, 2],
    ])?;
    let board = BoardManager::from_grid(grid);
    assert!(board.is_solvable());

    let (a, b) = board.find_hint_pair().expect("hint pair");
    assert_eq!(a.tile_type, b.tile_type);
    assert!(PathFinder::new(board.grid()).can_connect(a.position, b.position));
    Ok(())
}

#[test]
fn test_match_then_board_state() -> PairlinkResult<()> {
    let grid = Grid::from_rows(vec![vec![2, -1, 2], vec![-1, -1, -1], vec![-1, -1, -1]])?;
    let mut board = BoardManager::from_grid(grid);
    let a = tile_id(&board, 0, 0);
    let b = tile_id(&board, 0, 2);

    assert_eq!(board.try_match(a, a)?, MatchOutcome::AlreadySelected);
    assert!(matches!(board.try_match(a, b)?, MatchOutcome::Matched(_)));

    assert!(board.grid().cells().iter().all(|&cell| cell == EMPTY));
    assert_eq!(board.tile_count(), 0);
    assert!(!board.is_solvable());
    assert!(board.find_hint_pair().is_none());

    let points = board.last_path_points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].0 - points[0].0, 2.0 * board.layout().spacing());
    Ok(())
}

#[test]
fn test_corrupted_magic_is_rejected() {
    let state = SaveState {
        grid: Grid::from_rows(vec![vec![0, 0]]).expect("grid"),
        positions: vec![(1.0, 2.0)],
        scores: vec![0],
        remaining_time: 60,
    };
    let mut bytes = encode(&state);
    bytes[..4].copy_from_slice(b"NOPE");

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, DecodeError::BadMagic { .. }));
    assert!(err.to_string().starts_with("not a valid save file"));

    let wrapped: PairlinkError = err.into();
    assert!(wrapped.to_string().starts_with("not a valid save file"));
}

#[test]
fn test_generated_boards_are_playable() -> PairlinkResult<()> {
    for seed in 0..20 {
        let config = GenerationConfig::for_testing(seed);
        let board = BoardManager::generate(&config)?;
        assert_eq!(board.grid().rows(), config.rows);
        assert_eq!(board.grid().cols(), config.cols);
        assert_eq!(board.tile_count(), config.rows * config.cols);
        assert!(board.is_solvable(), "seed {} produced a dead board", seed);
    }
    Ok(())
}

#[test]
fn test_generation_is_deterministic_per_seed() -> PairlinkResult<()> {
    let config = GenerationConfig::new(6, 8, 10)
        .with_seed(77)
        .with_mode(GenerationMode::Ingredient);
    let first = BoardManager::generate(&config)?;
    let second = BoardManager::generate(&config)?;
    assert_eq!(first.grid(), second.grid());
    Ok(())
}

#[test]
fn test_generation_rejects_bad_dimensions() {
    let zero = GenerationConfig::new(0, 4, 2).with_seed(1);
    assert!(matches!(
        BoardManager::generate(&zero),
        Err(PairlinkError::GenerationFailed(_))
    ));

    let too_many_types = GenerationConfig::new(2, 2, 500).with_seed(1);
    assert!(matches!(
        BoardManager::generate(&too_many_types),
        Err(PairlinkError::GenerationFailed(_))
    ));
}

#[test]
fn test_play_out_a_board_with_hints() -> PairlinkResult<()> {
    let mut board = BoardManager::generate(&GenerationConfig::for_testing(2024))?;
    let mut matches = 0;

    while let Some((a, b)) = board.find_hint_pair() {
        match board.try_match(a.id, b.id)? {
            MatchOutcome::Matched(path) => {
                assert!(path.turns() <= 2);
                matches += 1;
            }
            other => panic!("hint pair did not match: {:?}", other),
        }
    }

    assert!(matches > 0);
    assert_eq!(board.grid().occupied_count(), board.tile_count());
    Ok(())
}
