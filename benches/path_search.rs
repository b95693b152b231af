use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pairlink::{BoardManager, GenerationConfig, GenerationMode, Grid, PathFinder, Position};

fn bench_is_solvable(c: &mut Criterion) {
    let config = GenerationConfig::new(12, 16, 24)
        .with_seed(12345)
        .with_mode(GenerationMode::Ingredient);
    let board = BoardManager::generate(&config).expect("board");

    c.bench_function("is_solvable_12x16", |b| {
        b.iter(|| black_box(&board).is_solvable())
    });
}

fn bench_two_turn_around_edge(c: &mut Criterion) {
    // Two tiles in opposite corners of a full board: only the border route connects.
    let mut rows = vec![vec![9; 20]; 20];
    rows[0][0] = 1;
    rows[0][19] = 1;
    rows[0][1] = 2;
    let grid = Grid::from_rows(rows).expect("grid");
    let finder = PathFinder::new(&grid);

    c.bench_function("two_turn_20x20", |b| {
        b.iter(|| finder.connect(black_box(Position::new(0, 0)), black_box(Position::new(0, 19))))
    });
}

fn bench_shuffle(c: &mut Criterion) {
    let config = GenerationConfig::new(8, 10, 12).with_seed(7);
    let mut board = BoardManager::generate(&config).expect("board");

    c.bench_function("shuffle_8x10", |b| b.iter(|| board.shuffle()));
}

criterion_group!(benches, bench_is_solvable, bench_two_turn_around_edge, bench_shuffle);
criterion_main!(benches);
