use criterion::{
    Criterion,
    criterion_group,
    criterion_main
};
use maze_solver::cells::Coordinate;
use maze_solver::generators::Generator;
use maze_solver::grid::Grid;
use maze_solver::pathing;
use maze_solver::render_sink::NullSink;
use maze_solver::units::{ColumnsCount, RowsCount};

fn carved_grid(rows: usize, columns: usize) -> Grid {
    let mut g = Grid::new(RowsCount(rows), ColumnsCount(columns)).unwrap();
    Generator::from_seed(350).generate(&mut g, &mut NullSink).unwrap();
    g
}

fn bench_solve(c: &mut Criterion) {
    c.bench_function("solve_350", |b| {
        let g = carved_grid(350, 350);
        b.iter(|| {
            let mut maze = g.clone();
            pathing::solve(&mut maze, &mut NullSink)
        })
    });
}

fn bench_depth_first_path(c: &mut Criterion) {
    c.bench_function("depth_first_path_350", |b| {
        let g = carved_grid(350, 350);
        let start_coord = Coordinate::new(250, 250);
        let end_coord = Coordinate::new(0, 0);
        b.iter(|| {
            let mut maze = g.clone();
            pathing::depth_first_path(&mut maze, start_coord, end_coord, &mut NullSink)
        })
    });
}

criterion_group!(benches,
    bench_solve,
    bench_depth_first_path
);
criterion_main!(benches);
