use criterion::{criterion_group, criterion_main, Criterion};
use maze_solver::{
    generators::{self, Generator},
    grid::Grid,
    render_sink::{EventLog, NullSink},
    units::{ColumnsCount, RowsCount},
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn bench_recursive_backtracker_32(c: &mut Criterion) {
    let blank = Grid::new(RowsCount(32), ColumnsCount(32)).unwrap();
    let mut rng = XorShiftRng::seed_from_u64(32);

    c.bench_function("recursive_backtracker_32", move |b| {
        b.iter(|| {
            let mut g = blank.clone();
            generators::recursive_backtracker(&mut g, &mut rng, &mut NullSink).unwrap();
            g
        })
    });
}

fn bench_generate_350(c: &mut Criterion) {
    let blank = Grid::new(RowsCount(350), ColumnsCount(350)).unwrap();
    let mut generator = Generator::from_seed(350);

    c.bench_function("generate_350", move |b| {
        b.iter(|| {
            let mut g = blank.clone();
            generator.generate(&mut g, &mut NullSink).unwrap();
            g
        })
    });
}

fn bench_generate_recording_events_32(c: &mut Criterion) {
    let blank = Grid::new(RowsCount(32), ColumnsCount(32)).unwrap();
    let mut generator = Generator::from_seed(7);

    c.bench_function("generate_recording_events_32", move |b| {
        b.iter(|| {
            let mut g = blank.clone();
            let mut log = EventLog::new();
            generator.generate(&mut g, &mut log).unwrap();
            log
        })
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_32,
    bench_generate_350,
    bench_generate_recording_events_32
);
criterion_main!(benches);
