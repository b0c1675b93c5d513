use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tabwire_core::{from_slice, table, to_vec, Blob, DeletedEntry, Entry, RawTable};

table! {
    #[derive(Default)]
    struct Record: "Record" {
        id: Entry<u64, 0>,
        name: Entry<String, 1>,
        old: DeletedEntry<u32, 2>,
        scores: Entry<Vec<i32>, 3>,
        payload: Entry<Blob, 4>,
    }
}

table! {
    #[derive(Default)]
    struct Slim: "Record" {
        id: Entry<u64, 0>,
    }
}

fn sample() -> Record {
    let mut r = Record::default();
    r.id.set(1 << 40);
    r.name.set("benchmark record".into());
    r.scores.set((0..64).map(|i| i * 37 - 1000).collect());
    r.payload.set(Blob(vec![0x5a; 512]));
    r
}

fn bench_tables(c: &mut Criterion) {
    let rec = sample();
    let enc = to_vec(&rec).unwrap();
    c.bench_function("encode", |b| b.iter(|| black_box(to_vec(&rec).unwrap())));
    c.bench_function("decode", |b| b.iter(|| black_box(from_slice::<Record>(&enc).unwrap())));
    c.bench_function("decode_skipping", |b| b.iter(|| black_box(from_slice::<Slim>(&enc).unwrap())));
    c.bench_function("decode_raw", |b| b.iter(|| black_box(from_slice::<RawTable>(&enc).unwrap())));
}

criterion_group!(benches, bench_tables);
criterion_main!(benches);
