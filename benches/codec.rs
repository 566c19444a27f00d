use std::collections::BTreeMap;

use bitpack::layout::{Field, Layout, Value};
use criterion::{Criterion, criterion_group, criterion_main};

fn gen_layout(field_count: usize) -> Layout {
    let mut fields = Vec::with_capacity(field_count);

    for i in 0..field_count {
        if i % 4 == 3 {
            fields.push(Field::ascii(format!("f{}", i), 8));
        } else {
            fields.push(Field::int(format!("f{}", i), 16));
        }
    }

    Layout::compile(&fields).unwrap()
}

fn gen_record(layout: &Layout) -> BTreeMap<String, Value> {
    layout
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let value = match field.max_bits() {
                16 => Value::U64((i * 31 % 65536) as u64),
                _ => Value::Text(format!("v{}", i)),
            };
            (field.name.clone(), value)
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    for &field_count in &[1usize, 10, 50, 100] {
        let layout = gen_layout(field_count);
        let record = gen_record(&layout);
        let packed = layout.pack(&record).unwrap();

        c.bench_function(&format!("pack_{}_fields", field_count), |b| {
            b.iter(|| layout.pack(&record).unwrap())
        });
        c.bench_function(&format!("unpack_{}_fields", field_count), |b| {
            b.iter(|| layout.unpack(&packed))
        });
    }
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
