use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use steam_query_protocol::config::{ReassemblyConfig, PACKET_SIZE};
use steam_query_protocol::utils::compression::{compress, CompressionInfo};
use steam_query_protocol::{order_fragments, Dispatcher, Reassembler};

fn rules_body(pairs: u16) -> Vec<u8> {
    let mut body = vec![0x45];
    body.extend_from_slice(&pairs.to_le_bytes());
    for i in 0..pairs {
        body.extend_from_slice(format!("sv_rule_{i}\0value_{i}\0").as_bytes());
    }
    body
}

fn chunk(data: &[u8]) -> Vec<Bytes> {
    data.chunks(PACKET_SIZE)
        .map(Bytes::copy_from_slice)
        .collect()
}

#[allow(clippy::unwrap_used)]
fn bench_reassembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("reassembly");
    let reassembler =
        Reassembler::with_dispatcher(ReassemblyConfig::default(), Dispatcher::global());

    // large enough to span a dozen or so fragments
    let body = rules_body(1000);
    let plain = chunk(&body);
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function(format!("plain_{}_fragments", plain.len()), |b| {
        b.iter(|| reassembler.reassemble(black_box(&plain), None).unwrap())
    });

    let compressed = compress(&body).unwrap();
    let info = CompressionInfo::describe(&body).unwrap();
    let fragments = chunk(&compressed);
    group.bench_function(format!("bzip2_{}_fragments", fragments.len()), |b| {
        b.iter(|| {
            reassembler
                .reassemble(black_box(&fragments), Some(info))
                .unwrap()
        })
    });

    let indexed: Vec<(u16, Bytes)> = plain
        .iter()
        .cloned()
        .enumerate()
        .rev()
        .map(|(i, f)| (i as u16, f))
        .collect();
    group.bench_function("order_fragments", |b| {
        b.iter(|| order_fragments(black_box(indexed.clone())).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_reassembly);
criterion_main!(benches);
