//! Criterion benchmarks for the telemetry codec and datagram decoder.
//!
//! Telemetry arrives at the subscription rate (65 Hz by default), each record
//! wrapped in a base64 JSON datagram.  Decoding one must stay well under the
//! frame interval.
//!
//! Run with:
//! ```bash
//! cargo bench --package m4p-core --bench telemetry_bench
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use m4p_core::protocol::datagram::decode_datagram;
use m4p_core::protocol::telemetry::{decode_telemetry, encode_telemetry, TELEMETRY_LEN};
use m4p_core::TelemetryRecord;

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn make_record() -> TelemetryRecord {
    TelemetryRecord {
        return_value: 1,
        device_id: 2,
        coordinate: [960, 540],
        gyroscope: [0.25, -0.5, 1.0],
        acceleration: [0.0, 9.81, 0.0],
        quaternion: [1.0, 0.0, 0.0, 0.0],
    }
}

fn remote_update(payload: &[u8]) -> Vec<u8> {
    format!(
        r#"{{"t":"remote_update","remoteUpdate":{{"payload":"{}"}}}}"#,
        STANDARD.encode(payload)
    )
    .into_bytes()
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_decode_telemetry(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_telemetry");
    let bytes = encode_telemetry(&make_record());

    // Complete record, a cut inside the gyroscope, and an empty payload.
    for len in [TELEMETRY_LEN, 15, 0] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &bytes[..len], |b, input| {
            b.iter(|| decode_telemetry(black_box(input)))
        });
    }

    group.finish();
}

fn bench_decode_remote_update(c: &mut Criterion) {
    let datagram = remote_update(&encode_telemetry(&make_record()));

    c.bench_function("decode_datagram/remote_update", |b| {
        b.iter(|| decode_datagram(black_box(&datagram)).unwrap())
    });
}

criterion_group!(benches, bench_decode_telemetry, bench_decode_remote_update);
criterion_main!(benches);
