//! # Chorus Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | ch-01 Logical Clock | tick / observe | < 1µs |
//! | ch-03 Participant | prepare + commit | < 50µs per txn |
//! | ch-04 Request Ordering | sorted insert | O(log n) search |

use ch_01_logical_clock::LogicalClock;
use ch_03_participant::{InMemoryLedgerStore, ParticipantAgent, ParticipantApi, ParticipantConfig, Playlist};
use ch_04_request_ordering::{PendingLog, QueuedRequest};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_types::{LogicalTimestamp, Operation, SongId, TransactionId};

// ============================================================================
// CH-01: Logical Clock
// ============================================================================

fn bench_clock_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("ch-01-logical-clock");

    let clock = LogicalClock::new("BENCH");
    group.bench_function("tick", |b| b.iter(|| black_box(clock.tick())));

    let remote = LogicalTimestamp::new(1_000, "REMOTE");
    group.bench_function("observe", |b| b.iter(|| black_box(clock.observe(&remote))));

    group.finish();
}

// ============================================================================
// CH-03: Participant voting
// ============================================================================

fn bench_participant_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("ch-03-participant");

    for size in [10usize, 100, 1_000] {
        let playlist = Playlist::from_songs((0..size).map(|i| SongId::new(format!("song{i}"))));
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("prepare_commit", size), &playlist, |b, playlist| {
            let agent = ParticipantAgent::with_playlist(
                ParticipantConfig::for_node("BENCH"),
                InMemoryLedgerStore::new(),
                playlist.clone(),
            );
            let mut n = 0u64;
            b.iter(|| {
                n += 1;
                let id = TransactionId::from_sequence(n);
                let song = SongId::new(format!("new{n}"));
                let vote = agent.prepare(id.clone(), Operation::Add.into(), song.clone());
                agent.commit(&id, Operation::Add, &song);
                black_box(vote)
            })
        });
    }

    group.finish();
}

// ============================================================================
// CH-04: Pending request log
// ============================================================================

fn request(counter: u64, node: usize) -> QueuedRequest {
    QueuedRequest {
        timestamp: LogicalTimestamp::new(counter, format!("CLIENT_{node}")),
        song: "bench".into(),
        received_at: LogicalTimestamp::new(counter + 1, "SERVER"),
    }
}

fn bench_pending_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("ch-04-pending-log");

    for size in [100usize, 1_000] {
        let in_order: Vec<_> = (0..size).map(|i| request(i as u64, i % 4)).collect();
        let reversed: Vec<_> = in_order.iter().rev().cloned().collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("insert_in_order", size), &in_order, |b, reqs| {
            b.iter(|| {
                let mut log = PendingLog::new(size);
                for r in reqs {
                    log.insert(r.clone());
                }
                black_box(log.len())
            })
        });
        group.bench_with_input(BenchmarkId::new("insert_reversed", size), &reversed, |b, reqs| {
            b.iter(|| {
                let mut log = PendingLog::new(size);
                for r in reqs {
                    log.insert(r.clone());
                }
                black_box(log.len())
            })
        });
        group.bench_with_input(BenchmarkId::new("insert_evicting", size), &in_order, |b, reqs| {
            b.iter(|| {
                let mut log = PendingLog::new(size / 10);
                for r in reqs {
                    black_box(log.insert(r.clone()));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_clock_operations,
    bench_participant_operations,
    bench_pending_log,
);

criterion_main!(benches);
