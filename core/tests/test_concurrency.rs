#[cfg(test)]
mod concurrency_tests {
    use std::collections::HashSet;
    use std::io::Cursor;
    use std::sync::Mutex;

    use dispatch_core::compression::{compress_frame, decompress_all, Algorithm};
    use dispatch_core::config::ManagerConfig;
    use dispatch_core::dispatch::{Buffer, JobParams, Manager};
    use dispatch_core::scheduler::fixed_order;
    use dispatch_core::stream::{SharedBuffer, SourceHandle};
    use dispatch_core::strategy::StrategyType;
    use dispatch_core::types::{DispatchError, JobId};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn concurrent_compress_jobs_get_unique_ids_and_valid_output() {
        let manager = Manager::default();
        let ids = Mutex::new(Vec::new());

        crossbeam::scope(|s| {
            for t in 0..8u64 {
                let manager = &manager;
                let ids = &ids;
                s.spawn(move |_| {
                    let mut rng = StdRng::seed_from_u64(t);
                    for _ in 0..25 {
                        let len: usize = rng.gen_range(0..100_000);
                        let data: Vec<u8> = (0..len).map(|i| (i % 97) as u8 ^ (t as u8)).collect();
                        let algorithm = Algorithm::ALL[rng.gen_range(0..4)];
                        let out = SharedBuffer::new();
                        let params = JobParams::compress(algorithm, out.sink());
                        let sub = manager.submit(Buffer::Input(&data), &params).expect("compress");
                        assert_eq!(decompress_all(algorithm, &out.contents()).expect("decode"), data);
                        ids.lock().expect("ids").push(sub.id);
                    }
                });
            }
        })
        .expect("threads");

        let ids = ids.into_inner().expect("ids");
        let unique: HashSet<JobId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 200);
        assert_eq!(manager.live_jobs(), 0);
        for id in unique {
            assert!(!manager.is_live(id));
        }
        assert_eq!(manager.counters().jobs_completed, 200);
    }

    #[test]
    fn pool_bound_holds_under_concurrent_streams() {
        let cap = 3;
        let manager = Manager::new(ManagerConfig::default().with_capacity(StrategyType::Analytics, cap)).expect("manager");
        let frame = compress_frame(Algorithm::Gzip, 6, &vec![5u8; 300_000]).expect("frame");
        let policy = fixed_order(vec![StrategyType::Analytics]);

        let outcomes: Vec<Result<JobId, DispatchError>> = crossbeam::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let manager = &manager;
                    let policy = policy.clone();
                    let frame = frame.clone();
                    s.spawn(move |_| {
                        let params = JobParams::decompress(Algorithm::Gzip, SourceHandle::new(Cursor::new(frame)));
                        let mut out = [0u8; 32];
                        manager
                            .submit_with_policy(Buffer::Output(&mut out), &params, policy.as_ref())
                            .map(|sub| sub.id)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("join")).collect()
        })
        .expect("threads");

        let held: Vec<JobId> = outcomes.iter().filter_map(|o| o.as_ref().ok().copied()).collect();
        assert_eq!(held.len(), cap);
        assert!(outcomes
            .iter()
            .filter_map(|o| o.as_ref().err())
            .all(|e| matches!(e, DispatchError::NoWorkingStrategies)));
        assert_eq!(manager.live_jobs(), cap);

        for id in held {
            manager.release(id).expect("release");
        }
        assert_eq!(manager.live_jobs(), 0);
    }

    #[test]
    fn interleaved_streams_keep_their_own_decoders() {
        let manager = Manager::default();
        let a = b"stream A ".repeat(2000);
        let b = b"stream B ".repeat(3000);
        let policy = fixed_order(vec![StrategyType::Offload]);

        let mut pa = JobParams::decompress(Algorithm::Zstd, SourceHandle::new(Cursor::new(compress_frame(Algorithm::Zstd, 3, &a).expect("a"))));
        let mut pb = JobParams::decompress(Algorithm::Zstd, SourceHandle::new(Cursor::new(compress_frame(Algorithm::Zstd, 3, &b).expect("b"))));
        let (mut got_a, mut got_b) = (Vec::new(), Vec::new());
        let (mut done_a, mut done_b) = (false, false);

        while !(done_a && done_b) {
            for (params, got, done) in [(&mut pa, &mut got_a, &mut done_a), (&mut pb, &mut got_b, &mut done_b)] {
                if *done {
                    continue;
                }
                let mut chunk = [0u8; 1024];
                let s = manager.submit_with_policy(Buffer::Output(&mut chunk), params, policy.as_ref()).expect("read");
                got.extend_from_slice(&chunk[..s.bytes]);
                if s.end_of_stream {
                    *done = true;
                } else {
                    params.id = Some(s.id);
                }
            }
        }
        assert_eq!(got_a, a);
        assert_eq!(got_b, b);
        assert_eq!(manager.live_jobs(), 0);
    }
}
