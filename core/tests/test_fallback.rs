#[cfg(test)]
mod fallback_tests {
    use std::io::Cursor;

    use dispatch_core::compression::{compress_frame, Algorithm};
    use dispatch_core::config::ManagerConfig;
    use dispatch_core::dispatch::{Buffer, JobParams, Manager};
    use dispatch_core::scheduler::fixed_order;
    use dispatch_core::stream::{SharedBuffer, SourceHandle};
    use dispatch_core::strategy::StrategyType;
    use dispatch_core::types::{DispatchError, JobId};

    fn big_gzip_source() -> SourceHandle {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
        let frame = compress_frame(Algorithm::Gzip, 6, &data).expect("frame");
        SourceHandle::new(Cursor::new(frame))
    }

    /// Start a decompress job on `strategy` and leave it mid-stream.
    fn occupy(manager: &Manager, strategy: StrategyType) -> JobId {
        let params = JobParams::decompress(Algorithm::Gzip, big_gzip_source());
        let mut out = [0u8; 16];
        let s = manager
            .submit_with_policy(Buffer::Output(&mut out), &params, fixed_order(vec![strategy]).as_ref())
            .expect("occupy");
        assert!(!s.end_of_stream);
        s.id
    }

    #[test]
    fn skips_not_installed_and_full_backends() {
        let cfg = ManagerConfig::default()
            .with_installed(StrategyType::Offload, false)
            .with_capacity(StrategyType::Analytics, 1);
        let manager = Manager::new(cfg).expect("manager");
        occupy(&manager, StrategyType::Analytics);

        let input = b"fallback determinism ".repeat(300);
        let out = SharedBuffer::new();
        let params = JobParams::compress(Algorithm::Gzip, out.sink()).with_level(5);
        let order = fixed_order(vec![StrategyType::Offload, StrategyType::Analytics, StrategyType::Isa]);
        let s = manager.submit_with_policy(Buffer::Input(&input), &params, order.as_ref()).expect("fallback");
        assert_eq!(s.strategy, StrategyType::Isa);
        assert_eq!(s.bytes, input.len());

        // same bytes as the last candidate alone
        let alone = Manager::default();
        let reference = SharedBuffer::new();
        let ref_params = JobParams::compress(Algorithm::Gzip, reference.sink()).with_level(5);
        alone
            .submit_with_policy(Buffer::Input(&input), &ref_params, fixed_order(vec![StrategyType::Isa]).as_ref())
            .expect("reference");
        assert_eq!(out.contents(), reference.contents());

        let counters = manager.counters();
        assert_eq!(counters.skipped_candidates, 2);
        assert_eq!(counters.disabled_strategies, 1);
        assert!(!manager.available_strategies().contains(&StrategyType::Offload));
    }

    #[test]
    fn only_unsupported_backends_exhaust() {
        let manager = Manager::default();
        let out = SharedBuffer::new();
        let params = JobParams::compress(Algorithm::Lz4, out.sink());
        let order = fixed_order(vec![StrategyType::Isa, StrategyType::Analytics, StrategyType::Offload]);

        let err = manager.submit_with_policy(Buffer::Input(b"payload"), &params, order.as_ref());
        assert!(matches!(err, Err(DispatchError::NoWorkingStrategies)));
        assert!(out.is_empty());
        assert_eq!(manager.live_jobs(), 0);
    }

    #[test]
    fn pinned_backend_at_capacity_is_exhausted_or_falls_through() {
        let manager = Manager::new(ManagerConfig::default().with_capacity(StrategyType::Analytics, 2)).expect("manager");
        occupy(&manager, StrategyType::Analytics);
        occupy(&manager, StrategyType::Analytics);
        assert_eq!(manager.live_jobs(), 2);

        let params = JobParams::compress(Algorithm::Deflate, SharedBuffer::new().sink());
        let pinned = manager.submit_with_policy(Buffer::Input(b"x"), &params, fixed_order(vec![StrategyType::Analytics]).as_ref());
        assert!(matches!(pinned, Err(DispatchError::NoWorkingStrategies)));

        let with_next = fixed_order(vec![StrategyType::Analytics, StrategyType::Software]);
        let s = manager.submit_with_policy(Buffer::Input(b"x"), &params, with_next.as_ref()).expect("fallback");
        assert_eq!(s.strategy, StrategyType::Software);
    }

    #[test]
    fn pinned_offload_at_capacity_one() {
        let manager = Manager::new(ManagerConfig::default().with_capacity(StrategyType::Offload, 1)).expect("manager");
        let held = occupy(&manager, StrategyType::Offload);

        let params = JobParams::compress(Algorithm::Gzip, SharedBuffer::new().sink());
        let pinned = fixed_order(vec![StrategyType::Offload]);
        let err = manager.submit_with_policy(Buffer::Input(b"payload"), &params, pinned.as_ref());
        assert!(matches!(err, Err(DispatchError::NoWorkingStrategies)));
        assert_eq!(manager.counters().skipped_candidates, 1);

        let with_next = fixed_order(vec![StrategyType::Offload, StrategyType::Analytics]);
        let s = manager.submit_with_policy(Buffer::Input(b"payload"), &params, with_next.as_ref()).expect("fallback");
        assert_eq!(s.strategy, StrategyType::Analytics);

        // freeing the slot makes the pinned order work again
        manager.release(held).expect("release");
        let s = manager.submit_with_policy(Buffer::Input(b"payload"), &params, pinned.as_ref()).expect("slot freed");
        assert_eq!(s.strategy, StrategyType::Offload);
        assert_eq!(manager.live_jobs(), 0);
    }

    #[test]
    fn hard_error_stops_the_walk() {
        let manager = Manager::default();
        let params = JobParams::decompress(Algorithm::Zstd, SourceHandle::new(Cursor::new(b"not zstd at all".to_vec())));
        let mut out = [0u8; 64];
        let order = fixed_order(vec![StrategyType::Offload, StrategyType::Software]);
        let err = manager.submit_with_policy(Buffer::Output(&mut out), &params, order.as_ref()).err().expect("hard");

        assert!(matches!(err, DispatchError::Handler(_)));
        assert_eq!(manager.counters().served_by(StrategyType::Software), 0);
        assert_eq!(manager.live_jobs(), 0);
        assert_eq!(manager.counters().failed_submissions, 1);
    }
}
