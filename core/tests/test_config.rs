#[cfg(test)]
mod config_tests {
    use dispatch_core::compression::{decompress_all, Algorithm};
    use dispatch_core::config::ManagerConfig;
    use dispatch_core::dispatch::{Buffer, JobParams, Manager};
    use dispatch_core::stream::SharedBuffer;
    use dispatch_core::strategy::{OffloadMode, StrategyType};
    use dispatch_core::telemetry::{DispatchCounters, DispatchSnapshot};
    use dispatch_core::types::DispatchError;

    #[test]
    fn json_config_drives_the_manager() {
        let cfg = ManagerConfig::from_json(
            r#"{
                "strategies": ["isa", "software"],
                "size_threshold": 16,
                "offload_mode": "session",
                "isa": { "capacity": 4 }
            }"#,
        )
        .expect("config");
        assert_eq!(cfg.offload_mode, OffloadMode::Session);
        assert_eq!(cfg.capacity(StrategyType::Isa), 4);

        let manager = Manager::new(cfg).expect("manager");
        assert_eq!(manager.bank(), &[StrategyType::Isa, StrategyType::Software]);

        let out = SharedBuffer::new();
        let s = manager
            .submit(Buffer::Input(b"above the tiny threshold"), &JobParams::compress(Algorithm::Gzip, out.sink()))
            .expect("gzip");
        assert_eq!(s.strategy, StrategyType::Isa);

        let zout = SharedBuffer::new();
        let z = manager
            .submit(Buffer::Input(b"zstd is not an isa codec"), &JobParams::compress(Algorithm::Zstd, zout.sink()))
            .expect("zstd");
        assert_eq!(z.strategy, StrategyType::Software);
        assert_eq!(decompress_all(Algorithm::Zstd, &zout.contents()).expect("decode"), b"zstd is not an isa codec");
    }

    #[test]
    fn bad_config_is_rejected() {
        assert!(matches!(ManagerConfig::from_json("{ not json"), Err(DispatchError::Config(_))));
        let cfg = ManagerConfig { session_buffer_size: 0, ..ManagerConfig::default() };
        assert!(matches!(Manager::new(cfg), Err(DispatchError::Config(_))));
    }

    #[test]
    fn counters_track_dispatch() {
        let manager = Manager::new(ManagerConfig::default().with_installed(StrategyType::Offload, false)).expect("manager");
        for _ in 0..3 {
            let params = JobParams::compress(Algorithm::Deflate, SharedBuffer::new().sink());
            manager.submit(Buffer::Input(&[1u8; 100]), &params).expect("compress");
        }

        let c: DispatchCounters = manager.counters();
        assert_eq!(c.jobs_created, 3);
        assert_eq!(c.jobs_completed, 3);
        assert_eq!(c.bytes_compressed, 300);
        assert_eq!(c.served_by(StrategyType::Analytics), 3);
        // offload was tried once, then dropped from the available list
        assert_eq!(c.skipped_candidates, 1);
        assert_eq!(c.disabled_strategies, 1);

        let snap = DispatchSnapshot::from(&c);
        assert!((snap.skip_rate - 0.25).abs() < 1e-9);
        let decoded = DispatchCounters::from_bytes(&c.to_bytes().expect("encode")).expect("decode");
        assert_eq!(decoded, c);
    }
}
