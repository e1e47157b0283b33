#[cfg(test)]
mod roundtrip_tests {
    use std::io::{Cursor, Read};
    use std::sync::Arc;

    use dispatch_core::compression::{compress_frame, Algorithm};
    use dispatch_core::config::ManagerConfig;
    use dispatch_core::dispatch::{Buffer, JobParams, Manager};
    use dispatch_core::scheduler::fixed_order;
    use dispatch_core::stream::{Configurable, Reader, SharedBuffer, SourceHandle, StreamOption};
    use dispatch_core::strategy::{OffloadMode, StrategyType};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    const SIZES: [usize; 6] = [0, 1, 1499, 1500, 65536, 70_001];

    fn payload(len: usize, seed: u64) -> Vec<u8> {
        // half noise, half text so both incompressible and repetitive runs are hit
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = vec![0u8; len];
        rng.fill_bytes(&mut data[..len / 2]);
        for (i, b) in data[len / 2..].iter_mut().enumerate() {
            *b = b"dispatch core "[i % 14];
        }
        data
    }

    fn compress_on(manager: &Manager, strategy: StrategyType, algorithm: Algorithm, input: &[u8]) -> Vec<u8> {
        let out = SharedBuffer::new();
        let params = JobParams::compress(algorithm, out.sink());
        let s = manager
            .submit_with_policy(Buffer::Input(input), &params, fixed_order(vec![strategy]).as_ref())
            .unwrap_or_else(|e| panic!("{strategy}/{algorithm} len {}: {e}", input.len()));
        assert_eq!(s.strategy, strategy);
        assert_eq!(s.bytes, input.len());
        out.contents()
    }

    /// One-shot decode with the software backend.
    fn software_decode(manager: &Manager, algorithm: Algorithm, frame: Vec<u8>, expected_len: usize) -> Vec<u8> {
        let params = JobParams::decompress(algorithm, SourceHandle::new(Cursor::new(frame)));
        let mut out = vec![0u8; expected_len + 64];
        let s = manager
            .submit_with_policy(Buffer::Output(&mut out), &params, fixed_order(vec![StrategyType::Software]).as_ref())
            .expect("software decode");
        assert!(s.end_of_stream);
        out.truncate(s.bytes);
        out
    }

    fn check_all_pairs(manager: &Manager) {
        for strategy in StrategyType::ALL {
            for algorithm in strategy.supported_algorithms().algorithms() {
                for (i, len) in SIZES.into_iter().enumerate() {
                    let input = payload(len, i as u64);
                    let frame = compress_on(manager, strategy, algorithm, &input);
                    let decoded = software_decode(manager, algorithm, frame, len);
                    assert_eq!(decoded, input, "{strategy}/{algorithm} len {len}");
                }
            }
        }
        assert_eq!(manager.live_jobs(), 0);
    }

    #[test]
    fn every_supported_pair_round_trips_direct_mode() {
        check_all_pairs(&Manager::default());
    }

    #[test]
    fn every_supported_pair_round_trips_session_mode() {
        let cfg = ManagerConfig { offload_mode: OffloadMode::Session, session_buffer_size: 64, ..ManagerConfig::default() };
        check_all_pairs(&Manager::new(cfg).expect("manager"));
    }

    #[test]
    fn hardware_decoders_stream_in_small_reads() {
        let manager = Arc::new(Manager::default());
        let input = payload(50_000, 9);

        for strategy in [StrategyType::Offload, StrategyType::Analytics, StrategyType::Isa] {
            for algorithm in strategy.supported_algorithms().algorithms() {
                let frame = compress_frame(algorithm, algorithm.default_level(), &input).expect("frame");
                let mut reader = Reader::new(manager.clone(), Cursor::new(frame));
                reader.set_policy(fixed_order(vec![strategy]));
                reader.apply(&[StreamOption::Algorithm(algorithm)]).expect("apply");

                let mut got = Vec::new();
                let mut chunk = [0u8; 777];
                loop {
                    let n = reader.read(&mut chunk).expect("read");
                    if n == 0 {
                        break;
                    }
                    got.extend_from_slice(&chunk[..n]);
                }
                assert_eq!(got, input, "{strategy}/{algorithm}");
            }
        }
        assert_eq!(manager.live_jobs(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn default_policy_round_trips(data in proptest::collection::vec(any::<u8>(), 0..4096), alg in 0u8..4) {
            let algorithm = Algorithm::try_from(alg).expect("algorithm id");
            let manager = Manager::default();
            let out = SharedBuffer::new();
            let params = JobParams::compress(algorithm, out.sink());
            manager.submit(Buffer::Input(&data), &params).expect("compress");

            let decoded = software_decode(&manager, algorithm, out.contents(), data.len());
            prop_assert_eq!(decoded, data);
        }
    }
}
