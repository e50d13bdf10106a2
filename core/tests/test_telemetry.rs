#[cfg(test)]
mod telemetry_snapshot_tests {
    use std::time::Duration;

    use rotxor_core::telemetry::{Stage, StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

    fn make_counters() -> TelemetryCounters {
        TelemetryCounters {
            blocks: 3,
            short_blocks: 1,
            batches: 2,
            bytes_in: 9,
            bytes_out: 9,
        }
    }

    fn make_timer() -> TelemetryTimer {
        let mut timer = TelemetryTimer::new();
        std::thread::sleep(Duration::from_millis(20)); // ensure elapsed > stage times
        timer.add_stage_time(Stage::Read, Duration::from_millis(5));
        timer.add_stage_time(Stage::Write, Duration::from_millis(10));
        timer.finish();
        timer
    }

    #[test]
    fn snapshot_initializes_output_none() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer(), 2, 4);

        assert!(snapshot.output.is_none());
        assert!(snapshot.output_crc32.is_none());
    }

    #[test]
    fn snapshot_copies_counters() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer(), 2, 4);

        assert_eq!(snapshot.workers, 2);
        assert_eq!(snapshot.block_len, 4);
        assert_eq!(snapshot.blocks, 3);
        assert_eq!(snapshot.short_blocks, 1);
        assert_eq!(snapshot.batches, 2);
        assert_eq!(snapshot.bytes_in, 9);
        assert_eq!(snapshot.bytes_out, 9);
        assert!(snapshot.elapsed >= Duration::from_millis(20));
        assert!(snapshot.throughput_bytes_per_sec > 0.0);
    }

    #[test]
    fn attach_output_and_checksum() {
        let mut snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer(), 2, 4);

        let buf = vec![1, 2, 3, 4];
        snapshot.attach_output(buf.clone());
        snapshot.attach_checksum(0xDEAD_BEEF);

        assert_eq!(snapshot.output, Some(buf));
        assert_eq!(snapshot.output_crc32, Some(0xDEAD_BEEF));
    }

    #[test]
    fn stage_totals_and_presence() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer(), 2, 4);

        assert_eq!(snapshot.total_stage_time(), Duration::from_millis(15));
        assert!(snapshot.has_all_stages(&[Stage::Read, Stage::Write]));
        assert!(!snapshot.has_all_stages(&[Stage::Barrier]));
    }

    #[test]
    fn sanity_check_flags_lost_bytes() {
        let mut counters = make_counters();
        let good = TelemetrySnapshot::from(&counters, &make_timer(), 2, 4);
        assert!(good.sanity_check());

        counters.bytes_out = 8;
        let lost = TelemetrySnapshot::from(&counters, &make_timer(), 2, 4);
        assert!(!lost.sanity_check());

        counters.bytes_out = 9;
        counters.short_blocks = 2;
        let double_short = TelemetrySnapshot::from(&counters, &make_timer(), 2, 4);
        assert!(!double_short.sanity_check());
    }

    #[test]
    fn json_round_trip_skips_output() {
        let mut snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer(), 2, 4);
        snapshot.attach_output(vec![9; 16]);
        snapshot.attach_checksum(42);

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"blocks\": 3"));
        assert!(json.contains("\"output_crc32\": 42"));

        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert!(back.output.is_none());
        assert_eq!(back.blocks, 3);
        assert_eq!(back.stage_times.get(Stage::Write), Duration::from_millis(10));
    }

    // ------------------------------------------------------------
    // Counters and stage times
    // ------------------------------------------------------------
    #[test]
    fn counters_track_short_blocks() {
        let mut counters = TelemetryCounters::default();
        counters.add_block(4, 4);
        counters.add_block(4, 4);
        counters.add_block(1, 4);
        counters.add_output(9);
        counters.add_batch();

        assert_eq!(counters, make_counters_with_batches(1));
    }

    fn make_counters_with_batches(batches: u64) -> TelemetryCounters {
        TelemetryCounters { batches, ..make_counters() }
    }

    #[test]
    fn counters_merge() {
        let mut a = make_counters();
        a += make_counters();

        assert_eq!(a.blocks, 6);
        assert_eq!(a.short_blocks, 2);
        assert_eq!(a.batches, 4);
        assert_eq!(a.bytes_out, 18);
    }

    #[test]
    fn stage_times_accumulate_and_merge() {
        let mut times = StageTimes::default();
        times.add(Stage::Barrier, Duration::from_millis(3));
        times.add(Stage::Barrier, Duration::from_millis(4));
        assert_eq!(times.get(Stage::Barrier), Duration::from_millis(7));
        assert_eq!(times.get(Stage::Dispatch), Duration::ZERO);

        let mut other = StageTimes::default();
        other.add(Stage::Barrier, Duration::from_millis(1));
        other.add(Stage::Read, Duration::from_millis(2));
        times.merge(&other);

        assert_eq!(times.get(Stage::Barrier), Duration::from_millis(8));
        assert_eq!(times.total(), Duration::from_millis(10));
        assert!((times.get_ms(Stage::Read) - 2.0).abs() < 1e-9);
        assert_eq!(times.summary(), "barrier=8.000ms read=2.000ms");
    }

    #[test]
    fn timer_time_charges_stage() {
        let mut timer = TelemetryTimer::new();
        let value = timer.time(Stage::Transform, || {
            std::thread::sleep(Duration::from_millis(5));
            7
        });
        timer.finish();

        assert_eq!(value, 7);
        assert!(timer.stage_times.get(Stage::Transform) >= Duration::from_millis(5));
        assert!(timer.elapsed() >= timer.stage_times.total());
    }

    #[test]
    fn stage_display_names() {
        assert_eq!(Stage::Read.to_string(), "read");
        assert_eq!(Stage::Barrier.to_string(), "barrier");
        assert_eq!(Stage::Write.to_string(), "write");
    }
}
