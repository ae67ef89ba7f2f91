use proptest::prelude::*;
use proptest::test_runner::RngSeed;
use structmap::{NoConvert, ParseText, Record, Value};

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Telemetry {
    pub active: bool,
    pub offset: i16,
    pub delta: isize,
    pub count: u32,
    pub total: u64,
    pub gain: f32,
    pub ratio: f64,
    #[structmap(tag(wire = "name"), tag(db = "sensor_name"))]
    pub label: String,
    internal: i64,
}

fn arb_telemetry() -> impl Strategy<Value = Telemetry> {
    (
        any::<bool>(),
        any::<i16>(),
        any::<isize>(),
        any::<u32>(),
        any::<u64>(),
        -1.0e6f32..1.0e6f32,
        -1.0e12f64..1.0e12f64,
        ".{0,24}",
        any::<i64>(),
    )
        .prop_map(
            |(active, offset, delta, count, total, gain, ratio, label, internal)| Telemetry {
                active,
                offset,
                delta,
                count,
                total,
                gain,
                ratio,
                label,
                internal,
            },
        )
}

fn without_internal(record: &Telemetry) -> Telemetry {
    Telemetry {
        internal: 0,
        ..record.clone()
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        rng_seed: RngSeed::Fixed(0x5eed_f00d),
        .. ProptestConfig::default()
    })]

    #[test]
    fn strict_round_trip_preserves_exported_fields(
        record in arb_telemetry(),
        tag in prop::sample::select(vec!["", "wire", "db", "yaml"]),
    ) {
        let map = record.to_map(tag).expect("to map");
        let restored = Telemetry::from_map(&map, &NoConvert, tag).expect("from map");
        prop_assert_eq!(restored, without_internal(&record));
    }

    #[test]
    fn parse_round_trip_preserves_exported_fields(record in arb_telemetry()) {
        let map = record.to_map("wire").expect("to map");
        let restored = Telemetry::from_map(&map, &ParseText, "wire").expect("from map");
        prop_assert_eq!(restored, without_internal(&record));
    }

    #[test]
    fn written_keys_match_the_descriptor(
        record in arb_telemetry(),
        tag in prop::sample::select(vec!["", "wire", "db"]),
    ) {
        let map = record.to_map(tag).expect("to map");
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        let expected: Vec<&str> = Telemetry::descriptor().keys(tag).collect();
        prop_assert_eq!(keys, expected);
        prop_assert!(!map.contains_key("internal"));
    }

    #[test]
    fn maps_to_structs_preserves_length_and_order(
        records in prop::collection::vec(arb_telemetry(), 0..8),
    ) {
        let mut maps = Vec::new();
        structmap::structs_to_maps(&records, &mut maps, "db").expect("to maps");

        let mut restored: Vec<Telemetry> = Vec::new();
        structmap::maps_to_structs(&maps, &mut restored, &NoConvert, "db").expect("from maps");

        prop_assert_eq!(restored.len(), records.len());
        let expected: Vec<Telemetry> = records.iter().map(without_internal).collect();
        prop_assert_eq!(restored, expected);
    }

    #[test]
    fn parse_to_text_accepts_every_scalar(value in prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u8>().prop_map(Value::from),
        (-1.0e9f64..1.0e9f64).prop_map(Value::from),
        ".{0,12}".prop_map(Value::from),
    ]) {
        let map = [("name".to_string(), value.clone())].into_iter().collect();
        let restored = Telemetry::from_map(&map, &ParseText, "wire").expect("text always parses");
        prop_assert_eq!(restored.label, value.to_string());
    }
}
