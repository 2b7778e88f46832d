mod common;

use cnpost_core::{CnPostError, Pipeline, PipelineConfig, ReferenceDb, ReferenceStore, SourceNote};
use std::fs;

#[test]
fn loads_tsv_tables_and_reports_stats() {
    let dir = common::fixture_dir();
    let db = ReferenceDb::load(&common::data_paths(dir.path())).unwrap();
    let stats = db.stats();
    assert_eq!(stats.split_divisions, 6);
    assert_eq!(stats.area_postcodes, 5);
    assert_eq!(stats.city_postcodes, 3);
    assert_eq!(stats.standard_postcodes, 3);
    assert_eq!(stats.admin_codes, 6);
}

#[test]
fn missing_required_column_is_invalid_data() {
    let dir = common::fixture_dir();
    common::write(dir.path(), "admin_codes.tsv", "province\tcity\tarea\n北京市\t北京市\t东城区\n");
    let err = ReferenceDb::load(&common::data_paths(dir.path())).unwrap_err();
    assert!(matches!(err, CnPostError::InvalidData(_)), "{err}");
}

#[test]
fn non_utf8_table_is_invalid_data() {
    let dir = common::fixture_dir();
    fs::write(
        dir.path().join("standard_postcodes.tsv"),
        b"postcode\tprovince\tcity\tdistrict\taddress\n100006\t\xb1\xb1\xbe\xa9\t\t\t\n",
    )
    .unwrap();
    let err = ReferenceDb::load(&common::data_paths(dir.path())).unwrap_err();
    assert!(matches!(err, CnPostError::InvalidData(_)), "{err}");
}

#[cfg(feature = "json")]
#[test]
fn json_tables_are_accepted() {
    let dir = common::fixture_dir();
    let json = r#"[
        {"province": "北京市", "city": "北京市", "district": "东城区",
         "province_code": "110000", "city_code": "110100", "district_code": "110101"}
    ]"#;
    common::write(dir.path(), "admin_codes.json", json);
    let mut paths = common::data_paths(dir.path());
    paths.admin_codes = dir.path().join("admin_codes.json");

    let db = ReferenceDb::load(&paths).unwrap();
    let row = db.code_by_pca("北京市", "北京市", "东城区").unwrap().unwrap();
    assert_eq!(row.area_code, "110101");
}

#[cfg(feature = "compact")]
#[test]
fn gzip_tables_are_decoded() {
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    let dir = common::fixture_dir();
    let path = dir.path().join("standard_postcodes.tsv.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(common::STANDARD.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let mut paths = common::data_paths(dir.path());
    paths.standard_postcodes = path;
    let db = ReferenceDb::load(&paths).unwrap();
    let row = db.standard_by_postcode("510630").unwrap().unwrap();
    assert_eq!(row.district, "天河区");
}

#[cfg(feature = "builder")]
mod snapshots {
    use super::*;
    use cnpost_core::{build_snapshot, CompressionMode};

    #[test]
    fn snapshot_round_trip() {
        let dir = common::fixture_dir();
        let paths = common::data_paths(dir.path());
        let out = dir.path().join("reference.snap.bin");

        let stats = build_snapshot(&paths, &out, CompressionMode::None).unwrap();
        let db = ReferenceDb::load_snapshot(&out).unwrap();
        assert_eq!(db.stats(), stats);
        let row = db.split_by_area_prefix("100").unwrap().unwrap();
        assert_eq!(row.area, "海淀区");
    }

    #[cfg(feature = "compact")]
    #[test]
    fn compressed_snapshot_round_trip() {
        let dir = common::fixture_dir();
        let paths = common::data_paths(dir.path());
        let out = dir.path().join("reference.snap.bin.gz");

        build_snapshot(&paths, &out, CompressionMode::for_path(&out)).unwrap();
        let db = ReferenceDb::load_snapshot(&out).unwrap();
        assert_eq!(db.stats().admin_codes, 6);
    }

    #[test]
    fn cached_load_writes_then_reuses_snapshot() {
        let dir = common::fixture_dir();
        let mut paths = common::data_paths(dir.path());
        let snap = dir.path().join("reference.snap.bin");
        paths.snapshot = Some(snap.clone());

        let first = ReferenceDb::load_cached(&paths).unwrap();
        assert!(snap.exists());

        // The snapshot still matches the recorded table paths, so the
        // removed source is never read.
        fs::remove_file(&paths.admin_codes).unwrap();
        let second = ReferenceDb::load_cached(&paths).unwrap();
        assert_eq!(first.stats(), second.stats());
    }

    #[test]
    fn cached_load_rebuilds_when_a_table_path_changes() {
        let dir = common::fixture_dir();
        let mut paths = common::data_paths(dir.path());
        paths.snapshot = Some(dir.path().join("reference.snap.bin"));
        ReferenceDb::load_cached(&paths).unwrap();

        common::write(
            dir.path(),
            "other_codes.tsv",
            "province\tcity\tarea\tprovince_code\tcity_code\tarea_code\n\
             北京市\t北京市\t东城区\t110000\t110100\tNEW-CODE\n",
        );
        paths.admin_codes = dir.path().join("other_codes.tsv");

        let db = ReferenceDb::load_cached(&paths).unwrap();
        let row = db.code_by_pca("北京市", "北京市", "东城区").unwrap().unwrap();
        assert_eq!(row.area_code, "NEW-CODE");
    }

    #[test]
    fn cached_load_rebuilds_when_a_table_is_rewritten() {
        let dir = common::fixture_dir();
        let mut paths = common::data_paths(dir.path());
        paths.snapshot = Some(dir.path().join("reference.snap.bin"));
        let first = ReferenceDb::load_cached(&paths).unwrap();
        assert_eq!(first.stats().admin_codes, 6);

        common::write(
            dir.path(),
            "admin_codes.tsv",
            "province\tcity\tarea\tprovince_code\tcity_code\tarea_code\n\
             北京市\t北京市\t东城区\t110000\t110100\t110101\n",
        );
        let second = ReferenceDb::load_cached(&paths).unwrap();
        assert_eq!(second.stats().admin_codes, 1);
    }

    #[test]
    fn saved_snapshot_without_sources_is_rebuilt() {
        let dir = common::fixture_dir();
        let mut paths = common::data_paths(dir.path());
        let snap = dir.path().join("reference.snap.bin");
        paths.snapshot = Some(snap.clone());
        ReferenceDb::default()
            .save_snapshot(&snap, CompressionMode::None)
            .unwrap();

        let db = ReferenceDb::load_cached(&paths).unwrap();
        assert_eq!(db.stats().admin_codes, 6);
    }

    #[test]
    fn garbage_snapshot_is_rejected() {
        let dir = common::fixture_dir();
        let snap = dir.path().join("broken.snap.bin");
        fs::write(&snap, b"not a snapshot").unwrap();
        assert!(ReferenceDb::load_snapshot(&snap).is_err());
    }
}

#[test]
fn config_file_paths_are_relative_to_the_file() {
    let dir = common::fixture_dir();
    let cfg_path = dir.path().join("cnpost.toml");
    fs::write(
        &cfg_path,
        r#"
min_prefix_len = 4
workers = 2

[data]
split_divisions = "split_divisions.tsv"
standard_postcodes = "standard_postcodes.tsv"
admin_codes = "admin_codes.tsv"
aliases = "area_alias_map.tsv"
"#,
    )
    .unwrap();

    let config = PipelineConfig::from_path(&cfg_path).unwrap();
    assert_eq!(config.data.admin_codes, dir.path().join("admin_codes.tsv"));
    assert_eq!(config.effective_workers(), 2);

    let p = Pipeline::from_config(config).unwrap();
    // The ladder stops at four digits, so "100" never gets a chance.
    assert_eq!(p.resolve("100900").unwrap().source_note, SourceNote::None);
    assert_eq!(p.resolve("510100").unwrap().canonical_district, "越秀区");
}

#[test]
fn unreadable_config_is_a_config_error() {
    let err = PipelineConfig::from_path("/no/such/cnpost.toml").unwrap_err();
    assert!(matches!(err, CnPostError::Config(_)));
}
