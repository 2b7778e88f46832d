// Shared fixtures for the integration tests.
#![allow(dead_code)]

use cnpost_core::{DataPaths, PipelineConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SPLITS: &str = "province\tcity\tarea\tareapostcode\tcitypostcode\n\
北京市\t北京市\t东城区\t100700\t100000\n\
北京市\t北京市\t西城区\t100800\t\n\
北京市\t北京市\t海淀区\t100080\t\n\
广东省\t广州市\t穗城区\t510100\t510000\n\
广东省\t广州市\t天河区\t510600\t\n\
河北省\t保定市\t\t\t071000\n";

pub const STANDARD: &str = "postcode\tprovince\tcity\tdistrict\taddress\n\
100006\t北京市\t北京市\t东城区\t王府井大街\n\
102218\t北京市\t北京市\t昌平区\t回龙观\n\
510630\t广东省\t广州市\t天河区\t五山路\n";

pub const CODES: &str = "province\tcity\tarea\tprovince_code\tcity_code\tarea_code\n\
北京市\t北京市\t东城区\t110000\t110100\t110101\n\
北京市\t北京市\t海淀区\t110000\t110100\t110108\n\
北京市\t北京市\t昌平区\t110000\t110100\t110114\n\
广东省\t广州市\t越秀区\t440000\t440100\t440104\n\
广东省\t广州市\t天河区\t440000\t440100\t440106\n\
河北省\t保定市\t\t130000\t130600\t\n";

pub const ALIASES: &str = "province\tcity\talias\ttarget_area\n\
广东省\t\t穗城区\t越秀区\n";

/// Writes the fixture tables into a fresh directory.
pub fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "split_divisions.tsv", SPLITS);
    write(dir.path(), "standard_postcodes.tsv", STANDARD);
    write(dir.path(), "admin_codes.tsv", CODES);
    write(dir.path(), "area_alias_map.tsv", ALIASES);
    dir
}

pub fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write fixture");
}

pub fn data_paths(dir: &Path) -> DataPaths {
    DataPaths {
        split_divisions: dir.join("split_divisions.tsv"),
        standard_postcodes: dir.join("standard_postcodes.tsv"),
        admin_codes: dir.join("admin_codes.tsv"),
        aliases: Some(dir.join("area_alias_map.tsv")),
        snapshot: None,
    }
}

pub fn config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        data: data_paths(dir),
        ..PipelineConfig::default()
    }
}
