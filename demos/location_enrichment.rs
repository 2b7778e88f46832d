//! Location enrichment example for cnpost-rs
//!
//! A geocoder hands over (province, city, district) triples. The alias and
//! code stages run directly on them, without any postcode.

use cnpost_core::{Pipeline, PipelineConfig, Result};

fn main() -> Result<()> {
    println!("=== cnpost-rs Location Enrichment Example ===\n");

    let pipeline = Pipeline::from_config(PipelineConfig::default())?;
    println!("Alias entries: {}\n", pipeline.aliases().len());

    let inputs = [
        ("广东省", "广州市", "东山区"),
        ("北京市", "北京市", "崇文区（旧）"),
        ("上海市", "", "卢湾"),
        ("广东省", "深圳市", "宝安县"),
        ("吉林省", "延边朝鲜族自治州", ""),
        ("西藏自治区", "拉萨市", "城关区"),
    ];

    for (province, city, district) in inputs {
        let e = pipeline.enrich_location(province, city, district)?;
        let codes = &e.codes;
        let outcome = if codes.is_empty() {
            "no codes".to_string()
        } else {
            format!(
                "{}/{}/{} {}",
                codes.province_code,
                codes.city_code,
                codes.area_code,
                codes.matched.note()
            )
        };
        println!(
            "{province} {city} {district} -> {} [alias: {}] {outcome}",
            e.alias.canonical_district, e.alias.hit
        );
    }

    Ok(())
}
