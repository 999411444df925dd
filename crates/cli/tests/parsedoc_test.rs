//! Tests for the dumppages -> parsedoc pipeline over generated fixtures.

#![allow(deprecated)] // cargo_bin deprecation, replacement not yet stable

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

fn dumppages() -> Command {
    Command::cargo_bin("dumppages").expect("binary 'dumppages' should be built")
}

fn parsedoc() -> Command {
    Command::cargo_bin("parsedoc").expect("binary 'parsedoc' should be built")
}

/// One-page raw geometry dump: a name line near the top, a transaction
/// row further down.
fn write_raw_geometry(path: &Path) {
    let raw = serde_json::json!({
        "pages": [{
            "width": 612.0,
            "height": 792.0,
            "words": [
                {"text": "Max", "x0": 61.2, "top": 79.2, "x1": 122.4, "bottom": 95.04},
                {"text": "Mustermann", "x0": 128.52, "top": 79.2, "x1": 244.8, "bottom": 95.04},
                {"text": "01.03.2024", "x0": 61.2, "top": 396.0, "x1": 122.4, "bottom": 411.84},
                {"text": "-850,00", "x0": 428.4, "top": 396.0, "x1": 520.2, "bottom": 411.84}
            ],
            "lines": [
                {"x0": 61.2, "y0": 277.2, "x1": 550.8, "y1": 277.2}
            ]
        }]
    });
    fs::write(path, raw.to_string()).unwrap();
}

fn write_page_image(dir: &Path) {
    fs::create_dir(dir).unwrap();
    let image = RgbImage::from_pixel(612, 792, Rgb([255, 255, 255]));
    image.save(dir.join("page-1.png")).unwrap();
}

fn write_template(path: &Path) {
    let template = r#"{
        "extraction_method": "extraction",
        "pages": [{
            "page_numbers": "1",
            "forms": ["account_holder"],
            "tables": ["transactions"]
        }],
        "rules": [
            {
                "rule_id": "account_holder",
                "type": "form",
                "config": {
                    "field_name": "account_holder",
                    "coordinates": {
                        "top_left": {"x": 0.05, "y": 0.05},
                        "bottom_right": {"x": 0.60, "y": 0.20}
                    }
                }
            },
            {
                "rule_id": "transactions",
                "type": "table",
                "config": {
                    "columns": [
                        {
                            "field_name": "date",
                            "coordinates": {
                                "top_left": {"x": 0.05, "y": 0.30},
                                "bottom_right": {"x": 0.30, "y": 0.60}
                            }
                        },
                        {
                            "field_name": "amount",
                            "coordinates": {
                                "top_left": {"x": 0.60, "y": 0.30},
                                "bottom_right": {"x": 0.95, "y": 0.60}
                            }
                        }
                    ],
                    "row_delimiter": {"field_name": "date", "type": "field"}
                }
            }
        ]
    }"#;
    fs::write(path, template).unwrap();
}

#[test]
fn test_dumppages_normalizes_geometry() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw.json");
    let images = dir.path().join("pages");
    let out = dir.path().join("normalized.json");
    write_raw_geometry(&raw);
    write_page_image(&images);

    dumppages()
        .arg(&raw)
        .arg("--images-dir")
        .arg(&images)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let normalized: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(normalized["number_of_pages"], 1);
    assert_eq!(normalized["dimensions"]["width"], 612.0);
    let word = &normalized["pages"][0]["content"][0];
    assert_eq!(word["text"], "Max");
    assert_eq!(
        word["bounding_box"]["decimal_coordinates"]["top_left"]["x"],
        0.1
    );
    // The drawn line's y is flipped into top-down fractions.
    let line = &normalized["pages"][0]["lines"][0];
    assert_eq!(line["decimal_coordinates"]["top_left"]["y"], 0.65);
    assert_eq!(line["average_pixel_value"], serde_json::json!([255, 255, 255]));
}

#[test]
fn test_pipeline_extracts_forms_and_tables() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw.json");
    let images = dir.path().join("pages");
    let normalized = dir.path().join("normalized.json");
    let template = dir.path().join("template.json");
    let out = dir.path().join("parsed.json");
    write_raw_geometry(&raw);
    write_page_image(&images);
    write_template(&template);

    dumppages()
        .arg(&raw)
        .arg("-i")
        .arg(&images)
        .arg("-o")
        .arg(&normalized)
        .assert()
        .success();

    parsedoc()
        .arg(&template)
        .arg(&normalized)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert!(parsed["metadata"]["document_id"].is_string());
    assert_eq!(parsed["metadata"]["number_of_pages"], 1);

    let page = &parsed["pages"][0];
    assert_eq!(page["forms"][0]["account_holder"], "Max Mustermann");

    // The date baseline at 0.5 splits the columns into the band above it
    // and the band from the date down.
    let rows = page["tables"][0]["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"], "");
    assert_eq!(rows[1]["date"], "01.03.2024");
    assert_eq!(rows[1]["amount"], "-850,00");
}

#[test]
fn test_parsedoc_writes_to_stdout_by_default() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw.json");
    let images = dir.path().join("pages");
    let normalized = dir.path().join("normalized.json");
    let template = dir.path().join("template.json");
    write_raw_geometry(&raw);
    write_page_image(&images);
    write_template(&template);

    dumppages()
        .arg(&raw)
        .arg("-i")
        .arg(&images)
        .arg("-o")
        .arg(&normalized)
        .assert()
        .success();

    parsedoc()
        .arg(&template)
        .arg(&normalized)
        .assert()
        .success()
        .stdout(predicate::str::contains("Max Mustermann"));
}

#[test]
fn test_dumppages_rejects_image_count_mismatch() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw.json");
    let images = dir.path().join("pages");
    write_raw_geometry(&raw);
    // Two images for a one-page document.
    write_page_image(&images);
    let extra = RgbImage::from_pixel(612, 792, Rgb([255, 255, 255]));
    extra.save(images.join("page-2.png")).unwrap();

    dumppages()
        .arg(&raw)
        .arg("-i")
        .arg(&images)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match image count"));
}

#[test]
fn test_parsedoc_rejects_malformed_template() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw.json");
    let images = dir.path().join("pages");
    let normalized = dir.path().join("normalized.json");
    let template = dir.path().join("template.json");
    write_raw_geometry(&raw);
    write_page_image(&images);
    fs::write(&template, r#"{"extraction_method": "screenshot", "pages": [], "rules": []}"#)
        .unwrap();

    dumppages()
        .arg(&raw)
        .arg("-i")
        .arg(&images)
        .arg("-o")
        .arg(&normalized)
        .assert()
        .success();

    parsedoc()
        .arg(&template)
        .arg(&normalized)
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading template"));
}

#[test]
fn test_dumppages_reports_missing_input() {
    let dir = TempDir::new().unwrap();
    dumppages()
        .arg(dir.path().join("nope.json"))
        .arg("-i")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading raw geometry"));
}

#[test]
fn test_help_flags() {
    dumppages()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("images-dir"));
    parsedoc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("template"));
}
