//! Cassette replay integration tests: ImageMagick is never run.
//!
//! Each test writes a cassette holding the exact argument lists the binary is
//! expected to produce, so a replay only succeeds when the commands match and
//! the number of `convert`/`identify` calls is exactly what was recorded.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use base64::Engine;
use chrono::Utc;
use predicates::prelude::*;
use serde_json::json;

use rastergen::cassette::format::{Cassette, Interaction};

fn cmd(cassette: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rastergen");
    cmd.env("RASTERGEN_REPLAY", cassette.to_str().unwrap())
        .env("RASTERGEN_CONFIG", "/nonexistent/rastergen/config.toml")
        .env_remove("RASTERGEN_REC");
    cmd
}

/// A scratch directory unique to one test.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rastergen_replay_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Base64 of a real PNG of the given size.
fn png_b64(width: u32, height: u32) -> String {
    let img = image::DynamicImage::new_rgba8(width, height);
    let mut buf = std::io::Cursor::new(Vec::<u8>::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
}

/// A successful recorded `convert` holding a PNG of the given size.
fn png_output(width: u32, height: u32) -> serde_json::Value {
    json!({ "Ok": { "data": png_b64(width, height) } })
}

/// First-pass arguments for the label `Hi` at the given point size.
fn label_hi(pointsize: &'static str) -> Vec<&'static str> {
    vec![
        "-gravity",
        "NorthWest",
        "-antialias",
        "-pointsize",
        pointsize,
        "-background",
        "none",
        "label:Hi",
    ]
}

fn convert(args: &[&str], output: serde_json::Value) -> Interaction {
    Interaction {
        seq: 0,
        port: "command_line".into(),
        method: "convert".into(),
        input: json!({ "args": args }),
        output,
    }
}

fn identify(width: u32, height: u32) -> Interaction {
    Interaction {
        seq: 0,
        port: "command_line".into(),
        method: "identify".into(),
        input: json!({}),
        output: json!({ "Ok": { "format": "PNG", "width": width, "height": height } }),
    }
}

fn write_cassette(dir: &Path, interactions: Vec<Interaction>) -> PathBuf {
    let interactions = interactions
        .into_iter()
        .enumerate()
        .map(|(seq, i)| Interaction { seq: seq as u64, ..i })
        .collect();
    let cassette = Cassette {
        name: "test".into(),
        recorded_at: Utc::now(),
        commit: "test".into(),
        interactions,
    };
    let path = dir.join("command_line.cassette.yaml");
    std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    path
}

#[test]
fn plain_happy_path_creates_file() {
    let dir = scratch("plain");
    let cassette =
        write_cassette(&dir, vec![convert(&["-size", "100x50", "xc:red"], png_output(100, 50))]);
    let out = dir.join("swatch.png");

    cmd(&cassette)
        .args(["plain", "100", "50", "red", "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));

    assert_eq!(image::image_dimensions(&out).unwrap(), (100, 50));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn spaced_color_function_reaches_tool_intact() {
    let dir = scratch("spaced_color");
    let cassette = write_cassette(
        &dir,
        vec![convert(&["-size", "2x2", "xc:rgb(0, 0, 255)"], png_output(2, 2))],
    );
    let out = dir.join("blue.png");

    cmd(&cassette)
        .args(["plain", "2", "2", "rgb(0, 0, 255)", "-o", out.to_str().unwrap()])
        .assert()
        .success();

    assert!(out.exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn default_output_uses_suggested_name() {
    let dir = scratch("suggested");
    let cassette =
        write_cassette(&dir, vec![convert(&["-size", "8x8", "plasma:fractal"], png_output(8, 8))]);

    cmd(&cassette)
        .args(["plasma", "8", "8"])
        .current_dir(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved: plasma.png"));

    assert!(dir.join("plasma.png").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn text_without_padding_renders_once() {
    let dir = scratch("text_once");
    // No identify interaction: a measurement call would exhaust the cassette.
    let cassette = write_cassette(&dir, vec![convert(&label_hi("20"), png_output(18, 23))]);
    let out = dir.join("label.png");

    cmd(&cassette)
        .args(["text", "Hi", "-s", "fontSize=20", "-o", out.to_str().unwrap()])
        .assert()
        .success();

    assert_eq!(image::image_dimensions(&out).unwrap(), (18, 23));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn text_with_padding_measures_and_rerenders() {
    let dir = scratch("text_padded");
    let cassette = write_cassette(
        &dir,
        vec![
            convert(&label_hi("20"), png_output(40, 15)),
            identify(40, 15),
            convert(
                &[
                    "-gravity",
                    "NorthWest",
                    "-antialias",
                    "-pointsize",
                    "20",
                    "-size",
                    "50x25",
                    "xc:none",
                    "-annotate",
                    "0x0+5+5",
                    "Hi",
                ],
                png_output(50, 25),
            ),
        ],
    );
    let out = dir.join("padded.png");

    cmd(&cassette)
        .args(["text", "Hi", "-s", "font_size=20", "-s", "padding=5", "-o", out.to_str().unwrap()])
        .assert()
        .success();

    assert_eq!(image::image_dimensions(&out).unwrap(), (50, 25));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn text_padding_without_measurement_fails() {
    let dir = scratch("text_no_identify");
    // Only the first pass was recorded, so the measurement step cannot be served.
    let cassette = write_cassette(&dir, vec![convert(&label_hi("12"), png_output(10, 10))]);

    cmd(&cassette)
        .args(["text", "Hi", "-s", "padding=0", "-o", dir.join("x.png").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no interactions recorded"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn different_arguments_fail_replay() {
    let dir = scratch("mismatch");
    let cassette =
        write_cassette(&dir, vec![convert(&["-size", "4x4", "xc:red"], png_output(4, 4))]);

    cmd(&cassette)
        .args(["plain", "4", "4", "blue", "-o", dir.join("x.png").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("differ from the cassette"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn recorded_tool_failure_is_reported() {
    let dir = scratch("recorded_failure");
    let cassette = write_cassette(
        &dir,
        vec![convert(
            &["-size", "4x4", "xc:red"],
            json!({ "Err": "convert: unable to open image 'xc:red'" }),
        )],
    );

    cmd(&cassette)
        .args(["plain", "4", "4", "red", "-o", dir.join("x.png").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to open image"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn output_extension_reencodes() {
    let dir = scratch("reencode");
    let cassette =
        write_cassette(&dir, vec![convert(&["-size", "3x2", "xc:blue"], png_output(3, 2))]);
    let out = dir.join("swatch.bmp");

    cmd(&cassette)
        .args(["plain", "3", "2", "blue", "-o", out.to_str().unwrap()])
        .assert()
        .success();

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..2], b"BM", "Output should be a BMP file");
    let _ = std::fs::remove_dir_all(&dir);
}
