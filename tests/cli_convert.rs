//! Integration tests for the composer CLI
//!
//! These tests build small sprite fixtures in a temporary directory, run the
//! binary against them and inspect the resulting archives and exit codes.

use std::fs::{self, File};
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Rgba, RgbaImage};
use tempfile::TempDir;

const BACKDROP: Rgba<u8> = Rgba([255, 255, 255, 255]);
const OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);
const DARK: Rgba<u8> = Rgba([64, 32, 32, 255]);
const LIGHT: Rgba<u8> = Rgba([224, 192, 128, 255]);
const SHINY_DARK: Rgba<u8> = Rgba([32, 64, 128, 255]);
const SHINY_LIGHT: Rgba<u8> = Rgba([160, 224, 248, 255]);

fn composer() -> Command {
    Command::new(env!("CARGO_BIN_EXE_composer"))
}

/// 8x8 sprite: white backdrop, black outlined square, dark and light interior
fn sprite(dark: Rgba<u8>, light: Rgba<u8>) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(8, 8, BACKDROP);
    for i in 2..=5 {
        img.put_pixel(i, 2, OUTLINE);
        img.put_pixel(i, 5, OUTLINE);
        img.put_pixel(2, i, OUTLINE);
        img.put_pixel(5, i, OUTLINE);
    }
    img.put_pixel(3, 3, dark);
    img.put_pixel(4, 4, light);
    img.put_pixel(3, 4, dark);
    img.put_pixel(4, 3, light);
    img
}

fn write_gif(path: &Path, frames: &[(RgbaImage, u32)]) {
    let file = File::create(path).unwrap();
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite).unwrap();
    for (image, delay_ms) in frames {
        let frame = image::Frame::from_parts(
            image.clone(),
            0,
            0,
            Delay::from_numer_denom_ms(*delay_ms, 1),
        );
        encoder.encode_frame(frame).unwrap();
    }
}

struct Fixture {
    dir: TempDir,
    front: PathBuf,
    back: PathBuf,
    shiny: PathBuf,
}

impl Fixture {
    fn new(shiny: RgbaImage) -> Self {
        let dir = TempDir::new().unwrap();
        let front = dir.path().join("front.gif");
        let back = dir.path().join("back.png");
        let shiny_path = dir.path().join("shiny.png");

        write_gif(&front, &[(sprite(DARK, LIGHT), 100), (sprite(LIGHT, DARK), 150)]);
        sprite(DARK, LIGHT).save(&back).unwrap();
        shiny.save(&shiny_path).unwrap();

        Self { dir, front, back, shiny: shiny_path }
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn convert(&self, extra: &[&str]) -> Output {
        composer()
            .current_dir(self.dir.path())
            .arg("convert")
            .arg(&self.front)
            .arg(&self.back)
            .arg(&self.shiny)
            .arg("-o")
            .arg(self.out())
            .args(extra)
            .output()
            .expect("Failed to execute composer")
    }
}

fn read_member(archive: &Path, name: &str) -> Vec<u8> {
    let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut bytes = Vec::new();
    zip.by_name(name).unwrap().read_to_end(&mut bytes).unwrap();
    bytes
}

fn member_names(archive: &Path) -> Vec<String> {
    let zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut names: Vec<String> = zip.file_names().map(String::from).collect();
    names.sort();
    names
}

#[test]
fn test_convert_writes_both_archives() {
    let fixture = Fixture::new(sprite(SHINY_DARK, SHINY_LIGHT));
    let output = fixture.convert(&["--name", "mon", "--credits", "art by tester"]);

    assert!(
        output.status.success(),
        "exit code {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let modern = fixture.out().join("mon.zip");
    let legacy = fixture.out().join("mon-legacy.zip");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mon.zip"));
    assert!(stdout.contains("mon-legacy.zip"));

    assert_eq!(
        member_names(&modern),
        vec!["animation/0.png", "animation/1.png", "back.png", "data.json", "front.png"]
    );
    assert_eq!(
        member_names(&legacy),
        vec!["anim.asm", "back.png", "credits.txt", "front.png", "shiny.pal"]
    );

    let data: serde_json::Value = serde_json::from_slice(&read_member(&modern, "data.json")).unwrap();
    assert_eq!(data["animationFrameDurations"], serde_json::json!([100, 150]));
    assert_eq!(data["credits"], "art by tester");
    assert_eq!(data["palette"]["color1"], serde_json::json!(["#402020", "#204080"]));
    assert_eq!(data["palette"]["color2"], serde_json::json!(["#e0c080", "#a0e0f8"]));

    let asm = String::from_utf8(read_member(&legacy, "anim.asm")).unwrap();
    assert_eq!(asm, "\tframe 0, 06\n\tframe 1, 09\n\tendanim");

    let pal = String::from_utf8(read_member(&legacy, "shiny.pal")).unwrap();
    assert_eq!(pal, "\tRGB 20, 28, 31\n\tRGB 04, 08, 16\n");

    let credits = String::from_utf8(read_member(&legacy, "credits.txt")).unwrap();
    assert_eq!(credits, "art by tester");

    let front = image::load_from_memory(&read_member(&modern, "front.png")).unwrap().to_rgba8();
    assert_eq!(front.dimensions(), (8, 8));
    assert_eq!(front.get_pixel(0, 0)[3], 0, "backdrop should be transparent");
    assert_eq!(*front.get_pixel(3, 3), DARK);

    let strip = image::load_from_memory(&read_member(&legacy, "front.png")).unwrap().to_rgba8();
    assert_eq!(strip.dimensions(), (8, 16));
}

#[test]
fn test_convert_swap_exchanges_substitutes() {
    let fixture = Fixture::new(sprite(SHINY_DARK, SHINY_LIGHT));
    let output = fixture.convert(&["--name", "mon", "--swap", "--no-legacy"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let modern = fixture.out().join("mon.zip");
    assert!(!fixture.out().join("mon-legacy.zip").exists());

    let data: serde_json::Value = serde_json::from_slice(&read_member(&modern, "data.json")).unwrap();
    assert_eq!(data["palette"]["color1"], serde_json::json!(["#402020", "#a0e0f8"]));
    assert_eq!(data["palette"]["color2"], serde_json::json!(["#e0c080", "#204080"]));
}

#[test]
fn test_convert_reads_config_file() {
    let fixture = Fixture::new(sprite(SHINY_DARK, SHINY_LIGHT));
    fs::write(
        fixture.dir.path().join("composer.toml"),
        "[export]\nmodern = false\ncredits = \"from config\"\n",
    )
    .unwrap();

    let output = fixture.convert(&["--name", "mon"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    assert!(!fixture.out().join("mon.zip").exists());
    let legacy = fixture.out().join("mon-legacy.zip");
    assert_eq!(String::from_utf8(read_member(&legacy, "credits.txt")).unwrap(), "from config");
}

#[test]
fn test_black_and_white_shiny_fails() {
    let fixture = Fixture::new(sprite(OUTLINE, BACKDROP));
    let output = fixture.convert(&["--name", "mon"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
    assert!(!fixture.out().exists(), "no archive may be written on failure");
}

#[test]
fn test_dimension_mismatch_fails() {
    let fixture = Fixture::new(RgbaImage::from_pixel(9, 8, SHINY_DARK));
    let output = fixture.convert(&["--name", "mon"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("dimension mismatch"));
    assert!(!fixture.out().exists());
}

#[test]
fn test_missing_source_fails() {
    let fixture = Fixture::new(sprite(SHINY_DARK, SHINY_LIGHT));
    fs::remove_file(&fixture.back).unwrap();

    let output = fixture.convert(&["--name", "mon"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("back.png"));
}

#[test]
fn test_empty_name_is_invalid_args() {
    let fixture = Fixture::new(sprite(SHINY_DARK, SHINY_LIGHT));
    let output = fixture.convert(&["--name", "  "]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_config_is_invalid_args() {
    let fixture = Fixture::new(sprite(SHINY_DARK, SHINY_LIGHT));
    let config = fixture.dir.path().join("bad.toml");
    fs::write(&config, "[conversion]\ntolerance = 0\n").unwrap();

    let output = fixture.convert(&["--name", "mon", "--config", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("conversion.tolerance"));
}

#[test]
fn test_palette_command_json() {
    let fixture = Fixture::new(sprite(SHINY_DARK, SHINY_LIGHT));
    let output = composer()
        .arg("palette")
        .arg(&fixture.back)
        .arg(&fixture.shiny)
        .arg("--json")
        .output()
        .expect("Failed to execute composer");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let palette: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(palette["color1"], serde_json::json!(["#402020", "#204080"]));
    assert_eq!(palette["color2"], serde_json::json!(["#e0c080", "#a0e0f8"]));
}

#[test]
fn test_palette_command_text() {
    let fixture = Fixture::new(sprite(SHINY_DARK, SHINY_LIGHT));
    let output = composer()
        .arg("palette")
        .arg(&fixture.back)
        .arg(&fixture.shiny)
        .output()
        .expect("Failed to execute composer");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dark:  #402020 -> #204080"));
    assert!(stdout.contains("light: #e0c080 -> #a0e0f8"));
}
