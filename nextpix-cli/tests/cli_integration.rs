use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use std::path::Path;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn nextpix_cmd() -> Command {
    let mut cmd = Command::cargo_bin("nextpix").expect("Failed to find nextpix binary");
    cmd.env("NO_COLOR", "1").env_remove("NEXTPIX_EXIFTOOL");
    cmd
}

fn write_image(dir: &Path, name: &str) -> Result<(), Box<dyn Error>> {
    std::fs::write(dir.join(name), vec![0u8; 4096])?;
    Ok(())
}

// Stand-in for cjxl: answers --version, fails for bad.png,
// otherwise writes a small output file at its second argument.
#[cfg(unix)]
fn fake_cjxl(dir: &Path) -> Result<std::path::PathBuf, Box<dyn Error>> {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-cjxl");
    std::fs::write(
        &script,
        "#!/bin/sh\n\
         if [ \"$1\" = \"--version\" ]; then echo \"fake cjxl v0.0\"; exit 0; fi\n\
         case \"$1\" in */bad.png) echo \"invalid quality\" >&2; exit 1;; esac\n\
         printf 'jxl-data' > \"$2\"\n",
    )?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
    Ok(script)
}

#[test]
fn test_help_lists_subcommands() -> Result<(), Box<dyn Error>> {
    nextpix_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            contains("avif-ffmpeg")
                .and(contains("heif"))
                .and(contains("jxl"))
                .and(contains("check")),
        );
    Ok(())
}

#[test]
fn test_out_of_range_quality_is_rejected() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    write_image(input_dir.path(), "a.png")?;

    nextpix_cmd()
        .arg("avif")
        .arg(input_dir.path())
        .arg("--quality")
        .arg("120")
        .assert()
        .code(1)
        .stderr(contains("Invalid parameter 'quality'"));
    Ok(())
}

#[test]
fn test_unparseable_value_is_a_clap_error() -> Result<(), Box<dyn Error>> {
    nextpix_cmd()
        .args(["avif-ffmpeg", "a.png", "--speed", "warp"])
        .assert()
        .failure()
        .stderr(contains("invalid value 'warp'"));
    Ok(())
}

#[test]
fn test_missing_encoder_fails_before_batch() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    write_image(input_dir.path(), "a.png")?;

    nextpix_cmd()
        .arg("jxl")
        .arg(input_dir.path())
        .arg("--encoder-path")
        .arg("/surely/not/here/cjxl")
        .arg("--no-metadata")
        .assert()
        .code(1)
        .stderr(contains("Required tool not found"));
    Ok(())
}

#[test]
fn test_empty_input_directory_is_not_an_error() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    std::fs::write(input_dir.path().join("notes.txt"), "not an image")?;

    nextpix_cmd()
        .arg("heif")
        .arg(input_dir.path())
        .arg("--encoder-path")
        .arg("/surely/not/here/heif-enc")
        .assert()
        .success()
        .stderr(contains("No processable images"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_batch_with_fake_encoder_reports_failures() -> Result<(), Box<dyn Error>> {
    let tools = tempdir()?;
    let input_dir = tempdir()?;
    let log_dir = tempdir()?;
    write_image(input_dir.path(), "bad.png")?;
    write_image(input_dir.path(), "good.png")?;
    let encoder = fake_cjxl(tools.path())?;

    nextpix_cmd()
        .arg("jxl")
        .arg(input_dir.path())
        .arg("--encoder-path")
        .arg(&encoder)
        .arg("--no-metadata")
        .arg("--log-dir")
        .arg(log_dir.path())
        .assert()
        .code(2)
        .stdout(
            contains("bad.png: encoding failed: invalid quality")
                .and(contains("good.png: converted"))
                .and(contains("Converted:"))
                .and(contains("First failure: bad.png: invalid quality")),
        );

    assert_eq!(std::fs::read(input_dir.path().join("good.jxl"))?, b"jxl-data");
    assert!(!input_dir.path().join("bad.jxl").exists());

    let logs: Vec<_> = std::fs::read_dir(log_dir.path())?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].starts_with("nextpix_") && logs[0].ends_with(".log"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_json_output_streams_events() -> Result<(), Box<dyn Error>> {
    let tools = tempdir()?;
    let input_dir = tempdir()?;
    write_image(input_dir.path(), "one.png")?;
    write_image(input_dir.path(), "two.jpg")?;
    let encoder = fake_cjxl(tools.path())?;

    let output = nextpix_cmd()
        .arg("jxl")
        .arg(input_dir.path())
        .arg("--encoder-path")
        .arg(&encoder)
        .arg("--no-metadata")
        .arg("--json")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    // Two files: status, file_log and progress each, plus the summary.
    assert_eq!(lines.len(), 7);
    assert!(lines.iter().all(|l| l.starts_with('{') && l.contains("\"timestamp\"")));
    assert!(lines[2].contains("\"type\":\"progress\"") && lines[2].contains("\"percent\":50"));
    assert!(lines[5].contains("\"percent\":100"));
    assert!(lines[6].contains("\"type\":\"summary\"") && lines[6].contains("\"success_count\":2"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_check_uses_configured_encoder() -> Result<(), Box<dyn Error>> {
    let tools = tempdir()?;
    let encoder = fake_cjxl(tools.path())?;

    nextpix_cmd()
        .arg("check")
        .env("NEXTPIX_CJXL", &encoder)
        .assert()
        .success()
        .stdout(contains("fake cjxl v0.0"));
    Ok(())
}
