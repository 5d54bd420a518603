use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[test]
fn build_writes_site_model() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let vault = dir.path().join("notes");
    fs::create_dir_all(vault.join("blog"))?;

    fs::write(
        dir.path().join("nodig.yml"),
        r#"
paths:
  vault: "notes"
  output: "public"
backlink_keys: slug
plugins: [trace]
"#,
    )?;
    fs::write(
        vault.join("index.md"),
        "---\ntitle: Home\n---\nRead [[Blog/First Post]] #start\n",
    )?;
    fs::write(vault.join("blog/first-post.md"), "Back [[index|home]]\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("nodig")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 2 pages"));

    let out = dir.path().join("public");
    let pages: Value = serde_json::from_str(&fs::read_to_string(out.join("pages.json"))?)?;
    assert_eq!(pages[0]["url"], "/blog/first-post");
    assert_eq!(pages[1]["url"], "/");
    assert_eq!(pages[1]["frontmatter"]["title"], "Home");

    let backlinks: Value = serde_json::from_str(&fs::read_to_string(out.join("backlinks.json"))?)?;
    assert_eq!(backlinks["blog/first-post"][0], "index.md");

    let tags: Value = serde_json::from_str(&fs::read_to_string(out.join("tags.json"))?)?;
    assert_eq!(tags["start"][0], "/");

    assert!(out.join("navigation.json").exists());
    Ok(())
}

#[test]
fn build_overrides_paths_without_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let vault = dir.path().join("vault");
    fs::create_dir_all(&vault)?;
    fs::write(vault.join("note.md"), "Just text")?;

    #[allow(deprecated)]
    Command::cargo_bin("nodig")?
        .current_dir(dir.path())
        .args(["build", "--vault", "vault", "--output", "out"])
        .assert()
        .success();

    assert!(dir.path().join("out/pages.json").exists());
    Ok(())
}

#[test]
fn overrides_resolve_against_working_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("conf"))?;
    fs::write(
        dir.path().join("conf/nodig.yml"),
        "paths:\n  vault: \"elsewhere\"\n  output: \"site\"\n",
    )?;
    fs::create_dir_all(dir.path().join("v"))?;
    fs::write(dir.path().join("v/note.md"), "From the working directory")?;

    #[allow(deprecated)]
    Command::cargo_bin("nodig")?
        .current_dir(dir.path())
        .args(["--config", "conf/nodig.yml", "build", "--vault", "v", "--output", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 1 pages"));

    assert!(dir.path().join("out/pages.json").exists());
    assert!(!dir.path().join("conf/out").exists());
    assert!(!dir.path().join("conf/site").exists());
    Ok(())
}

#[test]
fn build_rejects_unknown_plugin() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("nodig.yml"), "plugins: [nonexistent]\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("nodig")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown plugin: nonexistent"));
    Ok(())
}

#[test]
fn build_fails_on_missing_vault() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    #[allow(deprecated)]
    Command::cargo_bin("nodig")?
        .current_dir(dir.path())
        .args(["build", "--vault", "missing"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn transform_prints_json() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("page.md");
    fs::write(
        &file,
        "---\ntitle: Test\ntags: [a, b]\n---\nSee [[Other Page|there]] and ![[pic.png]]\n",
    )?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("nodig")?
        .current_dir(dir.path())
        .arg("transform")
        .arg(&file)
        .assert()
        .success();

    let json: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(json["frontmatter"]["title"], "Test");
    assert_eq!(json["frontmatter"]["tags"][1], "b");
    assert_eq!(
        json["content"],
        r#"See <a href="/other-page">there</a> and <img src="/picpng" alt="pic.png" />"#
    );
    Ok(())
}
