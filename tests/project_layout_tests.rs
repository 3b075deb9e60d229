//! Tests that depend on the process working directory (project-local
//! `.kaidan/` layout). Serialized because cwd is process-global.

use serial_test::serial;
use std::fs;

use kaidan::paths::PROMPTS_DIR;
use kaidan::prompts::{all_bundled_prompts, load_prompt, STORY};

#[test]
#[serial]
fn load_prompt_falls_back_to_bundled_copy() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::env::set_current_dir(tmp.path()).unwrap();

    // No .kaidan/ here at all.
    let content = load_prompt("story").unwrap();
    assert_eq!(content, STORY);
}

#[test]
#[serial]
fn load_prompt_prefers_project_override() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::env::set_current_dir(tmp.path()).unwrap();

    fs::create_dir_all(PROMPTS_DIR).unwrap();
    fs::write(
        format!("{}/story.md", PROMPTS_DIR),
        "custom prompt: {{ word }}",
    )
    .unwrap();

    let content = load_prompt("story").unwrap();
    assert_eq!(content, "custom prompt: {{ word }}");
}

#[test]
#[serial]
fn unknown_prompt_errors_even_with_project_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::env::set_current_dir(tmp.path()).unwrap();
    fs::create_dir_all(PROMPTS_DIR).unwrap();

    assert!(load_prompt("does-not-exist").is_err());
}

#[test]
#[serial]
fn bundled_prompts_install_cleanly() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::env::set_current_dir(tmp.path()).unwrap();
    fs::create_dir_all(PROMPTS_DIR).unwrap();

    for prompt in all_bundled_prompts() {
        let path = format!("{}/{}.md", PROMPTS_DIR, prompt.name);
        fs::write(&path, prompt.content).unwrap();
        assert_eq!(load_prompt(prompt.name).unwrap(), prompt.content);
    }
}
