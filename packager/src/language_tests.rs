//! Unit tests for localisation folder consolidation.

use super::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;

/// A build root laid out as `<root>/bin/out`, with `out` as the output dir.
struct BuildTree {
    _temp_dir: TempDir,
    parent: Utf8PathBuf,
    output: Utf8PathBuf,
}

impl BuildTree {
    fn write(&self, relative: &str, contents: &str) {
        let path = self.parent.join(relative);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("mkdir");
        fs::write(&path, contents).expect("write file");
    }

    fn consolidate(&self, languages: &[LanguageCode]) -> ConsolidationReport {
        LanguageConsolidator::new(&self.output, "Lang", languages)
            .consolidate()
            .expect("consolidation succeeds")
    }
}

#[fixture]
fn tree() -> BuildTree {
    let temp_dir = TempDir::new().expect("temp dir creation succeeds");
    let parent = Utf8PathBuf::try_from(temp_dir.path().join("bin")).expect("utf-8 temp path");
    let output = parent.join("out");
    fs::create_dir_all(&output).expect("mkdir output");
    BuildTree {
        _temp_dir: temp_dir,
        parent,
        output,
    }
}

fn languages(codes: &[&str]) -> Vec<LanguageCode> {
    codes.iter().copied().map(LanguageCode::from).collect()
}

#[rstest]
fn moves_files_from_top_level_language_folder(tree: BuildTree) {
    tree.write("out/fr/DS4Windows.resources.dll", "fr");

    let report = tree.consolidate(&languages(&["fr"]));

    assert!(tree.output.join("Lang/fr/DS4Windows.resources.dll").is_file());
    assert!(!tree.output.join("fr").exists());
    assert_eq!(report.moved.get(&LanguageCode::from("fr")), Some(&1));
    assert_eq!(report.removed_dirs, vec![tree.output.join("fr")]);
}

#[rstest]
#[case::nested_in_output("out/runtimes/win/lib/ja/a.dll")]
#[case::beside_output("ja/a.dll")]
#[case::nested_beside_output("publish/ja/a.dll")]
fn finds_language_folders_at_any_depth(tree: BuildTree, #[case] relative: &str) {
    tree.write(relative, "ja");

    tree.consolidate(&languages(&["ja"]));

    assert!(tree.output.join("Lang/ja/a.dll").is_file());
    let source_dir = tree.parent.join(relative);
    assert!(!source_dir.parent().expect("parent").exists());
}

#[rstest]
fn merges_multiple_folders_into_one_destination(tree: BuildTree) {
    tree.write("out/de/a.dll", "a");
    tree.write("out/plugins/de/b.dll", "b");
    tree.write("de/c.dll", "c");

    let report = tree.consolidate(&languages(&["de"]));

    for name in ["a.dll", "b.dll", "c.dll"] {
        assert!(tree.output.join("Lang/de").join(name).is_file(), "{name} missing");
    }
    assert_eq!(report.total_moved(), 3);
}

#[rstest]
fn leaves_unknown_language_folders_untouched(tree: BuildTree) {
    tree.write("out/xx/a.dll", "xx");
    tree.write("out/FR/b.dll", "upper-case is a different folder");

    let report = tree.consolidate(&languages(&["fr"]));

    assert!(tree.output.join("xx/a.dll").is_file());
    assert!(tree.output.join("FR/b.dll").is_file());
    assert!(!tree.output.join("Lang/xx").exists());
    assert_eq!(report.total_moved(), 0);
}

#[rstest]
fn keeps_folder_with_subdirectories(tree: BuildTree) {
    tree.write("out/it/a.dll", "a");
    tree.write("out/it/extra/b.dll", "b");

    let report = tree.consolidate(&languages(&["it"]));

    assert!(tree.output.join("Lang/it/a.dll").is_file());
    assert!(tree.output.join("it/extra/b.dll").is_file());
    assert!(!tree.output.join("Lang/it/extra").exists());
    assert_eq!(report.retained_dirs, vec![tree.output.join("it")]);
}

#[rstest]
fn existing_lang_folder_is_not_treated_as_a_source(tree: BuildTree) {
    tree.write("out/Lang/es/old.dll", "old");
    tree.write("out/es/new.dll", "new");

    let report = tree.consolidate(&languages(&["es"]));

    assert!(tree.output.join("Lang/es/old.dll").is_file());
    assert!(tree.output.join("Lang/es/new.dll").is_file());
    assert!(report.retained_dirs.is_empty());
    assert_eq!(report.total_moved(), 1);
}

#[rstest]
fn second_pass_is_a_no_op(tree: BuildTree) {
    tree.write("out/pt-BR/a.dll", "a");
    tree.consolidate(&languages(&["pt-BR"]));

    let report = tree.consolidate(&languages(&["pt-BR"]));

    assert_eq!(report.total_moved(), 0);
    assert!(tree.output.join("Lang/pt-BR/a.dll").is_file());
}

#[rstest]
fn creates_lang_dir_even_without_matches(tree: BuildTree) {
    tree.consolidate(&languages(&["fr"]));
    assert!(tree.output.join("Lang").is_dir());
}

#[rstest]
fn replaces_existing_file_with_same_name(tree: BuildTree) {
    tree.write("out/Lang/cs/a.dll", "stale");
    tree.write("out/cs/a.dll", "fresh");

    tree.consolidate(&languages(&["cs"]));

    let contents = fs::read_to_string(tree.output.join("Lang/cs/a.dll")).expect("read");
    assert_eq!(contents, "fresh");
}

#[rstest]
fn search_roots_are_output_then_parent(tree: BuildTree) {
    let codes = languages(&["fr"]);
    let consolidator = LanguageConsolidator::new(&tree.output, "Lang", &codes);
    assert_eq!(
        consolidator.search_roots(),
        vec![tree.output.as_path(), tree.parent.as_path()]
    );
    assert_eq!(consolidator.lang_dir(), tree.output.join("Lang"));
}

#[rstest]
fn find_named_dirs_ignores_files_and_root(tree: BuildTree) {
    tree.write("out/vi", "a file, not a folder");
    tree.write("out/sub/vi/a.dll", "a");

    let found = find_named_dirs(&tree.output, "vi");
    assert_eq!(found, vec![tree.output.join("sub/vi")]);

    let root_named = find_named_dirs(&tree.output.join("sub/vi"), "vi");
    assert!(root_named.is_empty());
}

#[cfg(unix)]
#[rstest]
fn find_named_dirs_does_not_follow_symlinks(tree: BuildTree) {
    tree.write("elsewhere/tr/a.dll", "a");
    std::os::unix::fs::symlink(tree.parent.join("elsewhere"), tree.output.join("link"))
        .expect("symlink");

    let found = find_named_dirs(&tree.output, "tr");
    assert!(found.is_empty());
}

#[cfg(unix)]
#[rstest]
fn non_utf8_sibling_folders_are_skipped(tree: BuildTree) {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let junk = OsStr::from_bytes(b"junk\xFF");
    fs::create_dir(tree.parent.as_std_path().join(junk)).expect("mkdir non-utf-8 folder");
    fs::create_dir(tree.output.as_std_path().join(junk)).expect("mkdir non-utf-8 folder");
    tree.write("out/fr/a.dll", "fr");
    tree.write("de/b.dll", "de");

    let report = tree.consolidate(&languages(&["fr", "de"]));

    assert!(tree.output.join("Lang/fr/a.dll").is_file());
    assert!(tree.output.join("Lang/de/b.dll").is_file());
    assert_eq!(report.moved.get(&LanguageCode::from("fr")), Some(&1));
    assert!(tree.parent.as_std_path().join(junk).is_dir());
}

#[cfg(unix)]
#[rstest]
fn find_named_dirs_skips_unreadable_directories(tree: BuildTree) {
    use std::os::unix::fs::PermissionsExt;

    tree.write("locked/vi/a.dll", "a");
    tree.write("open/vi/b.dll", "b");
    let locked = tree.parent.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
    let readable = fs::read_dir(&locked).is_ok();

    let found = find_named_dirs(&tree.parent, "vi");

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod back");
    assert!(found.contains(&tree.parent.join("open/vi")));
    // Privileged runs can still read the locked folder.
    if !readable {
        assert_eq!(found, vec![tree.parent.join("open/vi")]);
    }
}

#[rstest]
fn move_file_reports_missing_source(tree: BuildTree) {
    let err = move_file(&tree.output.join("missing.dll"), &tree.output.join("x.dll"))
        .expect_err("missing source");
    assert!(matches!(err, PackagerError::LanguageMove { .. }));
}

#[rstest]
fn excluded_trees_are_skipped(tree: BuildTree) {
    tree.write("DS4Windows/Lang/fr/stale.dll", "stale");
    tree.write("out/fr/fresh.dll", "fresh");
    let codes = languages(&["fr"]);

    let report = LanguageConsolidator::new(&tree.output, "Lang", &codes)
        .excluding(tree.parent.join("DS4Windows"))
        .consolidate()
        .expect("consolidation succeeds");

    assert_eq!(report.total_moved(), 1);
    assert!(!tree.output.join("Lang/fr/stale.dll").exists());
    assert!(tree.parent.join("DS4Windows/Lang/fr/stale.dll").is_file());
}
