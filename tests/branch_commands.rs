use assert_fs::TempDir;
use kit::areas::refs::Head;
use kit::areas::repository::Repository;
use kit::artifacts::objects::object_type::ObjectType;
use kit::errors::KitError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

mod common;

use common::file::{FileSpec, read_file, write_file};
use common::{committed_repository, repository};

fn commit_change(dir: &TempDir, repository: &mut Repository, content: &str) -> kit::artifacts::objects::object_id::ObjectId {
    write_file(FileSpec::new(dir.path().join("1.txt"), content));
    repository.add(Path::new("1.txt")).unwrap();
    repository.commit(content).unwrap()
}

#[rstest]
fn branch_starts_at_head_without_moving_it(committed_repository: (TempDir, Repository)) {
    let (dir, repository) = committed_repository;
    let head = repository.head_commit().unwrap();

    let target = repository.branch("feature/login", None).unwrap();

    assert_eq!(target, head);
    assert_eq!(
        read_file(&dir.path().join(".kit/refs/heads/feature/login")),
        head.to_string()
    );
    assert_eq!(
        repository.refs().read_head().unwrap(),
        Head::Symbolic("master".to_string())
    );
}

#[rstest]
fn branch_can_start_from_an_older_commit(committed_repository: (TempDir, Repository)) {
    let (dir, mut repository) = committed_repository;
    let first = repository.head_commit().unwrap();
    commit_change(&dir, &mut repository, "changed");

    repository.branch("old", Some(first.as_ref())).unwrap();
    repository.branch("copy", Some("old")).unwrap();

    assert_eq!(repository.refs().branch_commit("old").unwrap(), first);
    assert_eq!(repository.refs().branch_commit("copy").unwrap(), first);
}

#[rstest]
fn duplicate_branches_are_rejected(committed_repository: (TempDir, Repository)) {
    let (_dir, repository) = committed_repository;
    repository.branch("topic", None).unwrap();

    assert!(matches!(
        repository.branch("topic", None),
        Err(KitError::BranchExists(name)) if name == "topic"
    ));
}

#[rstest]
#[case("bad..name")]
#[case("HEAD")]
#[case("trailing/")]
#[case("with space")]
fn invalid_branch_names_are_rejected(committed_repository: (TempDir, Repository), #[case] name: &str) {
    let (_dir, repository) = committed_repository;

    assert!(matches!(
        repository.branch(name, None),
        Err(KitError::InvalidRefName(_))
    ));
}

#[rstest]
fn branching_before_the_first_commit_fails(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;

    assert!(matches!(
        repository.branch("early", None),
        Err(KitError::UnknownRef(_))
    ));
}

#[rstest]
fn branching_from_a_tree_fails(committed_repository: (TempDir, Repository)) {
    let (_dir, repository) = committed_repository;
    let commit = repository
        .database()
        .parse_object_as_commit(&repository.head_commit().unwrap())
        .unwrap()
        .unwrap();

    assert!(matches!(
        repository.branch("tree", Some(commit.tree_oid().as_ref())),
        Err(KitError::UnknownRef(_))
    ));
}

#[rstest]
fn tag_records_an_annotated_object(committed_repository: (TempDir, Repository)) {
    let (dir, repository) = committed_repository;
    let head = repository.head_commit().unwrap();

    let tag_oid = repository.tag("v1.0", "first release", None).unwrap();

    assert_eq!(
        read_file(&dir.path().join(".kit/refs/tags/v1.0")),
        tag_oid.to_string()
    );
    let tag = repository
        .database()
        .parse_object_as_tag(&tag_oid)
        .unwrap()
        .unwrap();
    assert_eq!(tag.target(), &head);
    assert_eq!(tag.target_type(), ObjectType::Commit);
    assert_eq!(tag.name(), "v1.0");
    assert_eq!(tag.message(), "first release");
    assert_eq!(repository.peel_to_commit(&tag_oid).unwrap(), Some(head));
}

#[rstest]
fn tag_can_point_at_a_blob(committed_repository: (TempDir, Repository)) {
    let (_dir, repository) = committed_repository;
    let blob_oid = repository.index().get("1.txt").unwrap().oid.clone();

    let tag_oid = repository.tag("data", "raw blob", Some(blob_oid.as_ref())).unwrap();

    let tag = repository
        .database()
        .parse_object_as_tag(&tag_oid)
        .unwrap()
        .unwrap();
    assert_eq!(tag.target_type(), ObjectType::Blob);
    assert!(repository.peel_to_commit(&tag_oid).unwrap().is_none());
}

#[rstest]
fn duplicate_tags_are_rejected(committed_repository: (TempDir, Repository)) {
    let (_dir, repository) = committed_repository;
    repository.tag("v1", "one", None).unwrap();

    assert!(matches!(
        repository.tag("v1", "again", None),
        Err(KitError::TagExists(_))
    ));
}

#[rstest]
fn checkout_of_a_tag_detaches_head(committed_repository: (TempDir, Repository)) {
    let (dir, mut repository) = committed_repository;
    let tagged = repository.head_commit().unwrap();
    repository.tag("stable", "known good", None).unwrap();
    commit_change(&dir, &mut repository, "later");

    let head = repository.checkout("stable").unwrap();

    assert_eq!(head, Head::Detached(tagged.clone()));
    assert_eq!(read_file(&dir.path().join(".kit/HEAD")), tagged.to_string());
    assert_eq!(read_file(&dir.path().join("1.txt")), "one");
}

#[rstest]
fn checkout_switches_between_branches(committed_repository: (TempDir, Repository)) {
    let (dir, mut repository) = committed_repository;
    repository.branch("feature", None).unwrap();
    let head = repository.checkout("feature").unwrap();
    assert_eq!(head, Head::Symbolic("feature".to_string()));

    write_file(FileSpec::new(dir.path().join("feature.txt"), "feature only"));
    repository.add(Path::new("feature.txt")).unwrap();
    let feature_tip = repository.commit("feature work").unwrap();

    repository.checkout("master").unwrap();
    assert!(!dir.path().join("feature.txt").exists());
    assert_eq!(read_file(&dir.path().join("a/b/3.txt")), "three");

    repository.checkout("feature").unwrap();
    assert_eq!(read_file(&dir.path().join("feature.txt")), "feature only");
    assert_eq!(repository.head_commit().unwrap(), feature_tip);
    assert!(repository.status().unwrap().is_clean());
}

#[rstest]
fn checkout_removes_emptied_directories(committed_repository: (TempDir, Repository)) {
    let (dir, mut repository) = committed_repository;
    let first = repository.head_commit().unwrap();

    write_file(FileSpec::new(dir.path().join("extra/deep/file.txt"), "extra"));
    repository.add(Path::new("extra")).unwrap();
    repository.commit("extra").unwrap();

    repository.checkout(first.as_ref()).unwrap();

    assert!(!dir.path().join("extra").exists());
}

#[rstest]
fn checkout_refuses_when_a_tracked_file_became_a_directory(committed_repository: (TempDir, Repository)) {
    let (dir, mut repository) = committed_repository;
    repository.branch("feature", None).unwrap();
    std::fs::remove_file(dir.path().join("1.txt")).unwrap();
    write_file(FileSpec::new(dir.path().join("1.txt/inner.txt"), "untracked"));

    assert!(matches!(
        repository.checkout("feature"),
        Err(KitError::StaleDirectories(paths)) if paths == vec!["1.txt".to_string()]
    ));
    assert_eq!(
        repository.refs().read_head().unwrap(),
        Head::Symbolic("master".to_string())
    );
    assert_eq!(repository.index().entry_count(), 3);
    assert_eq!(read_file(&dir.path().join("1.txt/inner.txt")), "untracked");
}

#[cfg(unix)]
#[rstest]
fn checkout_restores_executables_and_symlinks(repository: (TempDir, Repository)) {
    use std::os::unix::fs::PermissionsExt;

    let (dir, mut repository) = repository;
    let script = dir.path().join("run.sh");
    write_file(FileSpec::new(script.clone(), "#!/bin/sh\necho hi\n"));
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    std::os::unix::fs::symlink("run.sh", dir.path().join("link")).unwrap();

    repository.add(dir.path()).unwrap();
    let snapshot = repository.commit("scripts").unwrap();

    std::fs::remove_file(&script).unwrap();
    std::fs::remove_file(dir.path().join("link")).unwrap();
    repository.checkout(snapshot.as_ref()).unwrap();

    let mode = std::fs::metadata(&script).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);
    assert_eq!(
        std::fs::read_link(dir.path().join("link")).unwrap(),
        Path::new("run.sh")
    );
}

#[rstest]
#[case("nowhere")]
#[case("0123456789abcdef0123456789abcdef01234567")]
fn checkout_of_an_unknown_ref_fails(committed_repository: (TempDir, Repository), #[case] target: &str) {
    let (_dir, mut repository) = committed_repository;

    assert!(matches!(
        repository.checkout(target),
        Err(KitError::UnknownRef(_))
    ));
    assert_eq!(
        repository.refs().read_head().unwrap(),
        Head::Symbolic("master".to_string())
    );
}

#[rstest]
fn log_decorates_commits_with_refs(committed_repository: (TempDir, Repository)) {
    let (dir, mut repository) = committed_repository;
    repository.branch("feature", None).unwrap();
    let second = commit_change(&dir, &mut repository, "second");
    repository.tag("v2", "second release", None).unwrap();

    let log = repository.log().unwrap();

    assert_eq!(log.len(), 2);
    assert_eq!(log[0].oid, second);
    assert_eq!(log[0].decorations, vec!["HEAD -> master", "tag: v2"]);
    assert_eq!(log[0].commit.short_message(), "second");
    assert_eq!(log[1].decorations, vec!["feature"]);
    assert_eq!(log[1].commit.short_message(), "Initial commit");
}

#[rstest]
fn log_of_a_detached_head_marks_head_alone(committed_repository: (TempDir, Repository)) {
    let (_dir, mut repository) = committed_repository;
    let head = repository.head_commit().unwrap();
    repository.checkout(head.as_ref()).unwrap();

    let log = repository.log().unwrap();

    assert_eq!(log[0].decorations, vec!["HEAD", "master"]);
}

#[rstest]
fn log_is_empty_before_the_first_commit(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;

    assert!(repository.log().unwrap().is_empty());
}
