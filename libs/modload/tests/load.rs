use modload::modfile;
use modload::{find_mod_file, Env, ModloadError, Module};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

fn env() -> Env {
    Env {
        version: "v1.1.0".to_string(),
        gop_root: PathBuf::from("/opt/gop"),
    }
}

fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

#[test]
fn gop_mod_wins_over_go_mod() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("go.mod"), "module a\n").unwrap();
    fs::write(dir.path().join("gop.mod"), "module a\n").unwrap();
    assert_eq!(find_mod_file(dir.path()).unwrap(), dir.path().join("gop.mod"));
}

#[test]
fn manifest_is_found_in_a_parent() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("cmd").join("tool");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join("go.mod"), "module a\n").unwrap();

    let module = Module::load(&nested).unwrap();
    assert_eq!(module.modfile(), dir.path().join("go.mod"));
    assert_eq!(module.file().module.as_ref().unwrap().path, "a");
}

#[test]
fn nearest_manifest_wins() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("sub");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join("gop.mod"), "module outer\n").unwrap();
    fs::write(nested.join("go.mod"), "module inner\n").unwrap();
    assert_eq!(find_mod_file(&nested).unwrap(), nested.join("go.mod"));
}

#[test]
fn missing_module_declaration() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("gop.mod"), "go 1.18\n").unwrap();
    let err = Module::load(dir.path()).unwrap_err();
    assert!(matches!(err, ModloadError::NoModDecl));
    assert_eq!(err.to_string(), "no module declaration in gop.mod (or go.mod)");
}

#[test]
fn malformed_manifest_names_file_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gop.mod");
    fs::write(&path, "module a\n\nrequire b\n").unwrap();
    let err = Module::load(dir.path()).unwrap_err();
    assert!(matches!(err, ModloadError::Parse(_)));
    assert_eq!(
        err.to_string(),
        format!("{}:3: usage: require module/path v1.2.3", path.display())
    );
}

#[test]
fn update_writes_companion_go_mod() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("gop.mod"),
        "module example.com/hello\n\ngo 1.18\n\nrequire github.com/qiniu/x v1.11.5\n",
    )
    .unwrap();

    let module = Module::load(dir.path()).unwrap();
    assert!(module.update_go_mod_with(&env(), false).unwrap());

    let go_mod = fs::read(dir.path().join("go.mod")).unwrap();
    assert_eq!(
        String::from_utf8(go_mod.clone()).unwrap(),
        "module example.com/hello\n\ngo 1.18\n\nrequire (\n\tgithub.com/qiniu/x v1.11.5\n\tgithub.com/goplus/gop v1.1.0\n)\n\nreplace github.com/goplus/gop => /opt/gop\n"
    );

    let parsed = modfile::parse("go.mod", &go_mod, None).unwrap();
    let gop: Vec<_> = parsed
        .require
        .iter()
        .filter(|r| r.module.path == "github.com/goplus/gop")
        .collect();
    assert_eq!(gop.len(), 1);
    assert_eq!(gop[0].module.version, "v1.1.0");
    assert_eq!(parsed.replace.len(), 1);
    assert_eq!(parsed.replace[0].new.path, "/opt/gop");

    // The loaded manifest is untouched.
    assert!(module.file().replace.is_empty());
}

#[test]
fn relative_gop_root_writes_a_readable_go_mod() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("gop.mod"), "module a\n").unwrap();
    let module = Module::load(dir.path()).unwrap();
    let env = Env {
        version: "v1.1.0".to_string(),
        gop_root: PathBuf::from("gop"),
    };
    assert!(module.update_go_mod_with(&env, false).unwrap());

    let go_mod = fs::read(dir.path().join("go.mod")).unwrap();
    let parsed = modfile::parse("go.mod", &go_mod, None).unwrap();
    assert_eq!(parsed.replace.len(), 1);
    assert_eq!(parsed.replace[0].new.path, "./gop");
    assert!(Module::load(dir.path()).is_ok());
}

#[test]
fn update_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("gop.mod"), "module a\n").unwrap();
    let module = Module::load(dir.path()).unwrap();
    module.update_go_mod_with(&env(), false).unwrap();
    let first = fs::read(dir.path().join("go.mod")).unwrap();
    module.update_go_mod_with(&env(), false).unwrap();
    assert_eq!(fs::read(dir.path().join("go.mod")).unwrap(), first);
}

#[test]
fn existing_requirement_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let src = "module a\n\nrequire github.com/goplus/gop v1.0.0\n";
    fs::write(dir.path().join("gop.mod"), src).unwrap();
    let module = Module::load(dir.path()).unwrap();
    module.update_go_mod_with(&env(), false).unwrap();

    let go_mod = fs::read_to_string(dir.path().join("go.mod")).unwrap();
    assert!(go_mod.contains("require github.com/goplus/gop v1.0.0\n"));
    assert!(!go_mod.contains("v1.1.0"));
}

#[test]
fn newer_go_mod_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let gop_mod = dir.path().join("gop.mod");
    let go_mod = dir.path().join("go.mod");
    fs::write(&gop_mod, "module a\n").unwrap();
    fs::write(&go_mod, "module stale\n").unwrap();
    let now = SystemTime::now();
    set_mtime(&gop_mod, now - Duration::from_secs(60));
    set_mtime(&go_mod, now);

    let module = Module::load(dir.path()).unwrap();
    assert!(!module.update_go_mod_with(&env(), true).unwrap());
    assert_eq!(fs::read_to_string(&go_mod).unwrap(), "module stale\n");

    assert!(module.update_go_mod_with(&env(), false).unwrap());
    assert!(fs::read_to_string(&go_mod).unwrap().starts_with("module a\n"));
}

#[test]
fn older_go_mod_is_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let gop_mod = dir.path().join("gop.mod");
    let go_mod = dir.path().join("go.mod");
    fs::write(&gop_mod, "module a\n").unwrap();
    fs::write(&go_mod, "module stale\n").unwrap();
    let now = SystemTime::now();
    set_mtime(&go_mod, now - Duration::from_secs(60));
    set_mtime(&gop_mod, now);

    let module = Module::load(dir.path()).unwrap();
    assert!(module.update_go_mod_with(&env(), true).unwrap());
    assert!(fs::read_to_string(&go_mod).unwrap().starts_with("module a\n"));
}

#[test]
fn go_mod_manifest_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let go_mod = dir.path().join("go.mod");
    fs::write(&go_mod, "module   a\n").unwrap();
    let module = Module::load(dir.path()).unwrap();
    assert!(!module.update_go_mod_with(&env(), false).unwrap());
    assert_eq!(fs::read_to_string(&go_mod).unwrap(), "module   a\n");
}

#[test]
fn no_manifest_anywhere() {
    let dir = tempfile::tempdir().unwrap();
    // A temp dir might sit below a directory holding a manifest.
    if find_mod_file(&dir.path().join("..")).is_ok() {
        return;
    }
    let err = Module::load(dir.path()).unwrap_err();
    assert!(matches!(err, ModloadError::NoModRoot));
}
