use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tabwire_core::hash::schema_fingerprint;
use tabwire_core::{table, to_vec, Entry};
use tempfile::tempdir;

table! {
    #[derive(Debug, Default)]
    struct Profile: "Profile" {
        a: Entry<i32, 0>,
        b: Entry<String, 1>,
        c: Entry<bool, 2>,
    }
}

fn cli_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tabwire"))
}

#[test]
fn fingerprint_prints_hex() {
    cli_cmd()
        .args(["fingerprint", "Profile"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{:#018x}", schema_fingerprint("Profile"))));
}

#[test]
fn inspect_with_schema() {
    let tmp = tempdir().expect("tempdir");
    let mut p = Profile::default();
    p.a.set(7);
    p.b.set("hi".into());
    p.c.set(true);
    let data = tmp.path().join("profile.bin");
    fs::write(&data, to_vec(&p).unwrap()).unwrap();

    // newer schema: b retired, c unknown to it
    let schema = tmp.path().join("schema.json");
    fs::write(
        &schema,
        r#"{"name":"Profile","entries":[{"id":0,"name":"a"},{"id":1,"name":"b","deleted":true}]}"#,
    )
    .unwrap();

    cli_cmd()
        .args(["inspect", data.to_str().unwrap(), "--schema", schema.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("entries 3"))
        .stdout(predicate::str::contains("id=0 a size=1 data=07"))
        .stdout(predicate::str::contains("b (deleted)"))
        .stdout(predicate::str::contains("id=2 (unknown)"));

    cli_cmd()
        .args(["inspect", data.to_str().unwrap(), "--schema", schema.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"unknown\""))
        .stdout(predicate::str::contains("\"data\": \"bd026869\""));
}

#[test]
fn inspect_rejects_other_schema() {
    let tmp = tempdir().expect("tempdir");
    let data = tmp.path().join("profile.bin");
    fs::write(&data, to_vec(&Profile::default()).unwrap()).unwrap();
    let schema = tmp.path().join("schema.json");
    fs::write(&schema, r#"{"name":"Account"}"#).unwrap();

    cli_cmd()
        .args(["inspect", data.to_str().unwrap(), "--schema", schema.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match schema"));
}

#[test]
fn inspect_rejects_garbage() {
    let tmp = tempdir().expect("tempdir");
    let data = tmp.path().join("junk.bin");
    fs::write(&data, [0xbd, 0x01, 0x02]).unwrap();

    cli_cmd()
        .args(["inspect", data.to_str().unwrap()])
        .assert()
        .failure();
}
