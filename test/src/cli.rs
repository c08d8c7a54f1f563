use std::io::Write;

use crate::data::SIMPLE_ROUTER;
use crate::test_logger;
use clap::Parser;
use p4info_cli::Opts;

fn fixture(contents: &str) -> Result<tempfile::NamedTempFile, anyhow::Error> {
    let mut f = tempfile::NamedTempFile::new()?;
    f.write_all(contents.as_bytes())?;
    Ok(f)
}

#[test]
fn summary_and_listings() -> Result<(), anyhow::Error> {
    colored::control::set_override(false);

    let f = fixture(SIMPLE_ROUTER)?;
    let path = f.path().to_string_lossy().to_string();
    let opts = Opts::try_parse_from([
        "p4info",
        "--show-fields",
        "--show-tables",
        path.as_str(),
    ])?;

    let pi = p4info_cli::process_file(&opts, &test_logger())?;
    let out = p4info_cli::render(&pi, &opts)?;

    assert!(out.starts_with("actions 7\nfields 23\ntables 3\n"));
    assert!(out.contains("0x04000016 ipv4.dstAddr: bit<32>"));
    assert!(out.contains("key ipv4.dstAddr lpm bit<32>"));
    assert!(out.contains("action rewrite_mac\n"));
    // actions were not asked for
    assert!(!out.contains("0x03000200"));

    Ok(())
}

#[test]
fn json_output_round_trips_through_serde() -> Result<(), anyhow::Error> {
    let f = fixture(SIMPLE_ROUTER)?;
    let path = f.path().to_string_lossy().to_string();
    let opts = Opts::try_parse_from(["p4info", "--json", path.as_str()])?;

    let pi = p4info_cli::process_file(&opts, &test_logger())?;
    let out = p4info_cli::render(&pi, &opts)?;
    let v: serde_json::Value = serde_json::from_str(&out)?;

    assert_eq!(v["actions"].as_array().map(Vec::len), Some(7));
    assert_eq!(v["fields"].as_array().map(Vec::len), Some(23));
    assert_eq!(v["tables"][2]["name"], "send_frame");

    Ok(())
}

#[test]
fn name_capacity_option() -> Result<(), anyhow::Error> {
    let f = fixture(SIMPLE_ROUTER)?;
    let path = f.path().to_string_lossy().to_string();
    // "standard_metadata.instance_type" is 31 bytes
    let opts = Opts::try_parse_from([
        "p4info",
        "--name-capacity",
        "31",
        path.as_str(),
    ])?;
    assert_eq!(opts.name_capacity, 31);

    let e = p4info_cli::process_file(&opts, &test_logger()).unwrap_err();
    assert!(e.to_string().contains("standard_metadata.instance_type"));

    Ok(())
}

#[test]
fn errors_name_the_file() -> Result<(), anyhow::Error> {
    let f = fixture("{\"actions\": [{\"name\": \"a\"}]}")?;
    let path = f.path().to_string_lossy().to_string();
    let opts = Opts::try_parse_from(["p4info", path.as_str()])?;

    let e = p4info_cli::process_file(&opts, &test_logger()).unwrap_err();
    let msg = e.to_string();
    assert!(msg.starts_with(&path));
    assert!(msg.contains("`runtime_data` is missing"));

    let opts = Opts::try_parse_from(["p4info", "/nonexistent/prog.json"])?;
    let e = p4info_cli::process_file(&opts, &test_logger()).unwrap_err();
    assert!(e.to_string().starts_with("read input: /nonexistent/prog.json"));

    Ok(())
}
