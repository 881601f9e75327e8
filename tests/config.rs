use pq_outline::Outliner;
use pq_outline::config;
use pq_outline::report::OutputFormat;
use std::fs;

#[test]
fn config_is_discovered_from_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("queries/sales");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        dir.path().join(config::DEFAULT_CONFIG_FILE_NAME),
        "[output]\nindent_width = 4\nformat = \"json\"\n",
    )
    .unwrap();

    let (path, cfg) = config::load_config(None, &nested)
        .expect("config should load")
        .expect("config should be found");
    assert_eq!(path, dir.path().join("pq-outline.toml"));
    assert_eq!(cfg.output.indent_width, 4);
    assert_eq!(cfg.output.format, OutputFormat::Json);

    let outliner = Outliner::from_source(include_str!("fixtures/nested_let.json"))
        .unwrap()
        .with_indent_width(cfg.output.indent_width)
        .unwrap();
    assert!(outliner.format_query_steps().contains("\n    In\n"));
}

#[test]
fn explicit_config_path_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let explicit = dir.path().join("custom.toml");
    fs::write(&explicit, "[output]\ndeny_unhandled = true\n").unwrap();

    let (path, cfg) = config::load_config(Some(&explicit), dir.path())
        .unwrap()
        .unwrap();
    assert_eq!(path, explicit);
    assert!(cfg.output.deny_unhandled);
    assert_eq!(cfg.output.indent_width, 2);
}

#[test]
fn out_of_range_indent_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(config::DEFAULT_CONFIG_FILE_NAME);
    fs::write(&path, "[output]\nindent_width = 0\n").unwrap();

    let err = config::load_config_file(&path).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("indent_width must be between 1 and 8"), "{msg}");
}

#[test]
fn unknown_format_fails_to_parse() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(config::DEFAULT_CONFIG_FILE_NAME);
    fs::write(&path, "[output]\nformat = \"yaml\"\n").unwrap();

    assert!(config::load_config_file(&path).is_err());
}
