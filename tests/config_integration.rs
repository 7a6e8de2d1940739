use tandem::config::{ConfigFlags, ViewModeArg, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tandemrc");
    let content = r#"
# comment
--no-sync

--view split

--word-goal=750
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.no_sync);
    assert_eq!(flags.view, Some(ViewModeArg::Split));
    assert_eq!(flags.word_goal, Some(750));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tandemrc");
    let content = "--outline\n--view edit\n--word-goal 250\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "tandem".to_string(),
        "--view".to_string(),
        "preview".to_string(),
        "--no-autosave".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.outline, "file flags should remain enabled");
    assert!(effective.no_autosave, "cli flags should be applied");
    assert_eq!(
        effective.view,
        Some(ViewModeArg::Preview),
        "cli should override view mode"
    );
    assert_eq!(
        effective.word_goal,
        Some(250),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "tandem".to_string(),
        "--view=preview".to_string(),
        "--word-goal=1000".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.view, Some(ViewModeArg::Preview));
    assert_eq!(flags.word_goal, Some(1000));
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        outline: true,
        no_sync: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        sync: true,
        no_autosave: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.outline);
    assert!(merged.no_sync);
    assert!(merged.sync);
    assert!(merged.no_autosave);
}
