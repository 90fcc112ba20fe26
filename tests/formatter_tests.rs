use std::io;

use rstest::rstest;
use telegram_log_hook::{HookLevel, LogEntry, format_message};

#[rstest]
#[case(HookLevel::Panic, "<b>PANIC</b>@app - hello")]
#[case(HookLevel::Fatal, "<b>FATAL</b>@app - hello")]
#[case(HookLevel::Error, "<b>ERROR</b>@app - hello")]
#[case(HookLevel::Warn, "@app - hello")]
#[case(HookLevel::Debug, "@app - hello")]
fn prefixes_alert_levels(#[case] level: HookLevel, #[case] expected_head: &str) {
    let out = format_message("app", &LogEntry::new(level, "hello")).expect("format");
    assert_eq!(out, format!("{expected_head}\n<pre>\n{{}}\n\n</pre>"));
}

#[test]
fn renders_walrus_example() {
    let entry = LogEntry::new(HookLevel::Error, "A walrus appears")
        .with_field("animal", "walrus")
        .with_field("number", 1)
        .with_field("size", 10);

    let out = format_message("testing", &entry).expect("format");

    let expected = concat!(
        "<b>ERROR</b>@testing - A walrus appears\n",
        "<pre>\n",
        "{\n",
        "\t\"animal\": \"walrus\",\n",
        "\t\"number\": 1,\n",
        "\t\"size\": 10\n",
        "}\n",
        "\n</pre>",
    );
    assert_eq!(out, expected);
}

#[test]
fn error_text_follows_message_directly() {
    let entry = LogEntry::new(HookLevel::Error, "sync failed")
        .with_error(io::Error::other("peer closed <stream>"));

    let out = format_message("app", &entry).expect("format");

    assert!(out.starts_with("<b>ERROR</b>@app - sync failed: peer closed <stream>\n<pre>\n"));
    assert!(out.contains("\t\"error\": \"peer closed \\u003cstream\\u003e\"\n"));
}

#[test]
fn nested_values_are_indented() {
    let entry = LogEntry::new(HookLevel::Error, "nested")
        .with_field("request", serde_json::json!({"id": 7, "tags": ["a"]}));

    let out = format_message("app", &entry).expect("format");

    let expected_json = concat!(
        "{\n",
        "\t\"request\": {\n",
        "\t\t\"id\": 7,\n",
        "\t\t\"tags\": [\n",
        "\t\t\t\"a\"\n",
        "\t\t]\n",
        "\t}\n",
        "}\n",
    );
    assert!(out.contains(expected_json), "output was {out}");
}
