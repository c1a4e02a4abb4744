//! Integration tests for the loose requirements parsers.
//!
//! Inputs mimic what an editor sees while a line is being typed, edited or
//! pasted.

use pip_requirements::{parse_requirements_file_loosely, parse_requirements_line_loosely};
use serde_json::{Value, json};

fn loose(input: &str) -> Value {
    serde_json::to_value(parse_requirements_line_loosely(input)).unwrap()
}

fn name_only(name: &str) -> Value {
    json!({ "type": "ProjectName", "name": name })
}

fn with_specs(name: &str, specs: Value) -> Value {
    json!({ "type": "ProjectName", "name": name, "versionSpec": specs })
}

fn with_extras(name: &str, extras: Value) -> Value {
    json!({ "type": "ProjectName", "name": name, "extras": extras })
}

#[test]
fn test_in_flight_requirement() {
    assert_eq!(loose("pip = "), with_specs("pip", json!([{ "operator": "=" }])));
}

#[test]
fn test_multiple_version_specs() {
    assert_eq!(
        loose("pip>=2,<3"),
        with_specs(
            "pip",
            json!([{ "operator": ">=", "version": "2" }, { "operator": "<", "version": "3" }])
        )
    );
}

#[test]
fn test_markers_are_consumed_but_not_reported() {
    assert_eq!(
        loose("hope = 2.0 ; xds"),
        with_specs("hope", json!([{ "operator": "=", "version": "2.0" }]))
    );
    assert_eq!(
        loose("pip[foo,bar]; python_version == \"2.7\" # xyz "),
        with_extras("pip", json!(["foo", "bar"]))
    );
    for input in ["pip >= 1.0 ; python_version", "pip >= 1.0 ;", "pip >= 1.0 ; sys_plat"] {
        assert_eq!(
            loose(input),
            with_specs("pip", json!([{ "operator": ">=", "version": "1.0" }])),
            "{:?}",
            input
        );
    }
}

#[test]
fn test_non_name_lines_are_ignored() {
    for input in [
        "pip @ https://x.com/y.zip",
        "-r requirements.txt",
        "-c constraints.txt",
        "# text",
        "",
        "   \t   ",
    ] {
        assert_eq!(parse_requirements_line_loosely(input), None, "{:?}", input);
    }
}

#[test]
fn test_incomplete_operators() {
    let cases = [
        ("pip >", json!([{ "operator": ">" }])),
        ("pip >=, <", json!([{ "operator": ">=" }, { "operator": "<" }])),
        ("pip =!", json!([{ "operator": "=!" }])),
        ("pip ===1.0", json!([{ "operator": "===", "version": "1.0" }])),
        ("pip =", json!([{ "operator": "=" }])),
        ("pip ==", json!([{ "operator": "==" }])),
        ("pip =<", json!([{ "operator": "=<" }])),
        ("pip >>>", json!([{ "operator": ">>>" }])),
        ("pip >=<", json!([{ "operator": ">=<" }])),
    ];
    for (input, specs) in cases {
        assert_eq!(loose(input), with_specs("pip", specs), "{:?}", input);
    }
}

#[test]
fn test_incomplete_extras() {
    assert_eq!(loose("pip[extra1,extra2"), with_extras("pip", json!(["extra1", "extra2"])));
    assert_eq!(loose("pip["), with_extras("pip", json!([])));
    assert_eq!(loose("pip[extra1,extra2,]"), with_extras("pip", json!(["extra1", "extra2"])));
    assert_eq!(loose("pip[]"), with_extras("pip", json!([])));
    assert_eq!(loose("pip[extra"), with_extras("pip", json!(["extra"])));
    assert_eq!(loose("requests["), with_extras("requests", json!([])));
    assert_eq!(loose("requests[sec"), with_extras("requests", json!(["sec"])));
    assert_eq!(loose("requests[security,"), with_extras("requests", json!(["security"])));
}

#[test]
fn test_incomplete_parentheses() {
    assert_eq!(
        loose("pip (>=1.0"),
        with_specs("pip", json!([{ "operator": ">=", "version": "1.0" }]))
    );
    assert_eq!(loose("pip ("), with_specs("pip", json!([])));
    assert_eq!(loose("pip()"), with_specs("pip", json!([])));
    assert_eq!(loose("pip (>"), with_specs("pip", json!([{ "operator": ">" }])));
    assert_eq!(
        loose("pip (>=1.0,<2.0,)"),
        with_specs(
            "pip",
            json!([{ "operator": ">=", "version": "1.0" }, { "operator": "<", "version": "2.0" }])
        )
    );
}

#[test]
fn test_whitespace_handling() {
    assert_eq!(
        loose("  pip   [  extra1  ,  extra2  ]   >=   1.0  "),
        json!({
            "type": "ProjectName",
            "name": "pip",
            "extras": ["extra1", "extra2"],
            "versionSpec": [{ "operator": ">=", "version": "1.0" }],
        })
    );
    assert_eq!(
        loose("\tpip\t>=\t1.0\t"),
        with_specs("pip", json!([{ "operator": ">=", "version": "1.0" }]))
    );
}

#[test]
fn test_names_being_typed() {
    for name in ["pip", "a", "requ", "2to3"] {
        assert_eq!(loose(name), name_only(name));
    }
    assert_eq!(
        loose("my-package_name >= 1.0"),
        with_specs("my-package_name", json!([{ "operator": ">=", "version": "1.0" }]))
    );
    assert_eq!(
        loose("my.package.name == 1.0"),
        with_specs("my.package.name", json!([{ "operator": "==", "version": "1.0" }]))
    );
    assert_eq!(
        loose("py2-ipaddress >= 3.4"),
        with_specs("py2-ipaddress", json!([{ "operator": ">=", "version": "3.4" }]))
    );
}

#[test]
fn test_versions_being_typed() {
    let cases = [
        ("pip == 1.0.0-alpha.1+build.123", "1.0.0-alpha.1+build.123"),
        ("pip == 1.0.*", "1.0.*"),
        ("pip == 1", "1"),
        ("pip == 1.", "1."),
        ("pip == 1.2", "1.2"),
        ("pip == 1.0.", "1.0."),
        ("package == 1.0a", "1.0a"),
        ("package == 1.0.dev", "1.0.dev"),
    ];
    for (input, version) in cases {
        let value = loose(input);
        assert_eq!(
            value["versionSpec"],
            json!([{ "operator": "==", "version": version }]),
            "{:?}",
            input
        );
    }
}

#[test]
fn test_dangling_commas() {
    let expected = with_specs("pip", json!([{ "operator": ">=", "version": "1.0" }]));
    assert_eq!(loose("pip>=1.0,"), expected);
    assert_eq!(loose("pip>=1.0,,,"), expected);
    assert_eq!(
        loose("pip>=1.0 ,<2.0"),
        with_specs(
            "pip",
            json!([{ "operator": ">=", "version": "1.0" }, { "operator": "<", "version": "2.0" }])
        )
    );
}

#[test]
fn test_mixed_completeness() {
    assert_eq!(
        loose("pip >=1.0, <, !=2.0, >"),
        with_specs(
            "pip",
            json!([
                { "operator": ">=", "version": "1.0" },
                { "operator": "<" },
                { "operator": "!=", "version": "2.0" },
                { "operator": ">" },
            ])
        )
    );
    assert_eq!(
        loose("django>=3.2,<4.0,!=3.2.1"),
        with_specs(
            "django",
            json!([
                { "operator": ">=", "version": "3.2" },
                { "operator": "<", "version": "4.0" },
                { "operator": "!=", "version": "3.2.1" },
            ])
        )
    );
}

#[test]
fn test_everything_partial() {
    assert_eq!(
        loose("pip[extra1,extra2 (>=1.0,<; some invalid marker"),
        json!({
            "type": "ProjectName",
            "name": "pip",
            "extras": ["extra1", "extra2"],
            "versionSpec": [{ "operator": ">=", "version": "1.0" }, { "operator": "<" }],
        })
    );
    assert_eq!(
        loose("requests[security,socks](>=2.25.1,<3.0"),
        json!({
            "type": "ProjectName",
            "name": "requests",
            "extras": ["security", "socks"],
            "versionSpec": [
                { "operator": ">=", "version": "2.25.1" },
                { "operator": "<", "version": "3.0" },
            ],
        })
    );
    assert_eq!(
        loose("package[extra](=="),
        json!({
            "type": "ProjectName",
            "name": "package",
            "extras": ["extra"],
            "versionSpec": [{ "operator": "==" }],
        })
    );
    assert_eq!(
        loose("package[extra>=1.0"),
        json!({
            "type": "ProjectName",
            "name": "package",
            "extras": ["extra"],
            "versionSpec": [{ "operator": ">=", "version": "1.0" }],
        })
    );
}

#[test]
fn test_loose_never_fails_where_strict_does() {
    assert!(pip_requirements::parse_requirements_line("pip???").is_err());
    assert_eq!(loose("pip???"), name_only("pip"));
}

#[test]
fn test_loose_file() {
    let requirements = parse_requirements_file_loosely(
        "flask[async\n# comment\n-r base.txt\npip @ https://x.com/y.zip\nrequests >=\n???\n",
    );
    assert_eq!(
        serde_json::to_value(&requirements).unwrap(),
        json!([
            { "type": "ProjectName", "name": "flask", "extras": ["async"] },
            { "type": "ProjectName", "name": "requests", "versionSpec": [{ "operator": ">=" }] },
        ])
    );
}
