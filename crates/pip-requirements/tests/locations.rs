//! Integration tests for location decoration.

use pip_requirements::{
    Requirement, SourceLocation, parse_requirements_file, parse_requirements_file_loosely,
    parse_requirements_file_loosely_with_locations, parse_requirements_file_with_locations,
    parse_requirements_line_loosely_with_locations, parse_requirements_line_with_locations,
};

const SAMPLE_FILE: &str = "\
# Application dependencies
requests[security,socks] >= 2.28, < 3 ; python_version >= '3.8' and os_name != 'nt'
pip @ https://github.com/pypa/pip/archive/22.0.2.zip ; sys_platform == 'linux'
flask ( ~= 2.3 )
django()
-r base.txt
-c constraints.txt  # pinned
";

fn span(start: usize, end: usize) -> SourceLocation {
    SourceLocation::new(start, end)
}

#[test]
fn test_version_spec_spans() {
    let requirement = parse_requirements_line_with_locations("pip == 22.0.2")
        .unwrap()
        .unwrap();
    assert_eq!(requirement.location(), span(0, 13));

    let Requirement::ProjectName(req) = requirement else {
        panic!("expected name requirement");
    };
    assert_eq!(req.data.name.location, span(0, 3));

    let specs = req.data.version_spec.unwrap();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].location, span(4, 13));
    assert_eq!(specs[0].data.operator.location, span(4, 6));
    assert_eq!(specs[0].data.version.location, span(7, 13));
    assert_eq!(specs[0].data.version.data, "22.0.2");
}

#[test]
fn test_located_snapshot() {
    let requirement = parse_requirements_line_with_locations("pip == 22.0.2").unwrap();
    insta::assert_json_snapshot!(requirement, @r#"
    {
      "data": {
        "type": "ProjectName",
        "name": {
          "data": "pip",
          "location": {
            "startIdx": 0,
            "endIdx": 3
          }
        },
        "versionSpec": [
          {
            "data": {
              "operator": {
                "data": "==",
                "location": {
                  "startIdx": 4,
                  "endIdx": 6
                }
              },
              "version": {
                "data": "22.0.2",
                "location": {
                  "startIdx": 7,
                  "endIdx": 13
                }
              }
            },
            "location": {
              "startIdx": 4,
              "endIdx": 13
            }
          }
        ]
      },
      "location": {
        "startIdx": 0,
        "endIdx": 13
      }
    }
    "#);
}

#[test]
fn test_spans_slice_back_to_source() {
    let requirements = parse_requirements_file_with_locations(SAMPLE_FILE).unwrap();
    let texts: Vec<&str> = requirements
        .iter()
        .map(|req| &SAMPLE_FILE[req.location().range()])
        .collect();
    assert_eq!(
        texts,
        [
            "requests[security,socks] >= 2.28, < 3 ; python_version >= '3.8' and os_name != 'nt'",
            "pip @ https://github.com/pypa/pip/archive/22.0.2.zip ; sys_platform == 'linux'",
            "flask ( ~= 2.3 )",
            "django()",
            "-r base.txt",
            "-c constraints.txt",
        ]
    );
}

#[test]
fn test_nested_spans() {
    let requirements = parse_requirements_file_with_locations(SAMPLE_FILE).unwrap();
    let slice = |location: SourceLocation| &SAMPLE_FILE[location.range()];

    let Requirement::ProjectName(requests) = &requirements[0] else {
        panic!("expected name requirement");
    };
    let extras: Vec<_> = requests
        .data
        .extras
        .as_ref()
        .unwrap()
        .iter()
        .map(|e| slice(e.location))
        .collect();
    assert_eq!(extras, ["security", "socks"]);
    let specs: Vec<_> = requests
        .data
        .version_spec
        .as_ref()
        .unwrap()
        .iter()
        .map(|s| slice(s.location))
        .collect();
    assert_eq!(specs, [">= 2.28", "< 3"]);
    let marker = requests.data.environment_marker_tree.as_ref().unwrap();
    assert_eq!(slice(marker.location), "python_version >= '3.8' and os_name != 'nt'");
    assert_eq!(marker.data.leaf_count(), 2);

    let Requirement::ProjectUrl(pip) = &requirements[1] else {
        panic!("expected URL requirement");
    };
    assert_eq!(slice(pip.data.url.location), "https://github.com/pypa/pip/archive/22.0.2.zip");
    assert_eq!(slice(pip.data.name.location), "pip");

    let Requirement::RequirementsFile(base) = &requirements[4] else {
        panic!("expected requirements file");
    };
    assert_eq!(base.data.path, "base.txt");
}

#[test]
fn test_stripping_locations_gives_plain_result() {
    let located = parse_requirements_file_with_locations(SAMPLE_FILE).unwrap();
    let plain = parse_requirements_file(SAMPLE_FILE).unwrap();
    let stripped: Vec<Requirement> = located.into_iter().map(Requirement::into_plain).collect();
    assert_eq!(stripped, plain);
}

#[test]
fn test_stripping_loose_locations_gives_plain_result() {
    let input = "flask[async,\nrequests (>=2.0, <\n-r base.txt\npip; os_name == 'nt\n";
    let located = parse_requirements_file_loosely_with_locations(input);
    let plain = parse_requirements_file_loosely(input);
    let stripped: Vec<_> = located
        .into_iter()
        .map(|req| req.into_data().into_plain())
        .collect();
    assert_eq!(stripped, plain);
    assert_eq!(plain.len(), 3);
}

#[test]
fn test_loose_spans() {
    let input = "  requests[sec (>=2.0, < ; sys_platform";
    let req = parse_requirements_line_loosely_with_locations(input).unwrap();
    assert_eq!(&input[req.location.range()], "requests[sec (>=2.0, < ; sys_platform");

    let specs = req.data.version_spec.unwrap();
    assert_eq!(&input[specs[0].location.range()], ">=2.0");
    assert_eq!(&input[specs[1].location.range()], "<");
    assert_eq!(specs[1].data.version, None);
    assert_eq!(&input[specs[1].data.operator.location.range()], "<");

    let extras = req.data.extras.unwrap();
    assert_eq!(&input[extras[0].location.range()], "sec");
}
