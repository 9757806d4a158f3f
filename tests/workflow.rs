//! The CI workflow must check, build and test the crate on every push

use serde_yaml::Value;

fn workflow() -> Value {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/.github/workflows/rust.yml");
    let content = std::fs::read_to_string(path).expect("workflow file should exist");
    serde_yaml::from_str(&content).expect("workflow should be valid YAML")
}

#[test]
fn test_triggered_on_push() {
    let workflow = workflow();
    let on = &workflow["on"];
    let triggers: Vec<&str> = match on {
        Value::Sequence(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(s) => vec![s.as_str()],
        Value::Mapping(map) => map.keys().filter_map(Value::as_str).collect(),
        other => panic!("unexpected trigger definition: {:?}", other),
    };
    assert!(triggers.contains(&"push"));
}

#[test]
fn test_colored_cargo_output() {
    assert_eq!(workflow()["env"]["CARGO_TERM_COLOR"].as_str(), Some("always"));
}

#[test]
fn test_build_job_steps_in_order() {
    let workflow = workflow();
    let job = &workflow["jobs"]["build"];
    assert_eq!(job["runs-on"].as_str(), Some("ubuntu-latest"));

    let steps = job["steps"].as_sequence().expect("steps should be a list");
    let uses: Vec<&str> = steps.iter().filter_map(|s| s["uses"].as_str()).collect();
    assert!(uses[0].starts_with("actions/checkout"));
    assert!(uses.iter().any(|u| u.contains("nightly")));

    let commands: Vec<&str> = steps
        .iter()
        .filter_map(|s| s["run"].as_str())
        .filter_map(|run| run.split_whitespace().nth(1))
        .collect();
    assert_eq!(commands, vec!["check", "build", "test"]);
}
