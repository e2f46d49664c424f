use clap::Parser;
use tempfile::tempdir;
use vehicle_control::{
    SavedAgent, SimulationConfig,
    cli::commands::{config, inspect, run},
    pipeline::RunSummary,
};

fn run_args<I, T>(args: I) -> run::RunArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    run::RunArgs::parse_from(args)
}

#[test]
fn run_writes_csv_summary_and_agent() {
    let tmp = tempdir().unwrap();
    let csv = tmp.path().join("vehicle_data.csv");
    let summary = tmp.path().join("summary.json");
    let agent = tmp.path().join("agent.msgpack");
    let observations = tmp.path().join("ticks.jsonl");

    let args = run_args([
        "vehicle-run",
        "--ticks",
        "30",
        "--seed",
        "7",
        "--every",
        "10",
        "--output",
        csv.to_str().unwrap(),
        "--summary",
        summary.to_str().unwrap(),
        "--save-agent",
        agent.to_str().unwrap(),
        "--observations",
        observations.to_str().unwrap(),
    ]);
    run::execute(args).expect("run should succeed");

    let text = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert_eq!(text.lines().next(), Some("x,y,theta"));

    let summary = RunSummary::load(&summary).unwrap();
    assert_eq!(summary.ticks, 30);
    assert_eq!(summary.snapshots, 3);

    let saved = SavedAgent::load_from_file(&agent).unwrap();
    assert_eq!(saved.updates(), 30);

    let lines = std::fs::read_to_string(&observations).unwrap();
    assert_eq!(lines.lines().count(), 30);
}

#[test]
fn run_continues_from_saved_agent_and_config() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("config.json");
    let agent = tmp.path().join("agent.msgpack");
    let csv = tmp.path().join("out.csv");

    config::execute(config::ConfigArgs::parse_from([
        "vehicle-config",
        config_path.to_str().unwrap(),
        "--seed",
        "3",
    ]))
    .unwrap();
    assert_eq!(
        SimulationConfig::load(&config_path).unwrap(),
        SimulationConfig::default().with_seed(3)
    );

    for _ in 0..2 {
        let mut args = vec![
            "vehicle-run".to_string(),
            "--config".to_string(),
            config_path.to_str().unwrap().to_string(),
            "--ticks".to_string(),
            "20".to_string(),
            "--target-angle".to_string(),
            "-0.4".to_string(),
            "--output".to_string(),
            csv.to_str().unwrap().to_string(),
            "--save-agent".to_string(),
            agent.to_str().unwrap().to_string(),
        ];
        if agent.exists() {
            args.push("--load-agent".to_string());
            args.push(agent.to_str().unwrap().to_string());
        }
        run::execute(run_args(args)).unwrap();
    }

    let saved = SavedAgent::load_from_file(&agent).unwrap();
    assert_eq!(saved.updates(), 40);

    inspect::execute(inspect::InspectArgs::parse_from([
        "vehicle-inspect",
        agent.to_str().unwrap(),
        "--limit",
        "5",
    ]))
    .unwrap();
    inspect::execute(inspect::InspectArgs::parse_from([
        "vehicle-inspect",
        agent.to_str().unwrap(),
        "--json",
    ]))
    .unwrap();
}

#[test]
fn run_rejects_bad_schedule() {
    let tmp = tempdir().unwrap();
    let args = run_args([
        "vehicle-run",
        "--schedule",
        "10:fast:0.0",
        "--output",
        tmp.path().join("out.csv").to_str().unwrap(),
    ]);
    let err = run::execute(args).unwrap_err();
    assert!(err.to_string().contains("schedule"), "{err}");
}
