// CLI parsing and validation tests

use cadvisor_snmp_agent::config::{AgentConfig, Cli, Mode};
use clap::Parser;
use std::time::Duration;

fn parse(args: &[&str]) -> Cli {
    let argv = std::iter::once("cadvisor-snmp-agent").chain(args.iter().copied());
    Cli::try_parse_from(argv).expect("parse")
}

#[test]
fn defaults_are_agent_mode_with_short_timeouts() {
    let config = AgentConfig::from_cli(parse(&["--url", "http://localhost:8080"])).expect("valid");
    assert_eq!(config.mode, Mode::Agent);
    assert_eq!(config.fetch_timeout, Duration::from_secs(2));
    assert_eq!(config.cache_ttl, Duration::from_secs(5));
}

#[test]
fn mode_flag_selects_oneshot_modes() {
    let json = parse(&["--url", "http://h:1", "--mode", "json"]);
    assert_eq!(json.mode, Mode::Json);
    let check = parse(&["--url", "http://h:1", "--mode", "check"]);
    assert_eq!(check.mode, Mode::Check);
}

#[test]
fn url_flag_wins_over_environment() {
    unsafe { std::env::set_var("CADVISOR_URL", "http://from-env:8080") };
    let from_env = parse(&[]);
    let from_flag = parse(&["--url", "http://from-flag:8080"]);
    unsafe { std::env::remove_var("CADVISOR_URL") };
    assert_eq!(from_env.url, "http://from-env:8080");
    assert_eq!(from_flag.url, "http://from-flag:8080");
}

#[test]
fn validation_rejects_non_http_url() {
    let err = AgentConfig::from_cli(parse(&["--url", "ftp://nope"])).unwrap_err();
    assert!(err.to_string().contains("url"));
}

#[test]
fn validation_rejects_zero_fetch_timeout() {
    let cli = parse(&["--url", "http://h:1", "--fetch-timeout-secs", "0"]);
    let err = AgentConfig::from_cli(cli).unwrap_err();
    assert!(err.to_string().contains("fetch-timeout-secs"));
}

#[test]
fn validation_rejects_zero_cache_ttl() {
    let cli = parse(&["--url", "http://h:1", "--cache-ttl-secs", "0"]);
    let err = AgentConfig::from_cli(cli).unwrap_err();
    assert!(err.to_string().contains("cache-ttl-secs"));
}
