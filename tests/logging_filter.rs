// tests/logging_filter.rs

use specwatch::cli::LogLevel;
use specwatch::logging::filter_directives;

#[test]
fn cli_level_wins_over_environment() {
    assert_eq!(
        filter_directives(Some(LogLevel::Debug), Some("specwatch=trace")),
        "debug"
    );
}

#[test]
fn environment_directives_pass_through() {
    assert_eq!(
        filter_directives(None, Some(" specwatch::engine=trace,info ")),
        "specwatch::engine=trace,info"
    );
}

#[test]
fn defaults_to_info() {
    assert_eq!(filter_directives(None, None), "info");
    assert_eq!(filter_directives(None, Some("   ")), "info");
}
