// This file is the module declaration file for the `core` module.
// It groups the pieces that drive a scan end to end.

// `config` module:
// Defines `StatsConfig`, the TOML-backed configuration with defaults that
// match the circuit generator's layout, and the `ConfigManager` that loads,
// saves and exports it.
pub mod config;

// `engine` module:
// `StatsEngine` lists the matching sources, runs the level scanner over each
// one and passes the results to a reporter.
pub mod engine;

// `source` module:
// The `SourceTree` trait abstracts directory listing and file reading;
// `FsSourceTree` is the local filesystem implementation.
pub mod source;
